//! Nasal insertion.
//!
//! `ნ` is prepended to voiced obstruents (and `ვ`) unless the consonant opens
//! the text or directly follows a plain space.

/// The inserted nasal, U+10DC GEORGIAN LETTER NAR.
pub const NASAL: char = 'ნ';

/// Characters that receive a nasal prefix.
pub const NASAL_TARGETS: [char; 9] = ['ბ', 'გ', 'დ', 'ზ', 'ჟ', 'ც', 'ძ', 'ჯ', 'ვ'];

/// Only U+0020 exempts the following character. Tabs and newlines do not.
const WORD_BREAK: char = ' ';

pub fn is_nasal_target(c: char) -> bool {
    NASAL_TARGETS.contains(&c)
}

/// Whether the character at some position needs a nasal, given the character
/// before it in the *source* text (`None` at the start).
fn needs_nasal(prev: Option<char>, c: char) -> bool {
    is_nasal_target(c) && prev.is_some_and(|p| p != WORD_BREAK)
}

/// Insert a nasal before every qualifying target character.
///
/// Context is always read from `text`, never from the output being built, so
/// an inserted nasal can never influence a later decision.
pub fn insert_nasals(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut prev = None;

    for c in text.chars() {
        if needs_nasal(prev, c) {
            out.push(NASAL);
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

/// Number of nasals [`insert_nasals`] would add to `text`.
pub fn count_insertions(text: &str) -> usize {
    let mut prev = None;
    let mut count = 0;
    for c in text.chars() {
        if needs_nasal(prev, c) {
            count += 1;
        }
        prev = Some(c);
    }
    count
}
