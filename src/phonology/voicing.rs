//! Consonant voicing.
//!
//! Every voiceless (aspirated or ejective) stop, affricate and fricative is
//! replaced by its voiced counterpart. The rewrite is context-free: each
//! character is looked up on its own.

/// Source → target pairs. Several sources share a target, so voicing is lossy.
pub const VOICING_PAIRS: [(char, char); 14] = [
    ('თ', 'დ'),
    ('ტ', 'დ'),
    ('პ', 'ბ'),
    ('ფ', 'ბ'),
    ('კ', 'გ'),
    ('ქ', 'გ'),
    ('ყ', 'ღ'),
    ('ხ', 'ღ'),
    ('ჩ', 'ჯ'),
    ('ჭ', 'ჯ'),
    ('ს', 'ზ'),
    ('შ', 'ჟ'),
    ('ც', 'ძ'),
    ('წ', 'ძ'),
];

/// Voice a single character, returning it unchanged when it has no entry.
pub fn voice_char(c: char) -> char {
    VOICING_PAIRS
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to)
}

/// Apply the voicing table to every character of `text`.
///
/// The output always has the same number of characters as the input.
pub fn voice(text: &str) -> String {
    text.chars().map(voice_char).collect()
}
