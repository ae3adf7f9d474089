//! Georgian phonological rewrite rules.
//!
//! Two pure stages run in a fixed order: [`voicing`] replaces voiceless
//! consonants with voiced ones, then [`nasal`] prepends `ნ` to qualifying
//! consonants. [`transform`] is the entry point everything else calls.

pub mod nasal;
pub mod pipeline;
pub mod voicing;

pub use nasal::{NASAL, NASAL_TARGETS, count_insertions, insert_nasals, is_nasal_target};
pub use pipeline::{PIPELINE, Stage, Transformation, transform, transform_detailed};
pub use voicing::{VOICING_PAIRS, voice, voice_char};
