//! kartuli - Georgian phonological text transformer
//!
//! Applies two fixed rewrite rules to Georgian text, consonant voicing and
//! then contextual `ნ` insertion, and serves the result over HTTP. When a
//! Gemini API key is configured, the transformed text is also synthesized
//! to numbered WAV files that the service lists and serves back.
//!
//! ## Quick Start
//!
//! ```bash
//! # HTTP service on 0.0.0.0:8000
//! kartuli serve
//!
//! # One-off transformation
//! kartuli transform "გაფუჭებული ტელეფონი"
//! ```
//!
//! ```
//! assert_eq!(kartuli::transform("ქართული"), "გარნდული");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod phonology;
pub mod server;
pub mod speech;

// Re-export commonly used types
pub use error::{ErrorCode, KartuliError};
pub use phonology::transform;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
