//! Container-level failure modes.

use thiserror::Error;

/// Errors raised while framing the output containers. The pipeline lowers
/// these into fatal diagnostics.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A Level chunk payload crossed the single-word length limit.
    #[error("level chunk for section {section} exceeds 32767 words")]
    LevelChunkTooLarge { section: usize },

    /// A 16-bit aggregate size field overflowed.
    #[error("{what} exceed 64 KB and cannot be addressed by the header")]
    AggregateTooLarge { what: &'static str },

    /// An extensions block does not fit its fixed 20-byte slot.
    #[error("extension block does not fit in 20 bytes")]
    ExtensionsTooLong,

    /// An import file name does not fit the 80-byte name field.
    #[error("import file name `{name}` does not fit in 80 bytes")]
    ImportNameTooLong { name: String },

    /// A language table exceeds a 16-bit count or offset field.
    #[error("language table too large: {what}")]
    LanguageTooLarge { what: &'static str },
}
