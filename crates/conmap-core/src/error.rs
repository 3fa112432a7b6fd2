use crate::language::TokenizerInitError;

/// Failure of a dictionary load. Every error raised while opening or
/// reading a dictionary source is surfaced through this type.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Unsupported dictionary scheme '{scheme}' in {locator}")]
    UnsupportedScheme { scheme: String, locator: String },

    #[error("Cannot access dictionary source {locator}: {reason}")]
    SourceAccess { locator: String, reason: String },

    #[error("Dictionary contents requested before a source was opened")]
    NotOpened,

    #[error("Dictionary is already loaded")]
    AlreadyLoaded,

    #[error("Syntax error in {source_id} at byte {offset}: {message}")]
    Syntax {
        source_id: String,
        offset: u64,
        message: String,
    },

    #[error("Tokenizer initialization failed: {0}")]
    TokenizerInit(#[from] TokenizerInitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while writing or restoring a dictionary snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot format '{format}' version {version}")]
    UnsupportedVersion { format: String, version: u32 },

    #[error("Invalid snapshot: {0}")]
    InvalidFormat(String),

    #[error("Snapshot not available: {0}")]
    NotLoaded(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised when the longest/shortest length of an index entry is requested
/// but no lengths are stored. The insertion contract makes this a defect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("empty index entry")]
pub struct EmptyIndexEntry;
