/// Errors raised while reading inputs or interpreting tables.
///
/// Malformed annotation or anchor lines are not errors; they are skipped.
#[derive(Debug)]
pub enum AnchorError {
    IoPath { path: String, source: std::io::Error },
    Table { path: String, message: String },
}

impl AnchorError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AnchorError::IoPath {
            path: path.into(),
            source,
        }
    }

    pub fn table(path: impl Into<String>, message: impl Into<String>) -> Self {
        AnchorError::Table {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Replace the placeholder path of a reader-level I/O error.
    pub fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            AnchorError::IoPath { source, .. } => AnchorError::io(path.display().to_string(), source),
            other => other,
        }
    }
}

impl std::fmt::Display for AnchorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnchorError::IoPath { path, source } => {
                write!(f, "I/O error while reading '{}': {}", path, source)
            }
            AnchorError::Table { path, message } => {
                write!(f, "Cannot use table '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for AnchorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnchorError::IoPath { source, .. } => Some(source),
            AnchorError::Table { .. } => None,
        }
    }
}
