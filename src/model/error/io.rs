use macros::traceable;
use std::path::PathBuf;

traceable! {
    IOError {
        #[error("Failed to create directory {path:?}: {err}")]
        CreateDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to read directory {path:?}: {err}")]
        ReadDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to delete directory {path:?}: {err}")]
        DeleteDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,
    }
}
