use std::path::PathBuf;
use thiserror::Error;

/// Result type for treewatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for treewatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification source errors (construction, delivery)
    #[error("Watcher error: {0}")]
    Watcher(String),

    /// A watch root could not be enumerated
    #[error("Error adding path {root}: {message}")]
    RootUnreadable { root: PathBuf, message: String },

    /// A directory could not be registered with the notification source
    #[error("Cannot watch path {path}: {message}")]
    Registration { path: PathBuf, message: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a watcher error
    pub fn watcher(msg: impl Into<String>) -> Self {
        Self::Watcher(msg.into())
    }

    /// Creates an error for a root that could not be walked
    pub fn root_unreadable(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::RootUnreadable {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Creates a registration error
    pub fn registration(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Registration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error was raised while setting up a watch session
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::Watcher(_)
                | Self::RootUnreadable { .. }
                | Self::Registration { .. }
                | Self::InvalidInput(_)
        )
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
