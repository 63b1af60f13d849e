use std::io;

use thiserror::Error;

use crate::cli::BAD_USAGE;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}", BAD_USAGE)]
    BadUsage,
    /// An OS error tagged with the operation that failed, printed like `perror`.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("partial write: wrote {written} of {expected} bytes")]
    PartialWrite { written: usize, expected: usize },
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Every failure is fatal to the invocation and maps to the same status.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

pub trait IoContext<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| Error::Io { context, source })
    }
}
