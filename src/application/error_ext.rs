//! Error conversion helpers for I/O inside caller-facing callbacks

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Wrap an I/O error as a callback failure.
    ///
    /// # Example
    /// ```ignore
    /// output.flush().with_context("write prompt")?;
    /// ```
    fn with_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Callback {
            context: action.to_string(),
            source: Box::new(e),
        })
    }
}
