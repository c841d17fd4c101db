use std::collections::TryReserveError;
use std::panic::Location;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("allocation failed in {operation} at {location}: {source}")]
    Allocation {
        operation: &'static str,
        location: &'static Location<'static>,
        #[source]
        source: TryReserveError,
    },

    #[error("parallel backend failure in {operation} at {location}: {message}")]
    Backend {
        operation: &'static str,
        location: &'static Location<'static>,
        message: String,
    },

    #[error("invalid scene: {0}")]
    InvalidScene(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("export failed: {0}")]
    Export(#[from] image::ImageError),
}

impl RenderError {
    #[track_caller]
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        RenderError::Backend {
            operation,
            location: Location::caller(),
            message: message.to_string(),
        }
    }

    /// Allocation and backend failures leave the session unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Allocation { .. } | RenderError::Backend { .. })
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Reserves a zero-filled buffer of `len` elements, reporting failures as
/// [`RenderError::Allocation`] against the caller's location.
#[track_caller]
pub fn alloc_buffer<T: Clone>(operation: &'static str, len: usize, value: T) -> Result<Vec<T>> {
    let location = Location::caller();
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| RenderError::Allocation {
            operation,
            location,
            source,
        })?;
    buffer.resize(len, value);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_buffer() {
        let buf = alloc_buffer("test buffer", 16, 3u32).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&v| v == 3));
    }

    #[test]
    fn test_alloc_failure_reports_operation() {
        let err = alloc_buffer("huge buffer", usize::MAX, 0u64).unwrap_err();
        assert!(err.is_fatal());
        let message = err.to_string();
        assert!(message.contains("huge buffer"));
        assert!(message.contains("error.rs"));
    }

    #[test]
    fn test_backend_error_location() {
        let err = RenderError::backend("thread pool", "no threads");
        match err {
            RenderError::Backend { location, ref message, .. } => {
                assert!(location.file().ends_with("error.rs"));
                assert_eq!(message, "no threads");
            }
            _ => panic!("wrong variant"),
        }
    }
}
