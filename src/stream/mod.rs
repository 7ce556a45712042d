mod probe;

use thiserror::Error;

pub use probe::{Availability, StreamProbe};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("invalid stream URL")]
    InvalidUrl,
    #[error("camera unavailable: stream problem {0}")]
    Unreachable(String),
    #[error("camera #{0} not found")]
    UnknownCamera(u64),
    #[error("selection superseded by a newer action")]
    Superseded,
}

/// Superficial check only: non-empty and an http(s) scheme.
pub fn validate_stream_url(url: &str) -> Result<(), SelectError> {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(SelectError::InvalidUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stream_url() {
        assert!(validate_stream_url("https://open.ivideon.com/embed/v2/?server=1").is_ok());
        assert!(validate_stream_url("http://10.0.0.1:8080/video").is_ok());
        assert!(validate_stream_url("HTTPS://EXAMPLE.ORG/").is_ok());

        assert_eq!(validate_stream_url(""), Err(SelectError::InvalidUrl));
        assert_eq!(validate_stream_url("ftp://x"), Err(SelectError::InvalidUrl));
        assert_eq!(validate_stream_url("rtsp://10.0.0.1/live"), Err(SelectError::InvalidUrl));
        assert_eq!(validate_stream_url("httpx"), Err(SelectError::InvalidUrl));
        assert_eq!(validate_stream_url("//example.org"), Err(SelectError::InvalidUrl));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SelectError::InvalidUrl.to_string(), "invalid stream URL");
        assert_eq!(
            SelectError::Unreachable("http://x/".into()).to_string(),
            "camera unavailable: stream problem http://x/"
        );
        assert_eq!(SelectError::UnknownCamera(5).to_string(), "camera #5 not found");
        assert_eq!(
            SelectError::Superseded.to_string(),
            "selection superseded by a newer action"
        );
    }
}
