//! Error types for fetching and decoding the sheet export
//!
//! Everything that can stop a fetch cycle funnels into [`GalleryError`]. The
//! CLI and the preview server catch it once at the top level and show the
//! generic [`LOAD_FAILED_MESSAGE`]; the details go to the log.
//!
//! Per-record problems (a bad image link) are not errors at this level. They
//! live in [`crate::record::ImageLinkError`] and never abort a batch.

use thiserror::Error;

/// Message shown in the render target when loading fails
pub const LOAD_FAILED_MESSAGE: &str =
    "Error loading fabrics. Please try again later or check the console for details.";

#[derive(Debug, Error)]
pub enum GalleryError {
    /// Endpoint answered with a non-2xx status
    #[error("HTTP error! Status: {status} ({url})")]
    Network { status: u16, url: String },

    /// Connection, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload wrapper or table shape was not what the export produces
    #[error("parse error: {0}")]
    Parse(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GalleryError {
    /// True for failures that came from talking to the endpoint
    pub fn is_network(&self) -> bool {
        matches!(self, GalleryError::Network { .. } | GalleryError::Transport(_))
    }
}

#[cfg(feature = "net")]
impl From<reqwest::Error> for GalleryError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => GalleryError::Network {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => GalleryError::Transport(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_classification() {
        let net = GalleryError::Network { status: 503, url: "https://x".into() };
        assert!(net.is_network());
        assert!(GalleryError::Transport("reset".into()).is_network());
        assert!(!GalleryError::Parse("bad".into()).is_network());
    }

    #[test]
    fn test_network_message_includes_status() {
        let err = GalleryError::Network { status: 404, url: "https://sheet".into() };
        assert_eq!(err.to_string(), "HTTP error! Status: 404 (https://sheet)");
    }

    #[test]
    fn test_json_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GalleryError = bad.into();
        assert!(matches!(err, GalleryError::Json(_)));
    }
}
