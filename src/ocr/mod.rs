//! OCR request adapter.
//!
//! Defines the [`OcrProvider`] trait, the vendor request envelope and the
//! normalized [`OcrResponse`] handed to the recognition step.

pub mod clova;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Protocol version tag expected by the vendor.
pub const PROTOCOL_VERSION: &str = "V2";
/// Fixed label sent with every image.
pub const IMAGE_NAME: &str = "demo";

/// Request envelope posted to the OCR endpoint. Always carries exactly one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRequest {
    pub images: Vec<OcrImage>,
    pub request_id: String,
    pub version: String,
    /// Milliseconds since the Unix epoch, taken when the request is built.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrImage {
    pub format: String,
    pub name: String,
    /// Base64 (standard alphabet, padded) image bytes.
    pub data: String,
}

impl OcrRequest {
    /// Build a fresh envelope with a new request id and the current time.
    pub fn new(image: &[u8], extension: &str) -> Self {
        Self {
            images: vec![OcrImage {
                format: extension.to_string(),
                name: IMAGE_NAME.to_string(),
                data: BASE64.encode(image),
            }],
            request_id: Uuid::new_v4().to_string(),
            version: PROTOCOL_VERSION.to_string(),
            timestamp: now_millis(),
        }
    }
}

/// Normalized outcome of one OCR call.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrResponse {
    /// Status 200; the JSON body exactly as the vendor sent it.
    Body(serde_json::Value),
    /// Any other status.
    Failure {
        status: u16,
        error: String,
        details: String,
    },
}

impl OcrResponse {
    pub fn failure(status: u16, details: impl Into<String>) -> Self {
        Self::Failure {
            status,
            error: format!("Request failed with status code {}", status),
            details: details.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OCR response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Async trait implemented by each OCR backend.
#[async_trait::async_trait]
pub trait OcrProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Send one image to the backend. `image` must be non-empty; `extension`
    /// is forwarded unchecked.
    async fn recognize(&self, image: &[u8], extension: &str) -> Result<OcrResponse, OcrError>;
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_shape() {
        let request = OcrRequest::new(b"\x89PNG\r\n", "png");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["version"], "V2");
        assert_eq!(json["images"].as_array().unwrap().len(), 1);
        assert_eq!(json["images"][0]["format"], "png");
        assert_eq!(json["images"][0]["name"], "demo");
        assert!(json["requestId"].is_string());
        assert!(json["timestamp"].is_i64());
        assert!(json.get("request_id").is_none());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = OcrRequest::new(b"same bytes", "jpg");
        let b = OcrRequest::new(b"same bytes", "jpg");
        assert_ne!(a.request_id, b.request_id);
        assert!(Uuid::parse_str(&a.request_id).is_ok());
    }

    #[test]
    fn test_image_data_decodes_to_original_bytes() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1027).collect();
        let request = OcrRequest::new(&bytes, "jpg");
        let decoded = BASE64.decode(&request.images[0].data).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_timestamp_is_build_time() {
        let before = now_millis();
        let request = OcrRequest::new(b"x", "jpg");
        let after = now_millis();
        assert!(request.timestamp >= before && request.timestamp <= after);
    }

    #[test]
    fn test_extension_forwarded_as_is() {
        let request = OcrRequest::new(b"x", "TIFF?");
        assert_eq!(request.images[0].format, "TIFF?");
    }

    #[test]
    fn test_failure_describes_status() {
        let response = OcrResponse::failure(403, "forbidden");
        match response {
            OcrResponse::Failure { status, error, details } => {
                assert_eq!(status, 403);
                assert!(error.contains("403"));
                assert_eq!(details, "forbidden");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
