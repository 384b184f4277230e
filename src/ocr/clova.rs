//! CLOVA-style OCR provider (JSON envelope + secret header over HTTP POST).

use super::{OcrError, OcrProvider, OcrRequest, OcrResponse};
use crate::config::OcrConfig;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const SECRET_HEADER: &str = "X-OCR-SECRET";

pub struct ClovaOcrProvider {
    config: Arc<OcrConfig>,
    client: Client,
}

impl ClovaOcrProvider {
    pub fn new(config: Arc<OcrConfig>, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait::async_trait]
impl OcrProvider for ClovaOcrProvider {
    fn name(&self) -> &str {
        "clova"
    }

    async fn recognize(&self, image: &[u8], extension: &str) -> Result<OcrResponse, OcrError> {
        let request = OcrRequest::new(image, extension);

        info!(
            "ClovaOcrProvider: request {} ({} bytes, format {})",
            request.request_id,
            image.len(),
            extension
        );

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .header("Content-Type", "application/json")
            .header(SECRET_HEADER, &self.config.secret_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let details = response.text().await?;
            warn!(
                "ClovaOcrProvider: request {} failed ({}): {}",
                request.request_id,
                status,
                truncate(&details, 500)
            );
            return Ok(OcrResponse::failure(status.as_u16(), details));
        }

        let raw_text = response.text().await?;
        debug!(
            "ClovaOcrProvider: raw response ({} bytes): {}",
            raw_text.len(),
            truncate(&raw_text, 500)
        );

        let body: serde_json::Value = serde_json::from_str(&raw_text)?;
        Ok(OcrResponse::Body(body))
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
