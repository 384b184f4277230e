//! Turns an [`OcrResponse`] into something the page can render.

use crate::ocr::OcrResponse;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    /// Recognized fragments, in the order the service returned them.
    Text { fields: Vec<String> },
    /// Valid response with no recognized fields.
    Empty,
    RemoteError {
        status: Option<u16>,
        error: String,
        details: String,
    },
    /// Neither `images` nor `error` could be read from the response.
    Unexpected,
}

impl Recognition {
    pub fn from_response(response: &OcrResponse) -> Self {
        match response {
            OcrResponse::Failure { status, error, details } => Recognition::RemoteError {
                status: Some(*status),
                error: error.clone(),
                details: details.clone(),
            },
            OcrResponse::Body(body) => Self::from_body(body),
        }
    }

    fn from_body(body: &Value) -> Self {
        if let Some(first) = body
            .get("images")
            .and_then(Value::as_array)
            .and_then(|images| images.first())
        {
            if !first.is_object() {
                return Recognition::Unexpected;
            }
            let fields = match first.get("fields") {
                None | Some(Value::Null) => return Recognition::Empty,
                Some(fields) => match fields.as_array() {
                    Some(fields) => fields,
                    None => return Recognition::Unexpected,
                },
            };
            if fields.is_empty() {
                return Recognition::Empty;
            }

            let texts: Option<Vec<String>> = fields
                .iter()
                .map(|f| f.get("inferText").and_then(Value::as_str).map(str::to_string))
                .collect();

            return match texts {
                Some(fields) => Recognition::Text { fields },
                None => Recognition::Unexpected,
            };
        }

        if let Some(error) = body.get("error") {
            return Recognition::RemoteError {
                status: None,
                error: value_to_text(error),
                details: body.get("details").map(value_to_text).unwrap_or_default(),
            };
        }

        Recognition::Unexpected
    }

    /// Recognized text joined with single spaces. `None` unless `Text`.
    pub fn text(&self) -> Option<String> {
        match self {
            Recognition::Text { fields } => Some(fields.join(" ")),
            _ => None,
        }
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
