use serde::{Deserialize, Serialize};

use crate::exchange::Exchange;

/// Body of `POST /process`
///
/// `text` is optional on the wire so a missing field can be reported as a
/// client error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl ProcessRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Trimmed text, or `None` when missing or blank
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProcessResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistoryResponse {
    pub messages: Vec<Exchange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_text_deserializes_to_none() {
        let req: ProcessRequest = serde_json::from_str("{}").unwrap();
        assert!(req.text.is_none());
        assert_eq!(req.trimmed_text(), None);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let req: ProcessRequest = serde_json::from_str(r#"{"text": "   "}"#).unwrap();
        assert_eq!(req.trimmed_text(), None);
    }

    #[test]
    fn test_text_is_trimmed() {
        let req = ProcessRequest::new("  what time is it? \n");
        assert_eq!(req.trimmed_text(), Some("what time is it?"));
    }
}
