//! Expense classification and receipt OCR client.
//!
//! Both operations call a configured inference endpoint. When no endpoint
//! is configured the classifier falls back to a keyword heuristic so the
//! API stays usable in development.

use base64::Engine;
use domain::models::{ClassificationResult, OcrExpenseResult};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClassifierConfig;

/// Errors that can occur during classification or OCR.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("OCR service not configured")]
    NotConfigured,

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),

    #[error("Inference service error: {0}")]
    Upstream(String),
}

/// Expense categories the classifier can assign.
pub const CATEGORIES: &[&str] = &[
    "groceries",
    "dining",
    "transport",
    "utilities",
    "entertainment",
    "travel",
    "health",
    "shopping",
    "other",
];

/// Client for the inference endpoint.
#[derive(Clone)]
pub struct ClassifierService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ClassifierService {
    /// Creates a new client from configuration.
    pub fn new(config: &ClassifierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    /// Classifies free-text expense data into a category.
    ///
    /// Falls back to a keyword heuristic when no endpoint is configured.
    pub async fn classify(&self, data: &str) -> Result<ClassificationResult, ClassifierError> {
        if !self.is_configured() {
            return Ok(classify_by_keywords(data));
        }

        let response = self
            .client
            .post(format!("{}/classify", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|e| ClassifierError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Upstream(format!(
                "classify returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClassifierError::Upstream(e.to_string()))
    }

    /// Extracts text from a base64-encoded receipt image.
    pub async fn extract_receipt_text(
        &self,
        image_base64: &str,
    ) -> Result<OcrExpenseResult, ClassifierError> {
        // Strip a data-URL prefix if the client sent one
        let payload = image_base64
            .split_once(";base64,")
            .map(|(_, data)| data)
            .unwrap_or(image_base64);

        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ClassifierError::InvalidImage(e.to_string()))?;

        if !self.is_configured() {
            return Err(ClassifierError::NotConfigured);
        }

        let response = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "image": payload }))
            .send()
            .await
            .map_err(|e| ClassifierError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Upstream(format!(
                "ocr returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClassifierError::Upstream(e.to_string()))
    }
}

/// Keyword fallback used when no inference endpoint is configured.
fn classify_by_keywords(data: &str) -> ClassificationResult {
    let lower = data.to_lowercase();

    let category = if contains_any(&lower, &["grocer", "supermarket", "aldi", "lidl", "tesco"]) {
        "groceries"
    } else if contains_any(&lower, &["restaurant", "cafe", "coffee", "pizza", "lunch", "dinner"]) {
        "dining"
    } else if contains_any(&lower, &["uber", "taxi", "fuel", "petrol", "gas station", "train", "bus"]) {
        "transport"
    } else if contains_any(&lower, &["electric", "water bill", "internet", "rent", "utility"]) {
        "utilities"
    } else if contains_any(&lower, &["cinema", "movie", "netflix", "spotify", "concert"]) {
        "entertainment"
    } else if contains_any(&lower, &["hotel", "flight", "airbnb", "booking"]) {
        "travel"
    } else if contains_any(&lower, &["pharmacy", "doctor", "hospital", "dental"]) {
        "health"
    } else {
        "other"
    };

    ClassificationResult {
        category: category.to_string(),
        amount: None,
        name: None,
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> ClassifierService {
        ClassifierService::new(&ClassifierConfig::default())
    }

    #[tokio::test]
    async fn test_classify_fallback_groceries() {
        let result = unconfigured().classify("Tesco weekly shop").await.unwrap();
        assert_eq!(result.category, "groceries");
    }

    #[tokio::test]
    async fn test_classify_fallback_dining() {
        let result = unconfigured().classify("Pizza night").await.unwrap();
        assert_eq!(result.category, "dining");
    }

    #[tokio::test]
    async fn test_classify_fallback_unknown_is_other() {
        let result = unconfigured().classify("mystery purchase").await.unwrap();
        assert_eq!(result.category, "other");
    }

    #[tokio::test]
    async fn test_ocr_rejects_invalid_base64() {
        let result = unconfigured().extract_receipt_text("not base64 !!!").await;
        assert!(matches!(result, Err(ClassifierError::InvalidImage(_))));
    }

    #[tokio::test]
    async fn test_ocr_accepts_data_url_prefix_but_requires_config() {
        // Valid base64 behind a data-URL prefix fails only on configuration
        let payload = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(b"fake image bytes")
        );
        let result = unconfigured().extract_receipt_text(&payload).await;
        assert!(matches!(result, Err(ClassifierError::NotConfigured)));
    }

    #[test]
    fn test_categories_include_other() {
        assert!(CATEGORIES.contains(&"other"));
    }

    #[test]
    fn test_keyword_fallback_has_valid_categories() {
        for sample in ["tesco", "uber ride", "netflix", "hotel stay", "pharmacy"] {
            let result = classify_by_keywords(sample);
            assert!(CATEGORIES.contains(&result.category.as_str()));
        }
    }
}
