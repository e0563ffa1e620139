/// Hugging Face Inference API classifier
///
/// Posts the image as base64 together with the candidate labels to a
/// zero-shot image classification model (fashion-clip by default) and
/// expects a JSON array of `{label, score}` back.
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Serialize;
use std::time::Duration;

use super::{Classifier, ClassifierError};
use crate::models::{ClassifierResult, LabelScore};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: String,
    parameters: InferenceParameters<'a>,
}

#[derive(Debug, Serialize)]
struct InferenceParameters<'a> {
    candidate_labels: &'a [&'a str],
}

#[derive(Clone)]
pub struct HuggingFaceClassifier {
    http_client: HttpClient,
    api_url: String,
    api_token: Option<String>,
}

impl HuggingFaceClassifier {
    pub fn new(
        api_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
            api_token,
        })
    }

    /// Parses and validates a successful response body
    fn parse_response(body: &str) -> Result<ClassifierResult, ClassifierError> {
        let entries: Vec<LabelScore> = serde_json::from_str(body)
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        if let Some(bad) = entries.iter().find(|entry| !entry.is_valid()) {
            return Err(ClassifierError::Malformed(format!(
                "invalid entry {:?} with score {}",
                bad.label, bad.score
            )));
        }

        Ok(entries)
    }
}

#[async_trait::async_trait]
impl Classifier for HuggingFaceClassifier {
    async fn classify(
        &self,
        image: &[u8],
        candidate_labels: &'static [&'static str],
    ) -> Result<ClassifierResult, ClassifierError> {
        let payload = InferenceRequest {
            inputs: general_purpose::STANDARD.encode(image),
            parameters: InferenceParameters { candidate_labels },
        };

        let mut request = self.http_client.post(&self.api_url).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                body = %body,
                provider = self.name(),
                "Classifier returned an error status"
            );
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let result = Self::parse_response(&body)?;

        tracing::info!(
            candidates = candidate_labels.len(),
            results = result.len(),
            provider = self.name(),
            "Classification completed"
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "hugging_face"
    }
}
