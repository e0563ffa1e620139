/// Zero-shot image classification
///
/// The rest of the service only talks to the [`Classifier`] trait so the
/// remote model can be swapped or stubbed. Every failure mode is reported
/// as a [`ClassifierError`]; callers treat all of them as "classifier
/// unavailable".
use crate::models::ClassifierResult;

pub mod hugging_face;

pub use hugging_face::HuggingFaceClassifier;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Request to classifier failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Classifier returned status {0}")]
    Status(u16),

    #[error("Malformed classifier response: {0}")]
    Malformed(String),
}

/// Ranks candidate labels for an image
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Scores each of `candidate_labels` against the image.
    ///
    /// The returned entries are validated but not necessarily sorted.
    async fn classify(
        &self,
        image: &[u8],
        candidate_labels: &'static [&'static str],
    ) -> Result<ClassifierResult, ClassifierError>;

    /// Classifier name for logging
    fn name(&self) -> &'static str;
}
