use anyhow::Context;
use reqwest::Url;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    classifier::{Classifier, HuggingFaceClassifier},
    recommendations::RuleTable,
    uploads::UploadStore,
};

/// Shared application state
///
/// Built once at startup and never mutated afterwards, so handlers only
/// need read access.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub clothing_rules: Arc<RuleTable>,
    pub color_rules: Arc<RuleTable>,
    pub uploads: Arc<UploadStore>,
    /// Base for absolute redirect URLs; the request's Host header is used when unset
    pub public_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        clothing_rules: RuleTable,
        color_rules: RuleTable,
        uploads: UploadStore,
    ) -> Self {
        Self {
            classifier,
            clothing_rules: Arc::new(clothing_rules),
            color_rules: Arc::new(color_rules),
            uploads: Arc::new(uploads),
            public_url: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }

    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Loads rule tables, prepares the upload directory and builds the
    /// remote classifier described by `config`
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if let Some(public_url) = &config.public_url {
            Url::parse(public_url)
                .with_context(|| format!("PUBLIC_URL is not a valid URL: {}", public_url))?;
        }

        let clothing_rules = RuleTable::load(&config.clothing_rules_path)?;
        let color_rules = RuleTable::load(&config.color_rules_path)?;

        let uploads = UploadStore::open(&config.upload_dir).with_context(|| {
            format!("Failed to create upload directory {}", config.upload_dir.display())
        })?;

        let classifier = HuggingFaceClassifier::new(
            config.classifier_api_url.clone(),
            config.classifier_api_token.clone(),
            config.classifier_timeout(),
        )
        .context("Failed to build classifier HTTP client")?;

        if config.classifier_api_token.is_none() {
            tracing::warn!("CLASSIFIER_API_TOKEN is not set; calling the classifier anonymously");
        }

        Ok(Self::new(Arc::new(classifier), clothing_rules, color_rules, uploads)
            .with_public_url(config.public_url.clone())
            .with_max_upload_bytes(config.max_upload_bytes))
    }
}
