use serde::{Deserialize, Serialize};

use super::ClothingType;

/// One entry of a zero-shot classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Scores must be probabilities and labels non-empty
    pub fn is_valid(&self) -> bool {
        !self.label.trim().is_empty() && self.score.is_finite() && (0.0..=1.0).contains(&self.score)
    }
}

/// Everything learned about one uploaded garment
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub clothing_type: ClothingType,
    pub garment_label: String,
    pub color_label: String,
    pub garment_recommendations: Vec<String>,
    pub color_recommendations: Vec<String>,
    pub image_url: String,
}

/// Successful `POST /analyze` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub label: String,
    pub clothing_type: ClothingType,
    pub color_result: String,
    /// Comma-joined list
    pub clothing_recommendations: String,
    /// Comma-joined list
    pub color_recommendations: String,
    pub image_url: String,
    pub redirect_url: String,
}

impl AnalyzeResponse {
    pub fn new(result: AnalysisResult, redirect_url: String) -> Self {
        Self {
            success: true,
            label: result.garment_label,
            clothing_type: result.clothing_type,
            color_result: result.color_label,
            clothing_recommendations: result.garment_recommendations.join(","),
            color_recommendations: result.color_recommendations.join(","),
            image_url: result.image_url,
            redirect_url,
        }
    }
}

/// Query string accepted by the result views
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultQuery {
    pub label: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub clothing_recommendations: Option<String>,
    pub color_recommendations: Option<String>,
}

impl ResultQuery {
    pub fn clothing_recommendations(&self) -> Vec<String> {
        split_list(self.clothing_recommendations.as_deref())
    }

    pub fn color_recommendations(&self) -> Vec<String> {
        split_list(self.color_recommendations.as_deref())
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
