pub mod analysis;
pub mod garment;

pub use analysis::{AnalysisResult, AnalyzeResponse, LabelScore, ResultQuery};
pub use garment::{ClothingType, UnknownClothingType, BOTTOM_LABELS, COLOR_LABELS, TOP_LABELS};

/// Ranked output of one classifier call
pub type ClassifierResult = Vec<LabelScore>;
