use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Candidate labels offered to the classifier for tops
pub const TOP_LABELS: [&str; 9] = [
    "knitwear",
    "shirt",
    "polo",
    "suit jacket",
    "T-shirt",
    "jacket",
    "coat",
    "hoodie",
    "sweat shirt",
];

/// Candidate labels offered to the classifier for bottoms
pub const BOTTOM_LABELS: [&str; 6] = [
    "cotton pants",
    "sweat pants",
    "denim pants",
    "cargo pants",
    "shorts",
    "dress pants",
];

/// Candidate labels for color classification, shared by every garment category
pub const COLOR_LABELS: [&str; 8] = [
    "blue clothes",
    "black clothes",
    "red clothes",
    "white clothes",
    "grey clothes",
    "beige clothes",
    "green clothes",
    "navy clothes",
];

/// Garment category chosen by the user on upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingType {
    Top,
    Bottom,
}

impl ClothingType {
    pub fn candidate_labels(&self) -> &'static [&'static str] {
        match self {
            ClothingType::Top => &TOP_LABELS,
            ClothingType::Bottom => &BOTTOM_LABELS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingType::Top => "top",
            ClothingType::Bottom => "bottom",
        }
    }

    /// Path of the result view for this category
    pub fn result_path(&self) -> &'static str {
        match self {
            ClothingType::Top => "/result/top",
            ClothingType::Bottom => "/result/bottom",
        }
    }
}

impl Display for ClothingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Unknown clothing type: {0}")]
pub struct UnknownClothingType(pub String);

impl FromStr for ClothingType {
    type Err = UnknownClothingType;

    /// Accepts the English form values and the Korean ones the first
    /// version of the upload form posted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" | "상의" => Ok(ClothingType::Top),
            "bottom" | "하의" => Ok(ClothingType::Bottom),
            other => Err(UnknownClothingType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_set_sizes() {
        assert_eq!(ClothingType::Top.candidate_labels().len(), 9);
        assert_eq!(ClothingType::Bottom.candidate_labels().len(), 6);
        assert_eq!(COLOR_LABELS.len(), 8);
    }

    #[test]
    fn test_parse_clothing_type() {
        assert_eq!("top".parse(), Ok(ClothingType::Top));
        assert_eq!(" bottom ".parse(), Ok(ClothingType::Bottom));
        assert_eq!("상의".parse(), Ok(ClothingType::Top));
        assert_eq!("하의".parse(), Ok(ClothingType::Bottom));
        assert_eq!(
            "shoes".parse::<ClothingType>(),
            Err(UnknownClothingType("shoes".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&ClothingType::Bottom).unwrap();
        assert_eq!(json, r#""bottom""#);
    }

    #[test]
    fn test_result_paths() {
        assert_eq!(ClothingType::Top.result_path(), "/result/top");
        assert_eq!(ClothingType::Bottom.result_path(), "/result/bottom");
    }
}
