use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{AnalysisResult, ClothingType, COLOR_LABELS},
    services::{classifier::Classifier, labels::top_label},
};

pub const CLOTHING_ANALYSIS_FAILED: &str = "Clothing analysis request failed";
pub const COLOR_ANALYSIS_FAILED: &str = "Color analysis request failed";

/// Classifies a stored upload and looks up recommendations for it.
///
/// The garment type is classified first; if that fails the color call is
/// never made. Any classifier failure, including an empty ranking, becomes
/// [`AppError::ClassifierUnavailable`].
pub async fn analyze_image(
    state: &AppState,
    clothing_type: ClothingType,
    image: &[u8],
    image_url: String,
) -> AppResult<AnalysisResult> {
    let garment_label = classify_top_label(
        state.classifier.as_ref(),
        image,
        clothing_type.candidate_labels(),
        CLOTHING_ANALYSIS_FAILED,
    )
    .await?;

    let color_label = classify_top_label(
        state.classifier.as_ref(),
        image,
        &COLOR_LABELS,
        COLOR_ANALYSIS_FAILED,
    )
    .await?;

    let garment_recommendations = state.clothing_rules.recommend(&garment_label);
    let color_recommendations = state.color_rules.recommend(&color_label);

    tracing::info!(
        clothing_type = %clothing_type,
        garment = %garment_label,
        color = %color_label,
        garment_recommendations = garment_recommendations.len(),
        color_recommendations = color_recommendations.len(),
        "Analysis completed"
    );

    Ok(AnalysisResult {
        clothing_type,
        garment_label,
        color_label,
        garment_recommendations,
        color_recommendations,
        image_url,
    })
}

async fn classify_top_label(
    classifier: &dyn Classifier,
    image: &[u8],
    candidate_labels: &'static [&'static str],
    failure_message: &str,
) -> AppResult<String> {
    let result = match classifier.classify(image, candidate_labels).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = classifier.name(),
                "Classifier unavailable"
            );
            return Err(AppError::ClassifierUnavailable(failure_message.to_string()));
        }
    };

    match top_label(Some(result.as_slice())) {
        Some(label) => Ok(label.to_string()),
        None => {
            tracing::warn!(provider = classifier.name(), "Classifier returned no labels");
            Err(AppError::ClassifierUnavailable(failure_message.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::LabelScore,
        services::{
            classifier::{ClassifierError, MockClassifier},
            recommendations::{Rule, RuleTable},
            uploads::UploadStore,
        },
    };
    use std::sync::Arc;

    fn ranked(labels: &[&str], winner: &str) -> Vec<LabelScore> {
        let rest = 0.2 / labels.len() as f64;
        labels
            .iter()
            .map(|label| {
                let score = if *label == winner { 0.8 } else { rest };
                LabelScore::new(*label, score)
            })
            .collect()
    }

    fn state_with(classifier: MockClassifier, uploads: &tempfile::TempDir) -> AppState {
        let clothing_rules = RuleTable::new(vec![
            Rule::new("hoodie", "cargo pants", 2.5),
            Rule::new("hoodie", "sweat pants", 3.1),
            Rule::new("denim pants", "T-shirt", 1.9),
        ]);
        let color_rules = RuleTable::new(vec![Rule::new("black clothes", "grey clothes", 1.4)]);

        AppState::new(
            Arc::new(classifier),
            clothing_rules,
            color_rules,
            UploadStore::open(uploads.path()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_classifies_type_then_color_and_recommends() {
        let mut classifier = MockClassifier::new();
        let mut sequence = mockall::Sequence::new();
        classifier
            .expect_classify()
            .withf(|_, labels| labels.len() == 9)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, labels| Ok(ranked(labels, "hoodie")));
        classifier
            .expect_classify()
            .withf(|_, labels| labels.len() == 8)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, labels| Ok(ranked(labels, "black clothes")));
        classifier.expect_name().return_const("mock");

        let dir = tempfile::tempdir().unwrap();
        let state = state_with(classifier, &dir);

        let result = analyze_image(&state, ClothingType::Top, b"img", "/uploads/a.jpg".to_string())
            .await
            .unwrap();

        assert_eq!(result.garment_label, "hoodie");
        assert_eq!(result.color_label, "black clothes");
        assert_eq!(result.garment_recommendations, vec!["sweat pants", "cargo pants"]);
        assert_eq!(result.color_recommendations, vec!["grey clothes"]);
        assert_eq!(result.image_url, "/uploads/a.jpg");
    }

    #[tokio::test]
    async fn test_bottom_uses_bottom_labels() {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .withf(|_, labels| labels.len() == 6 && labels.contains(&"denim pants"))
            .times(1)
            .returning(|_, labels| Ok(ranked(labels, "denim pants")));
        classifier
            .expect_classify()
            .withf(|_, labels| labels.len() == 8)
            .times(1)
            .returning(|_, labels| Ok(ranked(labels, "navy clothes")));
        classifier.expect_name().return_const("mock");

        let dir = tempfile::tempdir().unwrap();
        let state = state_with(classifier, &dir);

        let result = analyze_image(&state, ClothingType::Bottom, b"img", String::new())
            .await
            .unwrap();

        assert_eq!(result.garment_label, "denim pants");
        assert_eq!(result.garment_recommendations, vec!["T-shirt"]);
        assert!(result.color_recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_type_failure_skips_color_call() {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_, _| Err(ClassifierError::Status(503)));
        classifier.expect_name().return_const("mock");

        let dir = tempfile::tempdir().unwrap();
        let state = state_with(classifier, &dir);

        let err = analyze_image(&state, ClothingType::Top, b"img", String::new())
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::ClassifierUnavailable(ref msg) if msg == CLOTHING_ANALYSIS_FAILED)
        );
    }

    #[tokio::test]
    async fn test_color_failure_reports_color_message() {
        let mut classifier = MockClassifier::new();
        let mut sequence = mockall::Sequence::new();
        classifier
            .expect_classify()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, labels| Ok(ranked(labels, "shirt")));
        classifier
            .expect_classify()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Err(ClassifierError::Malformed("not a list".to_string())));
        classifier.expect_name().return_const("mock");

        let dir = tempfile::tempdir().unwrap();
        let state = state_with(classifier, &dir);

        let err = analyze_image(&state, ClothingType::Top, b"img", String::new())
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::ClassifierUnavailable(ref msg) if msg == COLOR_ANALYSIS_FAILED)
        );
    }

    #[tokio::test]
    async fn test_empty_ranking_counts_as_unavailable() {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        classifier.expect_name().return_const("mock");

        let dir = tempfile::tempdir().unwrap();
        let state = state_with(classifier, &dir);

        let err = analyze_image(&state, ClothingType::Top, b"img", String::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ClassifierUnavailable(_)));
    }
}
