use crate::models::LabelScore;

/// Returns the label with the highest score.
///
/// When several entries share the maximum score the first one in response
/// order wins. Absent or empty input yields `None`.
pub fn top_label(result: Option<&[LabelScore]>) -> Option<&str> {
    result?
        .iter()
        .reduce(|best, candidate| {
            if candidate.score > best.score {
                candidate
            } else {
                best
            }
        })
        .map(|entry| entry.label.as_str())
}
