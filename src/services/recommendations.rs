use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Number of consequents returned per lookup
pub const MAX_RECOMMENDATIONS: usize = 3;

/// One precomputed association rule
///
/// Field names follow the column headers of the exported rule sheets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rule {
    #[serde(rename = "antecedents")]
    pub antecedent: String,
    #[serde(rename = "consequents")]
    pub consequent: String,
    pub lift: f64,
}

impl Rule {
    pub fn new(antecedent: impl Into<String>, consequent: impl Into<String>, lift: f64) -> Self {
        Self {
            antecedent: antecedent.into(),
            consequent: consequent.into(),
            lift,
        }
    }
}

/// Read-only association rule table, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Loads a table from a JSON array of rule rows
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule table {}", path.display()))?;
        let rules: Vec<Rule> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse rule table {}", path.display()))?;

        if let Some(bad) = rules.iter().position(|rule| !rule.lift.is_finite()) {
            anyhow::bail!("Rule {} in {} has a non-finite lift", bad, path.display());
        }

        tracing::info!(path = %path.display(), rules = rules.len(), "Loaded rule table");

        Ok(Self::new(rules))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Top consequents for `antecedent`, strongest lift first.
    ///
    /// The sort is stable, so rules with equal lift keep their table order.
    pub fn recommend(&self, antecedent: &str) -> Vec<String> {
        let mut matches: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| rule.antecedent == antecedent)
            .collect();

        matches.sort_by(|a, b| b.lift.total_cmp(&a.lift));

        matches
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|rule| rule.consequent.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn shirt_table() -> RuleTable {
        RuleTable::new(vec![
            Rule::new("shirt", "jacket", 5.0),
            Rule::new("shirt", "coat", 3.0),
            Rule::new("hoodie", "cargo pants", 9.0),
            Rule::new("shirt", "hoodie", 4.0),
            Rule::new("shirt", "scarf", 1.0),
        ])
    }

    #[test]
    fn test_top_three_by_lift() {
        assert_eq!(shirt_table().recommend("shirt"), vec!["jacket", "hoodie", "coat"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(shirt_table().recommend("shorts").is_empty());
        assert!(RuleTable::default().recommend("shirt").is_empty());
    }

    #[test]
    fn test_fewer_than_three_matches() {
        let table = RuleTable::new(vec![
            Rule::new("polo", "shorts", 1.2),
            Rule::new("polo", "cotton pants", 2.4),
        ]);
        assert_eq!(table.recommend("polo"), vec!["cotton pants", "shorts"]);

        assert_eq!(shirt_table().recommend("hoodie"), vec!["cargo pants"]);
    }

    #[test]
    fn test_equal_lift_keeps_table_order() {
        let table = RuleTable::new(vec![
            Rule::new("coat", "dress pants", 2.0),
            Rule::new("coat", "denim pants", 3.0),
            Rule::new("coat", "cotton pants", 2.0),
            Rule::new("coat", "shorts", 2.0),
        ]);
        assert_eq!(
            table.recommend("coat"),
            vec!["denim pants", "dress pants", "cotton pants"]
        );
    }

    #[test]
    fn test_antecedent_match_is_exact() {
        let table = RuleTable::new(vec![Rule::new("sweat shirt", "sweat pants", 3.0)]);
        assert!(table.recommend("shirt").is_empty());
        assert!(table.recommend("Sweat Shirt").is_empty());
    }

    #[test]
    fn test_load_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"antecedents": "black clothes", "consequents": "white clothes", "lift": 1.8}},
                {{"antecedents": "black clothes", "consequents": "grey clothes", "lift": 2.1}}
            ]"#
        )
        .unwrap();

        let table = RuleTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.recommend("black clothes"),
            vec!["grey clothes", "white clothes"]
        );
    }

    #[test]
    fn test_load_rejects_malformed_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"antecedents": "shirt", "lift": 1.0}}]"#).unwrap();

        assert!(RuleTable::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = RuleTable::load(Path::new("/nonexistent/rules.json"));
        assert!(result.is_err());
    }
}
