use std::collections::HashSet;

use serde::Deserialize;

use crate::error::DedupError;
use crate::opportunity::MAX_SCORE;

/// Records whose composite similarity is strictly above this are duplicates.
pub const DEFAULT_THRESHOLD: f64 = 85.0;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub opportunity: OpportunityConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub file: String,
    /// Inferred from the file extension when absent.
    #[serde(default)]
    pub format: Option<RecordFormat>,
}

impl SourceConfig {
    pub fn resolved_format(&self) -> RecordFormat {
        self.format.unwrap_or_else(|| {
            if self.file.to_ascii_lowercase().ends_with(".csv") {
                RecordFormat::Csv
            } else {
                RecordFormat::Json
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    Json,
    Csv,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub method: FuzzyMethod,
    #[serde(default)]
    pub empty_fields: EmptyFieldPolicy,
    #[serde(default)]
    pub weights: FieldWeights,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            method: FuzzyMethod::default(),
            empty_fields: EmptyFieldPolicy::default(),
            weights: FieldWeights::default(),
        }
    }
}

/// String comparison used for name and address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyMethod {
    /// Whole-string normalized edit distance.
    Ratio,
    /// Best window of the longer string against the shorter one.
    #[default]
    Partial,
    /// Whitespace tokens sorted before comparing.
    TokenSort,
}

/// How a field that is blank on both records contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyFieldPolicy {
    /// Blank name/address on both sides compare as identical (100).
    #[default]
    Match,
    /// Any field blank on either side drops out of the weighted average.
    Ignore,
}

/// Fields left out of a `[matching.weights]` table keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub address: f64,
    pub phone: f64,
    pub website: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 0.7,
            address: 0.3,
            phone: 0.0,
            website: 0.0,
        }
    }
}

impl FieldWeights {
    /// Name/address/phone/website weighting for richer provider data.
    pub fn extended() -> Self {
        Self {
            name: 0.5,
            address: 0.2,
            phone: 0.2,
            website: 0.1,
        }
    }

    fn all(&self) -> [(&'static str, f64); 4] {
        [
            ("name", self.name),
            ("address", self.address),
            ("phone", self.phone),
            ("website", self.website),
        ]
    }
}

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OpportunityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub rules: OpportunityRules,
}

fn default_true() -> bool {
    true
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: OpportunityRules::default(),
        }
    }
}

/// Point table for the opportunity score. Comparisons are strict (`>`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpportunityRules {
    pub succession_risk_above: f64,
    pub succession_points: u32,
    pub developing_market_points: u32,
    pub high_income_points: u32,
    pub market_share_above: f64,
    pub market_share_points: u32,
    pub high_opportunity_above: u32,
}

impl Default for OpportunityRules {
    fn default() -> Self {
        Self {
            succession_risk_above: 70.0,
            succession_points: 30,
            developing_market_points: 20,
            high_income_points: 15,
            market_share_above: 15.0,
            market_share_points: 15,
            high_opportunity_above: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl DedupConfig {
    /// Config with defaults and no sources, for callers that hand records
    /// to the engine directly.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            matching: MatchConfig::default(),
            opportunity: OpportunityConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, DedupError> {
        let config: DedupConfig =
            toml::from_str(input).map_err(|e| DedupError::ConfigParse(e.to_string()))?;
        config.validate()?;
        if config.sources.is_empty() {
            return Err(DedupError::ConfigValidation(
                "at least one [[sources]] entry is required".into(),
            ));
        }
        Ok(config)
    }

    /// Checks everything except source presence, so in-memory configs
    /// built with [`DedupConfig::named`] validate too.
    pub fn validate(&self) -> Result<(), DedupError> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(DedupError::ConfigValidation(format!(
                    "source for file '{}' has an empty name",
                    source.file
                )));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(DedupError::DuplicateSource(source.name.clone()));
            }
        }

        self.matching.validate()?;
        self.opportunity.rules.validate()
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), DedupError> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(DedupError::ConfigValidation(format!(
                "threshold must be between 0 and 100, got {}",
                self.threshold
            )));
        }

        let mut total = 0.0;
        for (field, weight) in self.weights.all() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DedupError::ConfigValidation(format!(
                    "weight for '{field}' must be a non-negative number, got {weight}"
                )));
            }
            total += weight;
        }
        if total <= 0.0 {
            return Err(DedupError::ConfigValidation(
                "at least one field weight must be positive".into(),
            ));
        }

        Ok(())
    }
}

impl OpportunityRules {
    pub fn validate(&self) -> Result<(), DedupError> {
        let points = [
            ("succession_points", self.succession_points),
            ("developing_market_points", self.developing_market_points),
            ("high_income_points", self.high_income_points),
            ("market_share_points", self.market_share_points),
            ("high_opportunity_above", self.high_opportunity_above),
        ];
        for (field, value) in points {
            if value > MAX_SCORE {
                return Err(DedupError::ConfigValidation(format!(
                    "opportunity rule '{field}' must be at most {MAX_SCORE}, got {value}"
                )));
            }
        }

        for (field, value) in [
            ("succession_risk_above", self.succession_risk_above),
            ("market_share_above", self.market_share_above),
        ] {
            if !value.is_finite() {
                return Err(DedupError::ConfigValidation(format!(
                    "opportunity rule '{field}' must be a finite number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Denver HVAC scan"

[[sources]]
name = "yelp"
file = "yelp.json"

[[sources]]
name = "dataaxle"
file = "dataaxle.csv"

[[sources]]
name = "google"
file = "google.export"
format = "json"
"#;

    #[test]
    fn parse_defaults() {
        let config = DedupConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Denver HVAC scan");
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.matching.threshold, 85.0);
        assert_eq!(config.matching.method, FuzzyMethod::Partial);
        assert_eq!(config.matching.empty_fields, EmptyFieldPolicy::Match);
        assert_eq!(config.matching.weights.name, 0.7);
        assert_eq!(config.matching.weights.address, 0.3);
        assert_eq!(config.matching.weights.phone, 0.0);
        assert!(config.opportunity.enabled);
        assert_eq!(config.opportunity.rules.succession_points, 30);
        assert!(config.output.json.is_none());
    }

    #[test]
    fn source_format_inference() {
        let config = DedupConfig::from_toml(VALID).unwrap();
        assert_eq!(config.sources[0].resolved_format(), RecordFormat::Json);
        assert_eq!(config.sources[1].resolved_format(), RecordFormat::Csv);
        assert_eq!(config.sources[2].resolved_format(), RecordFormat::Json);
    }

    #[test]
    fn parse_matching_and_rules() {
        let input = format!(
            r#"{VALID}
[matching]
threshold = 90
method = "token_sort"
empty_fields = "ignore"

[matching.weights]
name = 0.5
address = 0.2
phone = 0.2
website = 0.1

[opportunity]
enabled = false

[opportunity.rules]
succession_points = 40
"#
        );
        let config = DedupConfig::from_toml(&input).unwrap();
        assert_eq!(config.matching.threshold, 90.0);
        assert_eq!(config.matching.method, FuzzyMethod::TokenSort);
        assert_eq!(config.matching.empty_fields, EmptyFieldPolicy::Ignore);
        assert_eq!(config.matching.weights.website, 0.1);
        assert!(!config.opportunity.enabled);
        assert_eq!(config.opportunity.rules.succession_points, 40);
        // Unset rule fields keep their defaults
        assert_eq!(config.opportunity.rules.developing_market_points, 20);
    }

    #[test]
    fn partial_weights_keep_defaults() {
        let input = format!("{VALID}\n[matching.weights]\nphone = 0.2\n");
        let config = DedupConfig::from_toml(&input).unwrap();
        let w = &config.matching.weights;
        assert_eq!(w.name, 0.7);
        assert_eq!(w.address, 0.3);
        assert_eq!(w.phone, 0.2);
        assert_eq!(w.website, 0.0);
    }

    #[test]
    fn reject_oversized_rule_points() {
        let input = format!("{VALID}\n[opportunity.rules]\nsuccession_points = 4294967295\n");
        let err = DedupConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("'succession_points' must be at most 100"));

        let input = format!("{VALID}\n[opportunity.rules]\nmarket_share_points = 100\n");
        assert!(DedupConfig::from_toml(&input).is_ok());
    }

    #[test]
    fn reject_no_sources() {
        let err = DedupConfig::from_toml("name = \"empty\"").unwrap_err();
        assert!(err.to_string().contains("[[sources]]"));
    }

    #[test]
    fn reject_duplicate_source() {
        let input = r#"
name = "dup"
[[sources]]
name = "yelp"
file = "a.json"
[[sources]]
name = "yelp"
file = "b.json"
"#;
        let err = DedupConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, DedupError::DuplicateSource(ref s) if s == "yelp"));
    }

    #[test]
    fn reject_threshold_out_of_range() {
        let input = format!("{VALID}\n[matching]\nthreshold = 120\n");
        let err = DedupConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("threshold must be between 0 and 100"));
    }

    #[test]
    fn reject_zero_weights() {
        let input = format!(
            "{VALID}\n[matching.weights]\nname = 0\naddress = 0\n"
        );
        let err = DedupConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("at least one field weight"));
    }

    #[test]
    fn reject_negative_weight() {
        let input = format!("{VALID}\n[matching.weights]\nname = 1.0\nphone = -0.5\n");
        let err = DedupConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("'phone'"));
    }

    #[test]
    fn reject_unknown_method() {
        let input = format!("{VALID}\n[matching]\nmethod = \"soundex\"\n");
        let err = DedupConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, DedupError::ConfigParse(_)));
    }

    #[test]
    fn named_config_validates() {
        let config = DedupConfig::named("in-memory");
        assert!(config.validate().is_ok());
        assert!(config.sources.is_empty());
    }
}
