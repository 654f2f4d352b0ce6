use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One business listing as reported by a single data source.
///
/// The four matchable fields and `source` are named; everything else a
/// provider returns (revenue, market context, ...) rides along in `extra`
/// and is flattened back out on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(default, deserialize_with = "lenient_required")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_optional", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_required")]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BusinessRecord {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Look up a pass-through field by dotted path (`market_context.market_maturity`).
    ///
    /// A literal key containing dots (as produced by flattened CSV headers)
    /// wins over nested traversal.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(v) = self.extra.get(path) {
            return Some(v);
        }
        let mut parts = path.split('.');
        let mut current = self.extra.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Numeric pass-through field. Numeric strings are accepted.
    pub fn lookup_number(&self, path: &str) -> Option<f64> {
        match self.lookup(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn lookup_str(&self, path: &str) -> Option<&str> {
        self.lookup(path)?.as_str()
    }
}

/// Records from one upstream provider, in the order the provider returned them.
#[derive(Debug, Clone, Default)]
pub struct SourceRecords {
    pub name: String,
    pub records: Vec<BusinessRecord>,
}

/// Pre-loaded records, one entry per source, in processing order.
#[derive(Debug, Clone, Default)]
pub struct DedupInput {
    pub sources: Vec<SourceRecords>,
}

// ---------------------------------------------------------------------------
// Merge output
// ---------------------------------------------------------------------------

/// Canonical entity for one or more records judged to be the same business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(flatten)]
    pub record: BusinessRecord,
    #[serde(default)]
    pub data_sources: BTreeSet<String>,
    #[serde(default = "one")]
    pub member_count: usize,
}

fn one() -> usize {
    1
}

/// Keys owned by the merge/score output; stripped from pass-through fields
/// so they can't collide on serialization.
const RESERVED_KEYS: [&str; 4] = ["data_sources", "member_count", "opportunity_score", "badges"];

impl MergedRecord {
    /// Start a new canonical entry from the first record seen for it.
    pub fn from_record(record: &BusinessRecord) -> Self {
        let mut record = record.clone();
        for key in RESERVED_KEYS {
            record.extra.remove(key);
        }
        let data_sources = BTreeSet::from([record.source.clone()]);
        Self {
            record,
            data_sources,
            member_count: 1,
        }
    }

    /// Fold a later duplicate in. Only provenance changes; the first-seen
    /// record's fields are kept.
    pub fn absorb(&mut self, record: &BusinessRecord) {
        self.data_sources.insert(record.source.clone());
        self.member_count += 1;
    }

    pub(crate) fn strip_reserved(&mut self) {
        for key in RESERVED_KEYS {
            self.record.extra.remove(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Opportunity scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Succession Target")]
    SuccessionTarget,
    #[serde(rename = "Growth Market")]
    GrowthMarket,
    #[serde(rename = "Premium Demographic")]
    PremiumDemographic,
    #[serde(rename = "Market Leader")]
    MarketLeader,
    #[serde(rename = "High Opportunity")]
    HighOpportunity,
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuccessionTarget => write!(f, "Succession Target"),
            Self::GrowthMarket => write!(f, "Growth Market"),
            Self::PremiumDemographic => write!(f, "Premium Demographic"),
            Self::MarketLeader => write!(f, "Market Leader"),
            Self::HighOpportunity => write!(f, "High Opportunity"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub merged: MergedRecord,
    pub opportunity_score: u8,
    pub badges: BTreeSet<Badge>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupSummary {
    pub input_records: usize,
    pub merged_records: usize,
    pub duplicates_folded: usize,
    pub multi_source_records: usize,
    pub high_opportunity: usize,
    pub source_counts: BTreeMap<String, usize>,
    pub badge_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupMeta {
    pub config_name: String,
    pub threshold: f64,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupResult {
    pub meta: DedupMeta,
    pub summary: DedupSummary,
    pub records: Vec<ScoredRecord>,
}

// ---------------------------------------------------------------------------
// Lenient field parsing
// ---------------------------------------------------------------------------

/// Providers disagree on types (`"phone": 5551234`). Scalars become strings,
/// null and structured values become absent.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

fn lenient_required<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}
