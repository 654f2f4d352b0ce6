//! Record similarity on a 0–100 scale.
//!
//! Name and address are compared with a fuzzy ratio; phone and website are
//! compared after normalization and only count when both records carry one.
//! The composite is the weighted mean of participating fields.

use crate::config::{EmptyFieldPolicy, FuzzyMethod, MatchConfig};
use crate::model::BusinessRecord;
use crate::normalize::{normalize_phone, normalize_text, normalize_website};

/// Pairwise record similarity in [0, 100]. Must be symmetric and pure.
pub trait Similarity {
    fn similarity(&self, a: &BusinessRecord, b: &BusinessRecord) -> f64;
}

/// Similarity under the default matching config (name 0.7, address 0.3).
pub fn similarity(a: &BusinessRecord, b: &BusinessRecord) -> f64 {
    WeightedSimilarity::default().similarity(a, b)
}

// ---------------------------------------------------------------------------
// Fuzzy ratios
// ---------------------------------------------------------------------------

/// Normalized edit-distance ratio. Two empty strings score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best [`ratio`] of the shorter string against every equal-length window
/// of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == b_len {
        return ratio(a, b);
    }
    let (short, long, short_len) = if a_len < b_len { (a, b, a_len) } else { (b, a, b_len) };

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0_f64;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        best = best.max(ratio(short, &candidate));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// [`ratio`] after sorting whitespace-separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

pub fn fuzzy(method: FuzzyMethod, a: &str, b: &str) -> f64 {
    match method {
        FuzzyMethod::Ratio => ratio(a, b),
        FuzzyMethod::Partial => partial_ratio(a, b),
        FuzzyMethod::TokenSort => token_sort_ratio(a, b),
    }
}

// ---------------------------------------------------------------------------
// Contact fields
// ---------------------------------------------------------------------------

/// Compare digit-only phone numbers. A shared 10-digit tail counts as equal
/// so a leading country code doesn't split records.
fn phone_score(a: &str, b: &str) -> f64 {
    if a == b {
        return 100.0;
    }
    if a.len() >= 10 && b.len() >= 10 && a[a.len() - 10..] == b[b.len() - 10..] {
        return 100.0;
    }
    ratio(a, b)
}

fn website_score(a: &str, b: &str) -> f64 {
    if a == b { 100.0 } else { ratio(a, b) }
}

// ---------------------------------------------------------------------------
// Weighted composite
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct WeightedSimilarity {
    config: MatchConfig,
}

impl WeightedSimilarity {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }
}

impl Similarity for WeightedSimilarity {
    fn similarity(&self, a: &BusinessRecord, b: &BusinessRecord) -> f64 {
        let weights = &self.config.weights;
        let keep_blank = self.config.empty_fields == EmptyFieldPolicy::Match;
        let mut weighted = 0.0;
        let mut total = 0.0;

        let textual = [
            (weights.name, Some(a.name.as_str()), Some(b.name.as_str())),
            (weights.address, a.address.as_deref(), b.address.as_deref()),
        ];
        for (weight, left, right) in textual {
            if weight <= 0.0 {
                continue;
            }
            let (left, right) = (normalize_text(left), normalize_text(right));
            if !keep_blank && (left.is_empty() || right.is_empty()) {
                continue;
            }
            weighted += weight * fuzzy(self.config.method, &left, &right);
            total += weight;
        }

        if weights.phone > 0.0 {
            let (left, right) = (
                normalize_phone(a.phone.as_deref()),
                normalize_phone(b.phone.as_deref()),
            );
            if !left.is_empty() && !right.is_empty() {
                weighted += weights.phone * phone_score(&left, &right);
                total += weights.phone;
            }
        }

        if weights.website > 0.0 {
            let (left, right) = (
                normalize_website(a.website.as_deref()),
                normalize_website(b.website.as_deref()),
            );
            if !left.is_empty() && !right.is_empty() {
                weighted += weights.website * website_score(&left, &right);
                total += weights.website;
            }
        }

        if total <= 0.0 {
            return 0.0;
        }
        (weighted / total).clamp(0.0, 100.0)
    }
}
