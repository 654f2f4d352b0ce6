use std::collections::BTreeSet;

use crate::config::OpportunityRules;
use crate::model::{Badge, BusinessRecord, MergedRecord, ScoredRecord};

pub const MAX_SCORE: u32 = 100;

/// Opportunity score in [0, 100] plus the badges that earned it.
pub fn score_record(record: &BusinessRecord, rules: &OpportunityRules) -> (u8, BTreeSet<Badge>) {
    let mut score: u32 = 0;
    let mut badges = BTreeSet::new();

    if record
        .lookup_number("succession_risk_score")
        .is_some_and(|v| v > rules.succession_risk_above)
    {
        score = score.saturating_add(rules.succession_points);
        badges.insert(Badge::SuccessionTarget);
    }

    if record.lookup_str("market_context.market_maturity") == Some("developing") {
        score = score.saturating_add(rules.developing_market_points);
        badges.insert(Badge::GrowthMarket);
    }

    if record
        .lookup_str("market_context.demographic_profile")
        .is_some_and(|p| p.contains("high_income"))
    {
        score = score.saturating_add(rules.high_income_points);
        badges.insert(Badge::PremiumDemographic);
    }

    if record
        .lookup_number("market_share_percent")
        .is_some_and(|v| v > rules.market_share_above)
    {
        score = score.saturating_add(rules.market_share_points);
        badges.insert(Badge::MarketLeader);
    }

    if score > rules.high_opportunity_above {
        badges.insert(Badge::HighOpportunity);
    }

    (score.min(MAX_SCORE) as u8, badges)
}

/// Attach scores to merged records. Input order is preserved.
pub fn score_all(merged: Vec<MergedRecord>, rules: &OpportunityRules) -> Vec<ScoredRecord> {
    merged
        .into_iter()
        .map(|mut merged| {
            merged.strip_reserved();
            let (opportunity_score, badges) = score_record(&merged.record, rules);
            ScoredRecord {
                merged,
                opportunity_score,
                badges,
            }
        })
        .collect()
}

/// Wrap merged records without scoring them.
pub fn unscored(merged: Vec<MergedRecord>) -> Vec<ScoredRecord> {
    merged
        .into_iter()
        .map(|mut merged| {
            merged.strip_reserved();
            ScoredRecord {
                merged,
                opportunity_score: 0,
                badges: BTreeSet::new(),
            }
        })
        .collect()
}
