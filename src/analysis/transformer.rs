//! Reshapes the service's scoring payload into a [`TraitReport`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::analysis::report::{InsightItem, TraitAverages, TraitReport};

/// Success body of the analyze-profile endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisPayload {
    pub tweets_analyzed: u32,
    pub average_scores: TraitAverages,
    pub summary: InsightSummary,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub saved_to_db: bool,
}

/// `summary` object: category -> insight lines, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightSummary(pub Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for InsightSummary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SummaryVisitor;

        impl<'de> Visitor<'de> for SummaryVisitor {
            type Value = InsightSummary;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category to a list of insight strings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut categories = Vec::with_capacity(map.size_hint().unwrap_or(4));
                while let Some((category, lines)) = map.next_entry::<String, Vec<String>>()? {
                    categories.push((category, lines));
                }
                Ok(InsightSummary(categories))
            }
        }

        deserializer.deserialize_map(SummaryVisitor)
    }
}

impl InsightSummary {
    /// Flatten into `{category, text}` pairs. No sorting, no dedup.
    pub fn flatten(&self) -> Vec<InsightItem> {
        self.0
            .iter()
            .flat_map(|(category, lines)| {
                lines.iter().map(move |text| InsightItem::new(category, text))
            })
            .collect()
    }
}

/// Transform a shape-checked payload, stamping it with the current time.
pub fn transform(payload: &AnalysisPayload) -> TraitReport {
    transform_at(payload, Utc::now())
}

/// Transform with an explicit `analyzed_at`.
pub fn transform_at(payload: &AnalysisPayload, analyzed_at: DateTime<Utc>) -> TraitReport {
    TraitReport {
        analyzed_at,
        tweets_analyzed: payload.tweets_analyzed,
        trait_averages: payload.average_scores,
        insights: payload.summary.flatten(),
        profile_username: payload.username.clone(),
        saved_to_history: payload.saved_to_db,
    }
}
