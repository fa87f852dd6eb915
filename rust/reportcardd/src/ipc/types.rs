use crate::calc::weighted_average;
use crate::card::ReportCard;
use crate::config::CardConfig;
use crate::session::EditSessions;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub card: ReportCard,
    pub sessions: EditSessions,
}

impl AppState {
    pub fn new(config: CardConfig) -> Self {
        Self {
            card: ReportCard::new(config),
            sessions: EditSessions::default(),
        }
    }

    /// Record plus the provenance of its stored average and the weighted
    /// average it would recompute to now.
    pub fn snapshot(&self) -> serde_json::Value {
        let w = weighted_average(&self.card.record().subjects);
        serde_json::json!({
            "record": self.card.record(),
            "averageSource": self.card.average_source(),
            "suggestedAverage": w.value,
            "weightedSum": w.weighted_sum,
            "coefficientSum": w.coefficient_sum,
        })
    }
}
