use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SparePart {
    pub name: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub date: NaiveDate,
    pub phone_number: String,
    #[serde(default)]
    pub avg_km_per_month: Option<f64>,
    #[serde(default)]
    pub spare_parts: Vec<SparePart>,
}

// Wire shape shared by both prediction endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PredictionsResponse {
    pub predictions: Vec<Prediction>,
}

/// Predictions grouped by calendar day, in arrival order within each day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionsByDate {
    groups: BTreeMap<NaiveDate, Vec<Prediction>>,
}

impl PredictionsByDate {
    pub fn group(predictions: &[Prediction]) -> Self {
        let mut groups: BTreeMap<NaiveDate, Vec<Prediction>> = BTreeMap::new();
        for prediction in predictions {
            groups
                .entry(prediction.date)
                .or_default()
                .push(prediction.clone());
        }
        Self { groups }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[Prediction])> + '_ {
        self.groups.iter().map(|(day, items)| (*day, items.as_slice()))
    }
}
