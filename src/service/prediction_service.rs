use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::clients::prediction_client::{
    all_predictions_url, day_predictions_url, fetch_predictions, FetchError,
};
use crate::models::prediction::Prediction;

#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Prediction>, FetchError>;
    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Prediction>, FetchError>;
}

pub struct PredictionService {
    base_url: String,
    client: reqwest::Client,
}

impl PredictionService {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl PredictionSource for PredictionService {
    async fn fetch_all(&self) -> Result<Vec<Prediction>, FetchError> {
        fetch_predictions(&self.client, &all_predictions_url(&self.base_url)).await
    }

    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Prediction>, FetchError> {
        fetch_predictions(&self.client, &day_predictions_url(&self.base_url, day)).await
    }
}
