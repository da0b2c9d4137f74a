use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::models::prediction::{Prediction, PredictionsResponse};
use crate::service::date_utils::format_date_key;

/// Every way a prediction fetch can go wrong. Callers treat all variants alike.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("response from {url} is not a predictions payload: {details}")]
    Decode { url: String, details: String },
}

pub fn all_predictions_url(base_url: &str) -> String {
    format!("{}/api/predictions", base_url.trim_end_matches('/'))
}

pub fn day_predictions_url(base_url: &str, day: NaiveDate) -> String {
    format!(
        "{}/api/predictions/{}",
        base_url.trim_end_matches('/'),
        format_date_key(day)
    )
}

pub async fn fetch_predictions(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Prediction>, FetchError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    // Read once so a bad body can be reported.
    let text = response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;
    let parsed: PredictionsResponse =
        serde_json::from_str(&text).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            details: e.to_string(),
        })?;

    debug!(url, count = parsed.predictions.len(), "fetched predictions");
    Ok(parsed.predictions)
}
