use chrono::NaiveDate;

use crate::clients::prediction_client::FetchError;
use crate::models::prediction::Prediction;
use crate::service::date_utils::format_display_date;
use crate::service::prediction_service::PredictionSource;

#[derive(Debug, Clone, PartialEq)]
pub struct PartLine {
    pub name: String,
    pub reason: String,
    pub price: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
    pub phone_number: String,
    pub usage: String,
    pub parts: Vec<PartLine>,
}

/// Full contents of the details panel; always replaced as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsContent {
    Empty { message: String },
    Services { heading: String, entries: Vec<ServiceEntry> },
}

impl DetailsContent {
    pub fn to_text(&self) -> String {
        match self {
            DetailsContent::Empty { message } => message.clone(),
            DetailsContent::Services { heading, entries } => {
                let mut body = format!("{}\n", heading);
                for entry in entries {
                    body.push_str(&format!("\n  {}\n", entry.phone_number));
                    body.push_str(&format!("    {}\n", entry.usage));
                    body.push_str("    Spare Parts:\n");
                    for part in &entry.parts {
                        match part.price {
                            Some(price) => body.push_str(&format!(
                                "      {} - {} ({})\n",
                                part.name, part.reason, price
                            )),
                            None => {
                                body.push_str(&format!("      {} - {}\n", part.name, part.reason))
                            }
                        }
                    }
                }
                body.trim_end().to_string()
            }
        }
    }
}

pub fn format_usage(avg_km_per_month: Option<f64>) -> String {
    match avg_km_per_month {
        Some(km) if km.fract() == 0.0 => format!("{} km/month", km as i64),
        Some(km) => format!("{:.1} km/month", km),
        None => "n/a km/month".to_string(),
    }
}

pub fn render_details(day: NaiveDate, predictions: &[Prediction]) -> DetailsContent {
    let display = format_display_date(day);
    if predictions.is_empty() {
        return DetailsContent::Empty {
            message: format!("No services predicted for {}", display),
        };
    }

    let entries = predictions
        .iter()
        .map(|prediction| ServiceEntry {
            phone_number: prediction.phone_number.clone(),
            usage: format_usage(prediction.avg_km_per_month),
            parts: prediction
                .spare_parts
                .iter()
                .map(|part| PartLine {
                    name: part.name.clone(),
                    reason: part.reason.clone(),
                    price: part.price,
                })
                .collect(),
        })
        .collect();

    DetailsContent::Services {
        heading: format!("Services for {}", display),
        entries,
    }
}

pub async fn load_for<S: PredictionSource + ?Sized>(
    source: &S,
    day: NaiveDate,
) -> Result<DetailsContent, FetchError> {
    let predictions = source.fetch_day(day).await?;
    Ok(render_details(day, &predictions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prediction::SparePart;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    #[test]
    fn empty_day_names_the_date() {
        let content = render_details(day(), &[]);
        assert_eq!(
            content,
            DetailsContent::Empty {
                message: "No services predicted for Wed, Jun 12, 2024".to_string()
            }
        );
    }

    #[test]
    fn entries_follow_server_order() {
        let items = vec![
            Prediction {
                date: day(),
                phone_number: "+62867890123".to_string(),
                avg_km_per_month: Some(850.0),
                spare_parts: vec![
                    SparePart {
                        name: "Chain".to_string(),
                        reason: "Stretched and worn".to_string(),
                        price: None,
                    },
                    SparePart {
                        name: "Battery".to_string(),
                        reason: "Low voltage".to_string(),
                        price: Some(350000),
                    },
                ],
            },
            Prediction {
                date: day(),
                phone_number: "+62812345678".to_string(),
                avg_km_per_month: None,
                spare_parts: vec![],
            },
        ];

        let content = render_details(day(), &items);
        let DetailsContent::Services { heading, entries } = &content else {
            panic!("expected services, got {:?}", content);
        };
        assert_eq!(heading, "Services for Wed, Jun 12, 2024");
        assert_eq!(entries[0].phone_number, "+62867890123");
        assert_eq!(entries[0].usage, "850 km/month");
        assert_eq!(entries[0].parts[1].name, "Battery");
        assert_eq!(entries[1].usage, "n/a km/month");

        let text = content.to_text();
        assert!(text.contains("Chain - Stretched and worn"));
        assert!(text.contains("Battery - Low voltage (350000)"));
    }

    #[test]
    fn fractional_usage_keeps_one_decimal() {
        assert_eq!(format_usage(Some(1234.56)), "1234.6 km/month");
    }
}
