//! Alert domain object.

use crate::error::ApiError;
use crate::responses::AlertSummaryResponse;
use crate::types::parse_timestamp;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One firing of an alert condition on a stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub id: String,
    pub stream_id: String,
    pub condition_id: Option<String>,
    pub description: String,
    pub condition_parameters: Map<String, Value>,
    pub triggered_at: DateTime<Utc>,
}

impl TryFrom<AlertSummaryResponse> for Alert {
    type Error = ApiError;

    fn try_from(summary: AlertSummaryResponse) -> Result<Self, Self::Error> {
        let triggered_at = parse_timestamp(&summary.triggered_at)?;

        Ok(Self {
            id: summary.id,
            stream_id: summary.stream_id,
            condition_id: summary.condition_id,
            description: summary.description,
            condition_parameters: summary.condition_parameters,
            triggered_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary(triggered_at: &str) -> AlertSummaryResponse {
        AlertSummaryResponse {
            id: "a1".to_string(),
            condition_id: Some("c1".to_string()),
            stream_id: "s1".to_string(),
            description: "Stream had 12 messages in the last 5 minutes".to_string(),
            condition_parameters: Map::new(),
            triggered_at: triggered_at.to_string(),
        }
    }

    #[test]
    fn test_triggered_at_parsed() {
        let alert = Alert::try_from(summary("2015-02-03T10:20:30.000Z")).unwrap();
        assert_eq!(
            alert.triggered_at,
            Utc.with_ymd_and_hms(2015, 2, 3, 10, 20, 30).unwrap()
        );
        assert_eq!(alert.condition_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_triggered_at_without_offset() {
        let alert = Alert::try_from(summary("2015-02-03T10:20:30.000")).unwrap();
        assert_eq!(
            alert.triggered_at,
            Utc.with_ymd_and_hms(2015, 2, 3, 10, 20, 30).unwrap()
        );
    }

    #[test]
    fn test_bad_timestamp_fails() {
        let err = Alert::try_from(summary("last tuesday")).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
