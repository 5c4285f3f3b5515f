//! Response payloads as returned by the server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Summary of one stream, as listed or fetched by id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StreamSummaryResponse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator_user_id: Option<String>,
    pub created_at: String,
    #[serde(default, rename = "rules")]
    pub stream_rules: Vec<StreamRuleSummaryResponse>,
    #[serde(default)]
    pub disabled: Option<bool>,
    /// Keyed `"users"` / `"emails"`; either key and the map itself may be null.
    #[serde(default)]
    pub alert_receivers: Option<HashMap<String, Option<Vec<String>>>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StreamRuleSummaryResponse {
    pub id: String,
    pub field: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: i32,
    #[serde(default)]
    pub inverted: bool,
    #[serde(default)]
    pub stream_id: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StreamListResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub streams: Vec<StreamSummaryResponse>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateStreamResponse {
    pub stream_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StreamThroughputResponse {
    pub throughput: u64,
}

/// Alert history of a stream plus the overall count.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub alerts: Vec<AlertSummaryResponse>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlertSummaryResponse {
    pub id: String,
    #[serde(default)]
    pub condition_id: Option<String>,
    pub stream_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub condition_parameters: Map<String, Value>,
    pub triggered_at: String,
}

/// Result of evaluating a stream's alert conditions right now.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckConditionResponse {
    /// Triggered conditions; absent when nothing fired.
    #[serde(default)]
    pub results: Option<Vec<Value>>,
    #[serde(default)]
    pub calculated_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlertConditionListResponse {
    #[serde(default)]
    pub conditions: Vec<AlertConditionSummaryResponse>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlertConditionSummaryResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub creator_user_id: Option<String>,
    #[serde(default)]
    pub in_grace: bool,
}

/// Notifications attempted for one alert.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlarmCallbackHistoryListResponse {
    #[serde(default)]
    pub histories: Vec<AlarmCallbackHistorySummary>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlarmCallbackHistorySummary {
    pub id: String,
    #[serde(default, rename = "alarmcallbackconfiguration")]
    pub alarm_callback_configuration: Value,
    pub alert_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    pub result: AlarmCallbackResult,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlarmCallbackResult {
    #[serde(rename = "type")]
    pub result_type: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl AlarmCallbackResult {
    pub fn is_success(&self) -> bool {
        self.result_type == "success"
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
