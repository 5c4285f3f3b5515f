//! Stream domain object and its factory.

use crate::alert::Alert;
use crate::client::{ApiRequest, Client};
use crate::error::ApiError;
use crate::requests::CreateAlertConditionRequest;
use crate::responses::{
    AlarmCallbackHistoryListResponse, AlarmCallbackHistorySummary, AlertConditionSummaryResponse,
    AlertsResponse, StreamRuleSummaryResponse, StreamSummaryResponse, StreamThroughputResponse,
};
use crate::routes::{self, Route};
use crate::services::{
    AlertConditionService, HttpAlertConditionService, HttpStreamService, HttpUserService,
    StreamService, User, UserService,
};
use crate::types::{parse_timestamp, ReceiverRef, StreamRuleType};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

const RECEIVERS_USERS: &str = "users";
const RECEIVERS_EMAILS: &str = "emails";

/// Builds [`Stream`]s from server summaries.
///
/// Holds the API client and the collaborator services every stream needs.
/// Cloning is cheap.
#[derive(Clone)]
pub struct StreamFactory {
    client: Client,
    users: Arc<dyn UserService>,
    alert_conditions: Arc<dyn AlertConditionService>,
    streams: Arc<dyn StreamService>,
}

impl std::fmt::Debug for StreamFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamFactory")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl StreamFactory {
    pub fn new(
        client: Client,
        users: Arc<dyn UserService>,
        alert_conditions: Arc<dyn AlertConditionService>,
        streams: Arc<dyn StreamService>,
    ) -> Self {
        Self {
            client,
            users,
            alert_conditions,
            streams,
        }
    }

    /// Wire every collaborator to its HTTP implementation on `client`.
    pub fn http(client: Client) -> Self {
        Self::new(
            client.clone(),
            Arc::new(HttpUserService::new(client.clone())),
            Arc::new(HttpAlertConditionService::new(client.clone())),
            Arc::new(HttpStreamService::new(client)),
        )
    }

    /// The stream service, for operations that do not start from a `Stream`.
    pub fn stream_service(&self) -> &Arc<dyn StreamService> {
        &self.streams
    }

    pub fn from_summary(&self, mut summary: StreamSummaryResponse) -> Stream {
        let user_alert_receivers = take_receivers(&mut summary.alert_receivers, RECEIVERS_USERS);
        let email_alert_receivers = take_receivers(&mut summary.alert_receivers, RECEIVERS_EMAILS);

        let stream_rules = summary
            .stream_rules
            .into_iter()
            .map(|rule| StreamRule::from_summary(rule, &summary.id))
            .collect();

        Stream {
            id: summary.id,
            title: summary.title,
            description: summary.description,
            creator_user_id: summary.creator_user_id,
            created_at: summary.created_at,
            stream_rules,
            disabled: summary.disabled,
            user_alert_receivers,
            email_alert_receivers,
            alerts_response: Mutex::new(None),
            client: self.client.clone(),
            users: Arc::clone(&self.users),
            alert_conditions: Arc::clone(&self.alert_conditions),
            streams: Arc::clone(&self.streams),
        }
    }

    /// Fetch one stream by id.
    pub async fn load(&self, stream_id: &str) -> Result<Stream, ApiError> {
        let summary = self.streams.get(stream_id).await?;
        Ok(self.from_summary(summary))
    }

    /// Fetch every stream visible to the client.
    pub async fn all(&self) -> Result<Vec<Stream>, ApiError> {
        let summaries = self.streams.all().await?;
        Ok(summaries.into_iter().map(|s| self.from_summary(s)).collect())
    }
}

fn take_receivers(
    receivers: &mut Option<HashMap<String, Option<Vec<String>>>>,
    key: &str,
) -> Vec<String> {
    receivers
        .as_mut()
        .and_then(|map| map.remove(key))
        .flatten()
        .unwrap_or_default()
}

/// Client-side proxy of a server stream.
///
/// Fields mirror the summary the stream was built from and never change.
/// The alert listing is fetched at most once per instance and then reused,
/// whatever `since` later calls pass; use
/// [`clear_alerts_cache`](Self::clear_alerts_cache) to refetch.
pub struct Stream {
    id: String,
    title: String,
    description: Option<String>,
    creator_user_id: Option<String>,
    created_at: String,
    stream_rules: Vec<StreamRule>,
    disabled: Option<bool>,
    user_alert_receivers: Vec<String>,
    email_alert_receivers: Vec<String>,
    alerts_response: Mutex<Option<Arc<AlertsResponse>>>,
    client: Client,
    users: Arc<dyn UserService>,
    alert_conditions: Arc<dyn AlertConditionService>,
    streams: Arc<dyn StreamService>,
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("disabled", &self.disabled())
            .field("stream_rules", &self.stream_rules)
            .finish_non_exhaustive()
    }
}

impl Stream {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn creator_user_id(&self) -> Option<&str> {
        self.creator_user_id.as_deref()
    }

    /// Creation time, parsed from the server's ISO-8601 string.
    pub fn created_at(&self) -> Result<DateTime<Utc>, ApiError> {
        parse_timestamp(&self.created_at)
    }

    pub fn stream_rules(&self) -> &[StreamRule] {
        &self.stream_rules
    }

    /// A missing `disabled` flag counts as enabled.
    pub fn disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    pub fn user_alert_receivers(&self) -> &[String] {
        &self.user_alert_receivers
    }

    pub fn email_alert_receivers(&self) -> &[String] {
        &self.email_alert_receivers
    }

    /// Look up the creator. Not cached: every call asks the user service.
    pub async fn creator_user(&self) -> Result<Option<User>, ApiError> {
        match &self.creator_user_id {
            Some(user_id) => self.users.load(user_id).await,
            None => Ok(None),
        }
    }

    pub async fn alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.alerts_since(0).await
    }

    /// Alerts triggered after `since` (epoch seconds; 0 means all).
    pub async fn alerts_since(&self, since: u64) -> Result<Vec<Alert>, ApiError> {
        let info = self.alerts_information(since).await?;
        info.alerts.iter().cloned().map(Alert::try_from).collect()
    }

    pub async fn total_alerts(&self) -> Result<u64, ApiError> {
        Ok(self.alerts_information(0).await?.total)
    }

    /// Drop the memoized alert listing so the next query refetches.
    pub fn clear_alerts_cache(&self) {
        self.alerts_response.lock().take();
    }

    async fn alerts_information(&self, since: u64) -> Result<Arc<AlertsResponse>, ApiError> {
        let cached = self.alerts_response.lock().clone();
        if let Some(cached) = cached {
            tracing::trace!(stream_id = %self.id, "reusing memoized alerts response");
            return Ok(cached);
        }

        let mut req = self
            .client
            .route(&routes::STREAM_ALERTS, &[("streamId", self.id())]);
        if since > 0 {
            req = req.query_param("since", since);
        }
        let fetched = Arc::new(req.fetch::<AlertsResponse>().await?);

        // Concurrent first fetches may race; the first stored response wins.
        let mut slot = self.alerts_response.lock();
        Ok(Arc::clone(slot.get_or_insert(fetched)))
    }

    /// Number of alert conditions currently firing.
    pub async fn active_alerts(&self) -> Result<usize, ApiError> {
        let response = self.streams.active_alerts(self.id()).await?;
        Ok(response.results.map_or(0, |results| results.len()))
    }

    /// Messages per second. A stream without throughput data reports 0.
    pub async fn throughput(&self) -> Result<u64, ApiError> {
        let response = self
            .client
            .route(&routes::STREAM_THROUGHPUT, &[("streamId", self.id())])
            .expect([200, 404])
            .fetch_optional::<StreamThroughputResponse>()
            .await?;

        Ok(response.map_or(0, |r| r.throughput))
    }

    /// Subscribe a user (by username) or an email address to this stream's alerts.
    pub async fn add_alert_receiver(
        &self,
        receiver: impl Into<ReceiverRef>,
    ) -> Result<(), ApiError> {
        self.receiver_request(&routes::ALERT_RECEIVER_ADD, &receiver.into())
            .expect([201])
            .execute()
            .await
    }

    pub async fn remove_alert_receiver(
        &self,
        receiver: impl Into<ReceiverRef>,
    ) -> Result<(), ApiError> {
        self.receiver_request(&routes::ALERT_RECEIVER_REMOVE, &receiver.into())
            .expect([204])
            .execute()
            .await
    }

    fn receiver_request(&self, route: &Route, receiver: &ReceiverRef) -> ApiRequest {
        self.client
            .route(route, &[("streamId", self.id())])
            .query_param("entity", &receiver.value)
            .query_param("type", receiver.kind.to_query_value())
    }

    pub async fn add_alert_condition(
        &self,
        request: &CreateAlertConditionRequest,
    ) -> Result<(), ApiError> {
        self.alert_conditions.create(self, request).await
    }

    pub async fn alert_conditions(&self) -> Result<Vec<AlertConditionSummaryResponse>, ApiError> {
        self.alert_conditions.all_of_stream(self).await
    }

    /// Notifications the server sent (or failed to send) for one alert.
    pub async fn alarm_callback_history(
        &self,
        alert_id: &str,
    ) -> Result<Vec<AlarmCallbackHistorySummary>, ApiError> {
        let list = self
            .client
            .route(
                &routes::STREAM_ALERT_HISTORY,
                &[("streamId", self.id()), ("alertId", alert_id)],
            )
            .fetch::<AlarmCallbackHistoryListResponse>()
            .await?;

        Ok(list.histories)
    }
}

/// A single match condition of a stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamRule {
    id: String,
    field: String,
    value: Option<String>,
    rule_type: StreamRuleType,
    inverted: bool,
    stream_id: String,
}

impl StreamRule {
    pub(crate) fn from_summary(summary: StreamRuleSummaryResponse, owner_id: &str) -> Self {
        Self {
            id: summary.id,
            field: summary.field,
            value: summary.value,
            rule_type: StreamRuleType::from_code(summary.rule_type),
            inverted: summary.inverted,
            stream_id: summary.stream_id.unwrap_or_else(|| owner_id.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn rule_type(&self) -> StreamRuleType {
        self.rule_type
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }
}
