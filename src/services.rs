//! Collaborator services used by the domain objects.
//!
//! Each service is a trait so that a [`StreamFactory`](crate::StreamFactory)
//! can be wired with HTTP-backed implementations or with test doubles.

use crate::client::Client;
use crate::error::ApiError;
use crate::requests::{CreateAlertConditionRequest, CreateStreamRequest};
use crate::responses::{
    AlertConditionListResponse, AlertConditionSummaryResponse, CheckConditionResponse,
    CreateStreamResponse, StreamListResponse, StreamSummaryResponse, UserResponse,
};
use crate::routes;
use crate::stream::Stream;
use async_trait::async_trait;

/// A Graylog user account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl From<UserResponse> for User {
    fn from(resp: UserResponse) -> Self {
        Self {
            id: resp.id,
            username: resp.username,
            full_name: resp.full_name,
            email: resp.email,
        }
    }
}

/// Resolves user references.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Load a user; `Ok(None)` when the server does not know it.
    async fn load(&self, user_id: &str) -> Result<Option<User>, ApiError>;
}

/// Manages the alert conditions of streams.
#[async_trait]
pub trait AlertConditionService: Send + Sync {
    async fn create(
        &self,
        stream: &Stream,
        request: &CreateAlertConditionRequest,
    ) -> Result<(), ApiError>;

    async fn all_of_stream(
        &self,
        stream: &Stream,
    ) -> Result<Vec<AlertConditionSummaryResponse>, ApiError>;
}

/// Stream-level operations that do not need a [`Stream`] instance.
#[async_trait]
pub trait StreamService: Send + Sync {
    async fn all(&self) -> Result<Vec<StreamSummaryResponse>, ApiError>;

    async fn get(&self, stream_id: &str) -> Result<StreamSummaryResponse, ApiError>;

    /// Create a stream, returning its new id.
    async fn create(&self, request: &CreateStreamRequest) -> Result<String, ApiError>;

    async fn delete(&self, stream_id: &str) -> Result<(), ApiError>;

    async fn pause(&self, stream_id: &str) -> Result<(), ApiError>;

    async fn resume(&self, stream_id: &str) -> Result<(), ApiError>;

    /// Evaluate the stream's alert conditions now.
    async fn active_alerts(&self, stream_id: &str) -> Result<CheckConditionResponse, ApiError>;
}

/// [`UserService`] backed by the users endpoint.
#[derive(Clone, Debug)]
pub struct HttpUserService {
    client: Client,
}

impl HttpUserService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserService for HttpUserService {
    async fn load(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        let user = self
            .client
            .route(&routes::USER, &[("username", user_id)])
            .expect([200, 404])
            .fetch_optional::<UserResponse>()
            .await?;

        Ok(user.map(User::from))
    }
}

/// [`AlertConditionService`] backed by the stream alert-conditions endpoints.
#[derive(Clone, Debug)]
pub struct HttpAlertConditionService {
    client: Client,
}

impl HttpAlertConditionService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AlertConditionService for HttpAlertConditionService {
    async fn create(
        &self,
        stream: &Stream,
        request: &CreateAlertConditionRequest,
    ) -> Result<(), ApiError> {
        request.validate()?;

        self.client
            .route(&routes::ALERT_CONDITION_CREATE, &[("streamId", stream.id())])
            .json(request)?
            .expect([201])
            .execute()
            .await
    }

    async fn all_of_stream(
        &self,
        stream: &Stream,
    ) -> Result<Vec<AlertConditionSummaryResponse>, ApiError> {
        let list = self
            .client
            .route(&routes::ALERT_CONDITIONS, &[("streamId", stream.id())])
            .fetch::<AlertConditionListResponse>()
            .await?;

        Ok(list.conditions)
    }
}

/// [`StreamService`] backed by the streams endpoints.
#[derive(Clone, Debug)]
pub struct HttpStreamService {
    client: Client,
}

impl HttpStreamService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StreamService for HttpStreamService {
    async fn all(&self) -> Result<Vec<StreamSummaryResponse>, ApiError> {
        let list = self
            .client
            .route(&routes::STREAMS, &[])
            .fetch::<StreamListResponse>()
            .await?;

        Ok(list.streams)
    }

    async fn get(&self, stream_id: &str) -> Result<StreamSummaryResponse, ApiError> {
        self.client
            .route(&routes::STREAM, &[("streamId", stream_id)])
            .fetch()
            .await
    }

    async fn create(&self, request: &CreateStreamRequest) -> Result<String, ApiError> {
        request.validate()?;

        let created = self
            .client
            .route(&routes::STREAM_CREATE, &[])
            .json(request)?
            .expect([201])
            .fetch::<CreateStreamResponse>()
            .await?;

        tracing::debug!(stream_id = %created.stream_id, "created stream");
        Ok(created.stream_id)
    }

    async fn delete(&self, stream_id: &str) -> Result<(), ApiError> {
        self.client
            .route(&routes::STREAM_DELETE, &[("streamId", stream_id)])
            .expect([204])
            .execute()
            .await
    }

    async fn pause(&self, stream_id: &str) -> Result<(), ApiError> {
        self.client
            .route(&routes::STREAM_PAUSE, &[("streamId", stream_id)])
            .expect([204])
            .execute()
            .await
    }

    async fn resume(&self, stream_id: &str) -> Result<(), ApiError> {
        self.client
            .route(&routes::STREAM_RESUME, &[("streamId", stream_id)])
            .expect([204])
            .execute()
            .await
    }

    async fn active_alerts(&self, stream_id: &str) -> Result<CheckConditionResponse, ApiError> {
        self.client
            .route(&routes::STREAM_ALERTS_CHECK, &[("streamId", stream_id)])
            .fetch()
            .await
    }
}
