//! Graylog REST Client
//!
//! A Rust client library for the Graylog REST API: streams, their rules,
//! alert receivers, alert conditions and alert history.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use graylog_rest_client::{Client, ReceiverRef, StreamFactory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .base_url("http://graylog.example.com:12900")
//!         .default_header("authorization", "Basic YWRtaW46YWRtaW4=")
//!         .build()?;
//!     let streams = StreamFactory::http(client);
//!
//!     for stream in streams.all().await? {
//!         println!(
//!             "{}: {} msg/s, {} alerts",
//!             stream.title(),
//!             stream.throughput().await?,
//!             stream.total_alerts().await?
//!         );
//!     }
//!
//!     let stream = streams.load("52d6a2fde4b0f2aa8b6c3b22").await?;
//!     stream.add_alert_receiver(ReceiverRef::email("ops@example.com")).await?;
//!
//!     Ok(())
//! }
//! ```

mod alert;
mod client;
mod error;
mod histogram;
mod requests;
mod responses;
pub mod routes;
mod services;
mod stream;
mod types;

pub use alert::Alert;
pub use client::{ApiRequest, Client, ClientBuilder};
pub use error::{ApiError, InvalidHeaderError, ValidationError};
pub use histogram::{FieldHistogramResponse, HistogramPoint};
pub use requests::{CreateAlertConditionRequest, CreateStreamRequest, CreateStreamRuleRequest};
pub use responses::{
    AlarmCallbackHistoryListResponse, AlarmCallbackHistorySummary, AlarmCallbackResult,
    AlertConditionListResponse, AlertConditionSummaryResponse, AlertSummaryResponse,
    AlertsResponse, CheckConditionResponse, CreateStreamResponse, StreamListResponse,
    StreamRuleSummaryResponse, StreamSummaryResponse, StreamThroughputResponse, UserResponse,
};
pub use services::{
    AlertConditionService, HttpAlertConditionService, HttpStreamService, HttpUserService,
    StreamService, User, UserService,
};
pub use stream::{Stream, StreamFactory, StreamRule};
pub use types::{ReceiverKind, ReceiverRef, StreamRuleType};
