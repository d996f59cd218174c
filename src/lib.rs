//! `notiboost-http` is an async HTTP client for the NotiBoost notification API.
//!
//! All calls funnel through [`NotiBoostClient::execute`], which adds bearer
//! authentication, retries transport failures with exponential backoff and
//! waits out `429 Too Many Requests` responses. Resource helpers build on it:
//! - [`NotiBoostClient::events`]
//! - [`NotiBoostClient::users`]
//! - [`NotiBoostClient::flows`]
//! - [`NotiBoostClient::templates`]
//! - [`NotiBoostClient::webhooks`]

mod client;
mod error;
mod options;
mod outcome;
mod request;
mod resources;

pub use client::NotiBoostClient;
pub use error::NotiBoostError;
pub use options::{ClientOptions, DEFAULT_BASE_URL};
pub use request::{Method, RequestSpec};
pub use resources::{Events, Flows, Templates, Users, Webhooks};

pub type Result<T> = std::result::Result<T, NotiBoostError>;
