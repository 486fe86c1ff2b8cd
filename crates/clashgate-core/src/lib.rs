//! # Clashgate Core
//!
//! Resilient client for the Clash of Clans HTTP API.
//!
//! ## Overview
//!
//! - **Request engine** with bounded exponential backoff, `Retry-After`
//!   handling and status classification
//! - **TTL cache** for successful GET responses, keyed by method, path and
//!   sorted query
//! - **Typed error taxonomy** (`unauthorized`, `not_found`, `rate_limited`,
//!   `server_error`, `api_error`)
//! - **Outcome wrapper** for bots: errors become values, rate limits can be
//!   waited out once, and failures render as short localized messages
//! - **Async and blocking clients** sharing one engine
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`blocking`] | Blocking client |
//! | [`cache`] | TTL cache and clocks |
//! | [`client`] | Async client |
//! | [`config`] | Client configuration and `COC_*` environment loading |
//! | [`domain`] | Tags, pagination and response records |
//! | [`endpoints`] | Typed routes for the read endpoints |
//! | [`engine`] | Transport-agnostic retry/classification state machine |
//! | [`error`] | Error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`outcome`] | `Outcome`, `BotError`, rate-limit re-invocation, `render` |
//! | [`retry`] | Backoff schedule and attempt budget |
//! | [`sleep`] | Injectable sleepers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clashgate_core::{render, wrap_async, Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::from_env()?)?;
//!
//!     match wrap_async(client.player("#2PP")).await.into_result() {
//!         Ok(player) => println!("{} ({})", player.name, player.tag),
//!         Err(error) => println!("{}", render(&error, Some("en"))),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Bot / CLI      │
//! └────────┬────────┘
//!          │ wrap / wrap_with_retry
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Client /        │────▶│ Endpoints +      │
//! │ BlockingClient  │     │ Domain records   │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Engine          │────▶│ TtlCache         │
//! │ (retry, status) │     └──────────────────┘
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ HTTP Client     │
//! │ (reqwest)       │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use clashgate_core::{ApiError, ApiErrorKind};
//!
//! fn handle_error(error: &ApiError) {
//!     match error.kind() {
//!         ApiErrorKind::RateLimited => {
//!             // error.retry_after() carries the server hint, if any
//!         }
//!         ApiErrorKind::NotFound => {
//!             // Unknown tag
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The API token never appears in `Debug` output or logs
//! - Request headers are redacted before being logged

pub mod blocking;
pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod endpoints;
pub mod engine;
pub mod error;
pub mod http_client;
pub mod outcome;
pub mod retry;
pub mod sleep;

// Clients
pub use blocking::{BlockingClient, BlockingClientBuilder};
pub use client::{Client, ClientBuilder};

// Caching
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};

// Configuration
pub use config::{ClientConfig, DEFAULT_BASE_URL};

// Domain models
pub use domain::{
    ApiTimestamp, CapitalRanking, Clan, ClanMember, ClanRanking, CurrentWar, CwlGroup, CwlWar,
    GoldPassSeason, League, LeagueSeason, Location, Page, PageRequest, Paging, Player,
    PlayerRanking, RaidSeason, Tag, WarLogEntry,
};

// Routes
pub use endpoints::Route;

// Engine
pub use engine::{cache_key, Engine, JsonObject, Params};

// Error types
pub use error::{ApiError, ApiErrorKind, ClientError, ConfigError, ValidationError};

// HTTP client types
pub use http_client::{
    BlockingHttpClient, HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse,
    ReqwestBlockingHttpClient, ReqwestHttpClient,
};

// Outcomes
pub use outcome::{
    render, render_in, wrap, wrap_async, wrap_with_retry, wrap_with_retry_async, BotError,
    BotErrorKind, IntoBotError, Locale, Outcome, RateLimitRetry,
};

// Retry logic
pub use retry::{Backoff, RetryConfig};

// Sleepers
pub use sleep::{AsyncSleep, RecordingSleep, Sleep, ThreadSleep, TokioSleep};
