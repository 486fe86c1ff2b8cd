//! Non-raising outcomes for bot-style consumers.
//!
//! [`wrap`] and friends turn any client error into a [`BotError`], a small
//! projection that can be rendered into a localized chat message with
//! [`render`]. The `*_with_retry` variants additionally re-run a whole
//! logical call once the engine has surfaced a rate limit with a short enough
//! `Retry-After`.

use std::future::Future;
use std::time::Duration;

use crate::error::{ApiError, ApiErrorKind, ClientError};
use crate::sleep::{AsyncSleep, Sleep};

/// Environment variable consulted by [`render`] when no locale is given.
pub const LOCALE_ENV: &str = "BOT_LOCALE";

pub type BotErrorKind = ApiErrorKind;

/// Reduced, presentation-ready view of a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotError {
    pub kind: BotErrorKind,
    /// Overrides the localized template when present.
    pub message: Option<String>,
    pub retry_after: Option<Duration>,
}

impl BotError {
    pub fn new(kind: BotErrorKind) -> Self {
        Self {
            kind,
            message: None,
            retry_after: None,
        }
    }

    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self {
            retry_after,
            ..Self::new(ApiErrorKind::RateLimited)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Projection of an error into a [`BotError`].
pub trait IntoBotError {
    fn to_bot_error(&self) -> BotError;
}

impl IntoBotError for ApiError {
    fn to_bot_error(&self) -> BotError {
        match self.kind() {
            ApiErrorKind::RateLimited => BotError::rate_limited(self.retry_after()),
            kind => BotError::new(kind),
        }
    }
}

impl IntoBotError for ClientError {
    fn to_bot_error(&self) -> BotError {
        match self {
            Self::Api(error) => error.to_bot_error(),
            Self::Validation(_) | Self::Config(_) => BotError::new(ApiErrorKind::Api),
        }
    }
}

impl IntoBotError for BotError {
    fn to_bot_error(&self) -> BotError {
        self.clone()
    }
}

/// Either a value or a classified error, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    Err(BotError),
}

impl<T> Outcome<T> {
    pub fn from_result<E: IntoBotError>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => Self::Err(error.to_bot_error()),
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    pub fn error(&self) -> Option<&BotError> {
        match self {
            Self::Ok(_) => None,
            Self::Err(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, BotError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(error) => Err(error),
        }
    }
}

/// Run `operation` and capture its result as an [`Outcome`].
pub fn wrap<T, E, F>(operation: F) -> Outcome<T>
where
    F: FnOnce() -> Result<T, E>,
    E: IntoBotError,
{
    Outcome::from_result(operation())
}

/// Await `operation` and capture its result as an [`Outcome`].
pub async fn wrap_async<T, E, Fut>(operation: Fut) -> Outcome<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: IntoBotError,
{
    Outcome::from_result(operation.await)
}

/// Bounds for re-running a call that was rate limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRetry {
    pub max_retries: u32,
    /// Longest `Retry-After` worth waiting for.
    pub max_wait: Duration,
}

impl Default for RateLimitRetry {
    fn default() -> Self {
        Self {
            max_retries: 1,
            max_wait: Duration::from_secs(15),
        }
    }
}

impl RateLimitRetry {
    /// Wait before the next invocation, or `None` to give up with `error`.
    fn wait_for(&self, retries_done: u32, error: &BotError) -> Option<Duration> {
        if retries_done >= self.max_retries || error.kind != ApiErrorKind::RateLimited {
            return None;
        }
        error.retry_after.filter(|wait| *wait <= self.max_wait)
    }
}

/// Like [`wrap`], re-invoking `factory` after a short enough rate limit.
pub fn wrap_with_retry<T, E, F>(
    mut factory: F,
    policy: RateLimitRetry,
    sleeper: &dyn Sleep,
) -> Outcome<T>
where
    F: FnMut() -> Result<T, E>,
    E: IntoBotError,
{
    let mut retries_done = 0;
    loop {
        let error = match factory() {
            Ok(value) => return Outcome::Ok(value),
            Err(error) => error.to_bot_error(),
        };

        match policy.wait_for(retries_done, &error) {
            Some(wait) => {
                tracing::debug!(wait_ms = wait.as_millis() as u64, "re-invoking rate limited call");
                retries_done += 1;
                sleeper.sleep(wait);
            }
            None => return Outcome::Err(error),
        }
    }
}

/// Async [`wrap_with_retry`]; `factory` builds a fresh future per invocation.
pub async fn wrap_with_retry_async<T, E, F, Fut>(
    mut factory: F,
    policy: RateLimitRetry,
    sleeper: &dyn AsyncSleep,
) -> Outcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IntoBotError,
{
    let mut retries_done = 0;
    loop {
        let error = match factory().await {
            Ok(value) => return Outcome::Ok(value),
            Err(error) => error.to_bot_error(),
        };

        match policy.wait_for(retries_done, &error) {
            Some(wait) => {
                tracing::debug!(wait_ms = wait.as_millis() as u64, "re-invoking rate limited call");
                retries_done += 1;
                sleeper.sleep(wait).await;
            }
            None => return Outcome::Err(error),
        }
    }
}

/// Languages with message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    En,
    #[default]
    Ru,
}

impl Locale {
    /// Match a tag such as `en`, `EN-us` or `ru_RU`; `None` if unsupported.
    pub fn parse(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_ascii_lowercase();
        let base = normalized
            .split(['-', '_'])
            .next()
            .unwrap_or_default();
        match base {
            "en" => Some(Self::En),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }

    /// Explicit locale, else `env_default`, else [`Locale::Ru`].
    ///
    /// An explicit but unsupported locale still falls back to `Ru` rather
    /// than to the environment.
    pub fn resolve(explicit: Option<&str>, env_default: Option<&str>) -> Self {
        explicit
            .or(env_default)
            .and_then(Self::parse)
            .unwrap_or_default()
    }

    fn template(self, kind: BotErrorKind) -> &'static str {
        match (self, kind) {
            (Self::En, ApiErrorKind::Unauthorized) => {
                "A valid API token is required (Unauthorized)."
            }
            (Self::En, ApiErrorKind::NotFound) => "Nothing found for this tag.",
            (Self::En, ApiErrorKind::RateLimited) => "Too many requests (rate limit).",
            (Self::En, ApiErrorKind::ServerError) => "CoC API is having issues. Try again later.",
            (Self::En, ApiErrorKind::Api) => "CoC API error.",
            (Self::Ru, ApiErrorKind::Unauthorized) => "Нужен валидный API токен (Unauthorized).",
            (Self::Ru, ApiErrorKind::NotFound) => "Ничего не найдено по этому тегу.",
            (Self::Ru, ApiErrorKind::RateLimited) => "Слишком много запросов (rate limit).",
            (Self::Ru, ApiErrorKind::ServerError) => "Проблема на стороне CoC API. Попробуй позже.",
            (Self::Ru, ApiErrorKind::Api) => "Ошибка CoC API.",
        }
    }

    fn retry_hint(self, seconds: u64) -> String {
        match self {
            Self::En => format!(" Try again in ~{seconds}s."),
            Self::Ru => format!(" Попробуй через ~{seconds}s."),
        }
    }
}

/// Human-readable message for `error`, localized unless it carries its own.
pub fn render(error: &BotError, locale: Option<&str>) -> String {
    let env_default = std::env::var(LOCALE_ENV).ok();
    render_in(error, Locale::resolve(locale, env_default.as_deref()))
}

pub fn render_in(error: &BotError, locale: Locale) -> String {
    if let Some(message) = error.message.as_deref().filter(|message| !message.is_empty()) {
        return message.to_owned();
    }

    let mut message = String::from(locale.template(error.kind));
    if error.kind == ApiErrorKind::RateLimited {
        if let Some(wait) = error.retry_after {
            message.push_str(&locale.retry_hint(wait.as_secs()));
        }
    }
    message
}
