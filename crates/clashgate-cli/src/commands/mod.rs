mod target;

use std::time::Duration;

use clashgate_core::{
    render, wrap_with_retry, wrap_with_retry_async, BlockingClient, Client, ClientConfig,
    JsonObject, Outcome, RateLimitRetry, ThreadSleep, TokioSleep,
};
use serde_json::Value;

use self::target::Target;
use crate::cli::Cli;
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let config = client_config(cli)?;
    let policy = RateLimitRetry {
        max_retries: cli.rate_limit_retries,
        max_wait: seconds("--rate-limit-wait", cli.rate_limit_wait)?,
    };
    let target = target::resolve(&cli.command)?;
    tracing::debug!(
        method = %target.method,
        path = %target.path,
        blocking = cli.blocking,
        "resolved command"
    );

    let outcome = if cli.blocking {
        run_blocking(config, target.clone(), policy).await?
    } else {
        run_async(config, &target, policy).await?
    };

    match outcome {
        Outcome::Ok(payload) => target.decode(payload),
        Outcome::Err(error) => Err(CliError::Api {
            kind: error.kind,
            message: render(&error, cli.locale.as_deref()),
        }),
    }
}

fn client_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(max_retries) = cli.max_retries {
        config = config.with_max_retries(max_retries);
    }
    if let Some(timeout) = cli.timeout_secs {
        config = config.with_timeout(seconds("--timeout-secs", timeout)?);
    }
    if cli.no_cache {
        config.cache_enabled = false;
    }
    Ok(config)
}

fn seconds(flag: &str, value: f64) -> Result<Duration, CliError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        CliError::Command(format!(
            "{flag} must be a non-negative number of seconds, got {value}"
        ))
    })
}

async fn run_async(
    config: ClientConfig,
    target: &Target,
    policy: RateLimitRetry,
) -> Result<Outcome<JsonObject>, CliError> {
    let client = Client::new(config)?;
    let outcome = wrap_with_retry_async(
        || client.execute(target.method, &target.path, Some(target.params.clone())),
        policy,
        &TokioSleep,
    )
    .await;
    client.close();
    Ok(outcome)
}

async fn run_blocking(
    config: ClientConfig,
    target: Target,
    policy: RateLimitRetry,
) -> Result<Outcome<JsonObject>, CliError> {
    tokio::task::spawn_blocking(move || -> Result<Outcome<JsonObject>, CliError> {
        let client = BlockingClient::new(config)?;
        let outcome = wrap_with_retry(
            || client.execute(target.method, &target.path, Some(target.params.clone())),
            policy,
            &ThreadSleep,
        );
        client.close();
        Ok(outcome)
    })
    .await
    .map_err(|error| CliError::Command(format!("blocking worker failed: {error}")))?
}
