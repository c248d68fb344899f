use tracing::subscriber::SetGlobalDefaultError;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;

/// Subscriber honouring `RUST_LOG`, falling back to `env_filter`. Logs go to
/// stderr so stdout stays clean for the command's own output.
pub fn get_subscriber(env_filter: &str) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
}

/// Install `subscriber` as the process-wide default. Fails if one is
/// already installed.
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> Result<(), SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber)
}
