use crate::utils::noise::{NoiseFilter, NoiseSuppressionLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pdq_client=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdq_client=info"))
    }
}

/// 回傳是否成功安裝；已有全域 subscriber 時為 false
pub fn init_cli_logger(verbose: bool, json: bool, noise: NoiseFilter) -> bool {
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .compact()
            .boxed()
    };

    match tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(NoiseSuppressionLayer::new(noise))
        .with(fmt_layer)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Logger already installed, keeping it: {}", e);
            false
        }
    }
}
