use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Registry, filter::Targets, fmt, layer::Layered,
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Installs the global subscriber. `--verbose` turns on debug output for this
/// crate only. Without it `RUST_LOG` decides, and nothing is logged when it
/// is unset.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let _ = filtered_registry(verbose, env_filter)
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .try_init();
}

type FilteredRegistry = Layered<EnvFilter, Layered<Targets, Registry>>;

/// Registry carrying the level filters for `verbose` and the `RUST_LOG`
/// directives, if any were given.
fn filtered_registry(verbose: bool, env_filter: Option<EnvFilter>) -> FilteredRegistry {
    let default_directive = if verbose { "debug" } else { "off" };
    let app_filter = if verbose {
        Targets::new().with_target("spendwise", LevelFilter::DEBUG)
    } else {
        Targets::new().with_default(LevelFilter::TRACE)
    };
    let env_filter = env_filter.unwrap_or_else(|| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(app_filter)
        .with(env_filter)
}
