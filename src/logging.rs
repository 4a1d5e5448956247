use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,popup_editor=info";
const VERBOSE_FILTER: &str = "warn,popup_editor=debug";

fn filter_directives(verbose: bool, env_filter: Option<&str>) -> &str {
    match (verbose, env_filter) {
        (true, _) => VERBOSE_FILTER,
        (false, Some(directives)) if !directives.trim().is_empty() => directives,
        (false, _) => DEFAULT_FILTER,
    }
}

/// Installs the global `tracing` subscriber. `RUST_LOG` applies unless `verbose` is set.
pub fn init(verbose: bool) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(verbose, from_env.as_deref());
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("invalid log filter `{directives}`: {err}; using defaults");
        EnvFilter::new(DEFAULT_FILTER)
    });

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
