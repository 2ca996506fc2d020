use crate::config::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEV_FILTER: &str = "relay_server=debug,relay_core=debug,tower_http=debug";
const PROD_FILTER: &str = "info";

fn default_filter(is_production: bool) -> &'static str {
    if is_production {
        PROD_FILTER
    } else {
        DEV_FILTER
    }
}

/// Installs the global subscriber.
///
/// Production logs are JSON lines; everything else is human-readable.
/// `RUST_LOG` replaces the default filter when set.
pub fn setup_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(config.is_production).into());

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.is_production {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber.with(fmt::layer()).init();
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_parse() {
        for is_production in [true, false] {
            let directives = default_filter(is_production);
            assert!(EnvFilter::try_new(directives).is_ok(), "{}", directives);
        }
        assert!(default_filter(false).contains("relay_core=debug"));
    }
}
