use anyhow::Result;
use prometheus::Registry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;
use crate::metrics;

const DEFAULT_LOG_FILTER: &str = "echo_api=debug,tower_http=debug";
const METRICS_NAMESPACE: &str = "echo";

pub struct Observability {
    pub registry: Registry,
}

impl Observability {
    pub fn init(format: LogFormat) -> Result<Self> {
        let registry = Self::registry()?;

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

        let json = format == LogFormat::Json;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json.then(|| tracing_subscriber::fmt::layer().json()))
            .with((!json).then(|| tracing_subscriber::fmt::layer()))
            .try_init()?;

        tracing::info!(?format, "Observability stack initialized (tracing + Prometheus)");
        Ok(Self { registry })
    }

    /// Service metric registry with every collector registered
    pub fn registry() -> prometheus::Result<Registry> {
        let registry = Registry::new_custom(Some(METRICS_NAMESPACE.into()), None)?;
        metrics::register_all(&registry)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = Observability::registry().unwrap();
        metrics::observe_http("GET", "/search/", 200, 0.001);
        let families = registry.gather();
        assert!(!families.is_empty());
    }

    #[test]
    fn test_metric_names_prefixed() {
        let registry = Observability::registry().unwrap();
        metrics::observe_http("GET", "/search/", 200, 0.001);
        for fam in &registry.gather() {
            assert!(
                fam.get_name().starts_with("echo_"),
                "metric {} missing prefix",
                fam.get_name()
            );
        }
    }
}
