//! Wiring a [`Session`] from configuration

use crate::config::AppConfig;
use crate::session::Session;
use reviewpulse_classifiers::ClassifierAdapter;
use reviewpulse_core::Result;
use reviewpulse_corpus::{CorpusLoader, SourceFetcher};
use reviewpulse_telemetry::{BeaconSink, FanoutSink, NoopSink, TelemetrySink, TracingSink};
use std::sync::Arc;
use tracing::info;

/// A configured session plus the telemetry transport that needs shutting down
pub struct Assembled {
    pub session: Arc<Session>,
    pub beacon: Option<Arc<BeaconSink>>,
}

impl Assembled {
    /// Flush pending telemetry
    pub async fn shutdown(&self) {
        if let Some(beacon) = &self.beacon {
            beacon.close().await;
        }
    }
}

/// Build the corpus loader, classifier adapter and telemetry sinks.
///
/// Must be called from within a Tokio runtime when a beacon endpoint is set.
pub fn assemble(config: &AppConfig) -> Result<Assembled> {
    config.validate()?;

    let mut fetcher = SourceFetcher::new();
    if let Some(timeout) = config.fetch_timeout() {
        fetcher = fetcher.with_timeout(timeout);
    }
    let corpus = CorpusLoader::new(config.corpus_source())
        .with_column(config.text_column.as_str())
        .with_fetcher(fetcher);

    let loader = config.classifier.build_loader()?;
    let classifier = ClassifierAdapter::with_config(loader, config.classifier.adapter_config());

    let (telemetry, beacon) = telemetry_sinks(config);

    let mut session = Session::new(Arc::new(corpus), Arc::new(classifier), telemetry);
    if let Some(seed) = config.seed {
        session = session.with_seed(seed);
    }

    info!(
        source = %config.source,
        provider = %config.classifier.provider,
        "Session configured"
    );

    Ok(Assembled {
        session: Arc::new(session),
        beacon,
    })
}

fn telemetry_sinks(config: &AppConfig) -> (Arc<dyn TelemetrySink>, Option<Arc<BeaconSink>>) {
    let settings = &config.telemetry;
    if !settings.enabled {
        return (Arc::new(NoopSink), None);
    }

    let mut fanout = FanoutSink::new();
    if settings.log_events {
        fanout = fanout.with(Arc::new(TracingSink));
    }

    let beacon = settings
        .endpoint
        .as_ref()
        .map(|endpoint| Arc::new(BeaconSink::spawn(endpoint.as_str())));
    if let Some(beacon) = &beacon {
        fanout = fanout.with(beacon.clone());
    }

    if fanout.is_empty() {
        (Arc::new(NoopSink), beacon)
    } else {
        (Arc::new(fanout), beacon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewpulse_classifiers::ProviderKind;
    use reviewpulse_core::ComponentState;

    #[tokio::test]
    async fn test_assemble_lexicon_session() {
        let mut config = AppConfig::default();
        config.classifier.provider = ProviderKind::Lexicon;
        config.telemetry.log_events = false;
        config.seed = Some(3);

        let assembled = assemble(&config).unwrap();

        assert!(assembled.beacon.is_none());
        assert_eq!(assembled.session.state().corpus, ComponentState::Idle);
        assembled.shutdown().await;
    }

    #[tokio::test]
    async fn test_assemble_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.classifier.provider = ProviderKind::Lexicon;
        config.classifier.init_timeout_secs = 0;

        assert!(assemble(&config).is_err());
    }
}
