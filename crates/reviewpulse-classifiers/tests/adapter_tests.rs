//! Classifier adapter lifecycle tests

mod support;

use reviewpulse_classifiers::{AdapterConfig, ClassifierAdapter};
use reviewpulse_core::{bucketize, Bucket, ComponentState, Error, RawOutput};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{FailingProvider, MockLoader, MockProvider};

fn adapter_with(loader: Arc<MockLoader>, config: AdapterConfig) -> ClassifierAdapter {
    ClassifierAdapter::with_config(loader, config)
}

fn quick_config() -> AdapterConfig {
    AdapterConfig {
        init_timeout: Duration::from_secs(1),
        inference_timeout: Some(Duration::from_secs(1)),
    }
}

#[tokio::test]
async fn test_ranked_output_takes_top_entry() {
    let provider = MockProvider::with_output(RawOutput::ranked([
        ("NEGATIVE", 0.93),
        ("POSITIVE", 0.07),
    ]));
    let loader = Arc::new(MockLoader::new(Arc::new(provider)));
    let adapter = adapter_with(loader, quick_config());

    adapter.initialize().await.unwrap();
    let result = adapter.classify("Terrible.").await.unwrap();

    assert_eq!(result.label, "NEGATIVE");
    assert!((result.score - 0.93).abs() < 1e-6);
    assert_eq!(bucketize(&result), Bucket::Negative);
}

#[tokio::test(start_paused = true)]
async fn test_initialization_timeout_fails_the_attempt() {
    let loader = Arc::new(
        MockLoader::new(Arc::new(MockProvider::new("POSITIVE", 0.9)))
            .with_delay(Duration::from_secs(10)),
    );
    let adapter = adapter_with(loader, quick_config());

    let err = adapter.initialize().await.unwrap_err();

    assert!(matches!(err, Error::InitializationTimeout(d) if d == Duration::from_secs(1)));
    assert_eq!(adapter.state(), ComponentState::Failed);
    assert!(matches!(
        adapter.classify("anything").await.unwrap_err(),
        Error::NotReady
    ));
}

#[tokio::test]
async fn test_reinitialize_after_failure() {
    let loader = Arc::new(
        MockLoader::new(Arc::new(MockProvider::new("POSITIVE", 0.9))).failing_first(1),
    );
    let adapter = adapter_with(Arc::clone(&loader), quick_config());

    let err = adapter.initialize().await.unwrap_err();
    assert!(matches!(err, Error::ModelLoad(_)));
    assert_eq!(adapter.state(), ComponentState::Failed);

    adapter.initialize().await.unwrap();
    assert_eq!(adapter.state(), ComponentState::Ready);
    assert_eq!(loader.load_count(), 2);
}

#[tokio::test]
async fn test_initialize_loads_only_once() {
    let loader = Arc::new(MockLoader::new(Arc::new(MockProvider::new("POSITIVE", 0.9))));
    let adapter = adapter_with(Arc::clone(&loader), quick_config());

    adapter.initialize().await.unwrap();
    adapter.initialize().await.unwrap();

    assert_eq!(loader.load_count(), 1);
}

#[tokio::test]
async fn test_overlapping_initialize_calls_share_one_attempt() {
    let loader = Arc::new(
        MockLoader::new(Arc::new(MockProvider::new("POSITIVE", 0.9)))
            .with_delay(Duration::from_millis(20)),
    );
    let adapter = adapter_with(Arc::clone(&loader), quick_config());

    let (first, second) = tokio::join!(adapter.initialize(), adapter.initialize());

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(loader.load_count(), 1);
    assert!(adapter.is_ready());
}

#[tokio::test]
async fn test_failed_reload_drops_the_previous_model() {
    let loader = Arc::new(MockLoader::new(Arc::new(MockProvider::new("POSITIVE", 0.9))));
    let adapter = adapter_with(Arc::clone(&loader), quick_config());
    adapter.initialize().await.unwrap();

    loader.fail_from_now();
    assert!(adapter.reload().await.is_err());

    assert_eq!(adapter.state(), ComponentState::Failed);
    assert!(adapter.provider_name().is_none());
    assert!(matches!(
        adapter.classify("still there?").await.unwrap_err(),
        Error::NotReady
    ));
}

#[tokio::test]
async fn test_provider_error_is_inference_error() {
    let loader = Arc::new(MockLoader::new(Arc::new(FailingProvider::new("model crashed"))));
    let adapter = adapter_with(loader, quick_config());
    adapter.initialize().await.unwrap();

    let err = adapter.classify("hello").await.unwrap_err();

    assert!(matches!(err, Error::Inference(ref msg) if msg.contains("model crashed")));
    assert!(adapter.is_ready());
}

#[tokio::test]
async fn test_unnormalizable_output_is_inference_error() {
    let provider = MockProvider::with_output(RawOutput::new(json!([{"label": "POSITIVE"}])));
    let loader = Arc::new(MockLoader::new(Arc::new(provider)));
    let adapter = adapter_with(loader, quick_config());
    adapter.initialize().await.unwrap();

    assert!(adapter.infer("hello").await.is_ok());
    assert!(matches!(
        adapter.classify("hello").await.unwrap_err(),
        Error::Inference(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_slow_inference_times_out() {
    let provider = MockProvider::new("POSITIVE", 0.9).with_latency(Duration::from_secs(5));
    let loader = Arc::new(MockLoader::new(Arc::new(provider)));
    let adapter = adapter_with(loader, quick_config());
    adapter.initialize().await.unwrap();

    let err = adapter.classify("hello").await.unwrap_err();

    assert!(matches!(err, Error::Inference(ref msg) if msg.contains("timed out")));
}
