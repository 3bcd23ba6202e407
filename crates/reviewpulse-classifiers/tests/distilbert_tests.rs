//! DistilBERT provider tests
//!
//! These download `distilbert-base-uncased-finetuned-sst-2-english` from the
//! Hugging Face Hub, so they are ignored by default:
//! `cargo test -p reviewpulse-classifiers -- --ignored`

#![cfg(feature = "ml-models")]

use reviewpulse_classifiers::{AdapterConfig, ClassifierAdapter, DistilBertLoader};
use reviewpulse_core::{bucketize, Bucket};
use std::sync::Arc;
use std::time::Duration;

async fn ready_adapter() -> ClassifierAdapter {
    let adapter = ClassifierAdapter::with_config(
        Arc::new(DistilBertLoader::default()),
        AdapterConfig {
            init_timeout: Duration::from_secs(600),
            inference_timeout: Some(Duration::from_secs(60)),
        },
    );
    adapter.initialize().await.expect("model should load");
    adapter
}

#[tokio::test]
#[ignore = "downloads model weights"]
async fn test_positive_review() {
    let adapter = ready_adapter().await;

    let result = adapter
        .classify("I love this product, it's absolutely fantastic!")
        .await
        .unwrap();

    assert_eq!(result.label, "POSITIVE");
    assert!(result.score > 0.9, "Expected high positive score, got {}", result.score);
    assert_eq!(bucketize(&result), Bucket::Positive);
}

#[tokio::test]
#[ignore = "downloads model weights"]
async fn test_negative_review() {
    let adapter = ready_adapter().await;

    let result = adapter
        .classify("Terrible. It broke after one day and support never answered.")
        .await
        .unwrap();

    assert_eq!(result.label, "NEGATIVE");
    assert_eq!(bucketize(&result), Bucket::Negative);
}

#[tokio::test]
#[ignore = "downloads model weights"]
async fn test_raw_output_is_ranked() {
    let adapter = ready_adapter().await;

    let raw = adapter.infer("It was fine.").await.unwrap();
    let entries = raw.as_value().as_array().unwrap();

    assert_eq!(entries.len(), 2);
    let first = entries[0]["score"].as_f64().unwrap();
    let second = entries[1]["score"].as_f64().unwrap();
    assert!(first >= second);
    assert!(((first + second) - 1.0).abs() < 1e-4);
}
