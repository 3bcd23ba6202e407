//! Session orchestration
//!
//! A [`Session`] owns the corpus loader, the classifier adapter and the
//! telemetry sink for one run. It starts both loads concurrently, derives
//! readiness from their states, and runs the analyze action:
//! sample → infer → normalize → bucketize → record.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reviewpulse_classifiers::ClassifierAdapter;
use reviewpulse_core::{
    bucketize, normalize, Bucket, ClassificationResult, Error, Result, SessionState,
    SessionStatus,
};
use reviewpulse_corpus::CorpusLoader;
use reviewpulse_telemetry::{EventKind, MetricsCollector, TelemetryEvent, TelemetrySink};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why an analyze request was rejected before inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The corpus is not loaded or holds no reviews
    NoCorpus,
    /// The classifier has not finished initializing, or failed to
    ClassifierNotReady,
}

impl BlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCorpus => "no_corpus",
            Self::ClassifierNotReady => "classifier_not_ready",
        }
    }

    /// User-facing explanation
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoCorpus => {
                "No reviews loaded yet. Make sure the review source is available and try again."
            }
            Self::ClassifierNotReady => {
                "Model is not ready yet. Wait for it to finish loading, then try again."
            }
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A completed analysis of one sampled review
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Position of the review in the corpus
    pub index: usize,
    /// Full review text
    pub review: String,
    /// Normalized classifier verdict
    pub result: ClassificationResult,
    /// Decided bucket
    pub bucket: Bucket,
    /// Time spent in inference and normalization
    pub latency: Duration,
}

/// Result of one analyze action
#[derive(Debug)]
pub enum AnalyzeOutcome {
    Completed(Analysis),
    /// Another analysis is in flight; nothing was done
    Busy,
    Blocked(BlockReason),
    /// Inference or normalization failed for the sampled review
    Failed { review: String, error: Error },
}

impl AnalyzeOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::Completed(analysis) => Some(analysis),
            _ => None,
        }
    }
}

/// Clears the busy flag when dropped
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One review-analysis session
pub struct Session {
    id: String,
    corpus: Arc<CorpusLoader>,
    classifier: Arc<ClassifierAdapter>,
    telemetry: Arc<dyn TelemetrySink>,
    metrics: MetricsCollector,
    busy: AtomicBool,
    rng: Mutex<StdRng>,
}

impl Session {
    pub fn new(
        corpus: Arc<CorpusLoader>,
        classifier: Arc<ClassifierAdapter>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            corpus,
            classifier,
            telemetry,
            metrics: MetricsCollector::new(),
            busy: AtomicBool::new(false),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Make review sampling deterministic
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn corpus(&self) -> &CorpusLoader {
        &self.corpus
    }

    pub fn classifier(&self) -> &ClassifierAdapter {
        &self.classifier
    }

    /// Current state of both components
    pub fn state(&self) -> SessionState {
        SessionState {
            corpus: self.corpus.state(),
            classifier: self.classifier.state(),
            corpus_size: self.corpus.len(),
            busy: self.busy.load(Ordering::Acquire),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.state().status()
    }

    /// Load the corpus and initialize the classifier concurrently.
    ///
    /// Returns once both have settled; neither outcome waits on the other.
    pub async fn start(&self) -> SessionState {
        self.emit(TelemetryEvent::new(EventKind::AppStart, "App initialized"));
        info!(session = %self.id, "Starting session");

        tokio::join!(self.load_corpus(), self.initialize_classifier());

        let state = self.state();
        let status = state.status();
        if status.is_error() {
            warn!(status = %status, "{}", status.message(&state));
        } else {
            info!(status = %status, "{}", status.message(&state));
        }
        state
    }

    /// (Re)load the review corpus, recording the outcome
    pub async fn load_corpus(&self) {
        self.emit(TelemetryEvent::new(
            EventKind::TsvLoadStart,
            format!("Fetching {}", self.corpus.source()),
        ));

        match self.corpus.load().await {
            Ok(corpus) => {
                self.emit(
                    TelemetryEvent::new(
                        EventKind::TsvLoadSuccess,
                        format!("Loaded {} reviews", corpus.len()),
                    )
                    .with_meta("count", corpus.len()),
                );
            }
            Err(e) => {
                self.metrics.record_failure(e.kind());
                self.emit(
                    TelemetryEvent::new(EventKind::TsvLoadFail, "TSV load/parse failed")
                        .with_error(&e),
                );
            }
        }
    }

    /// Initialize the classifier, recording the outcome
    pub async fn initialize_classifier(&self) {
        self.emit(TelemetryEvent::new(
            EventKind::ModelLoadStart,
            "Initializing sentiment model",
        ));
        let result = self.classifier.initialize().await;
        self.record_model_load(result);
    }

    /// Discard the current model and load a fresh one
    pub async fn reload_classifier(&self) {
        self.emit(TelemetryEvent::new(
            EventKind::ModelLoadStart,
            "Reloading sentiment model",
        ));
        let result = self.classifier.reload().await;
        self.record_model_load(result);
    }

    fn record_model_load(&self, result: Result<()>) {
        match result {
            Ok(()) => {
                let name = self.classifier.provider_name().unwrap_or_default();
                self.emit(
                    TelemetryEvent::new(EventKind::ModelLoadSuccess, "Model loaded and ready")
                        .with_meta("provider", name),
                );
            }
            Err(e) => {
                self.metrics.record_failure(e.kind());
                self.emit(
                    TelemetryEvent::new(EventKind::ModelLoadFail, "Model load failed")
                        .with_error(&e),
                );
            }
        }
    }

    /// Classify one randomly chosen review
    pub async fn analyze(&self) -> AnalyzeOutcome {
        self.emit(TelemetryEvent::new(
            EventKind::AnalyzeClick,
            "Analyze button clicked",
        ));

        let corpus = match self.corpus.snapshot() {
            Some(corpus) if self.corpus.state().is_ready() && !corpus.is_empty() => corpus,
            _ => return self.block(BlockReason::NoCorpus),
        };
        if !self.classifier.is_ready() {
            return self.block(BlockReason::ClassifierNotReady);
        }

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!("Analysis already in flight");
            return AnalyzeOutcome::Busy;
        };

        self.metrics.record_analysis_started();

        let (index, review) = {
            let mut rng = self.rng.lock();
            let (index, review) = corpus.sample(&mut *rng);
            (index, review.to_string())
        };

        self.emit(
            TelemetryEvent::new(EventKind::InferenceStart, "Running sentiment inference")
                .with_review(&review),
        );

        let started = Instant::now();
        match self.classify(&review).await {
            Ok(result) => {
                let latency = started.elapsed();
                let bucket = bucketize(&result);
                self.metrics
                    .record_success(bucket, latency.as_micros() as u64);

                debug!(
                    index,
                    label = %result.label,
                    score = result.score,
                    bucket = %bucket,
                    "Review classified"
                );
                self.emit(
                    TelemetryEvent::new(EventKind::InferenceSuccess, "Inference complete")
                        .with_review(&review)
                        .with_outcome(&result, bucket),
                );

                AnalyzeOutcome::Completed(Analysis {
                    index,
                    review,
                    result,
                    bucket,
                    latency,
                })
            }
            Err(error) => {
                warn!(error = %error, kind = error.kind(), "Analysis failed");
                self.metrics.record_failure(error.kind());
                self.emit(
                    TelemetryEvent::new(EventKind::InferenceFail, "Inference failed")
                        .with_review(&review)
                        .with_error(&error),
                );

                AnalyzeOutcome::Failed { review, error }
            }
        }
    }

    async fn classify(&self, review: &str) -> Result<ClassificationResult> {
        let raw = self.classifier.infer(review).await?;
        normalize(&raw)
    }

    fn block(&self, reason: BlockReason) -> AnalyzeOutcome {
        debug!(reason = reason.as_str(), "Analysis blocked");
        self.metrics.record_blocked(reason.as_str());
        self.emit(
            TelemetryEvent::new(EventKind::AnalyzeBlocked, reason.message())
                .with_meta("reason", reason.as_str()),
        );
        AnalyzeOutcome::Blocked(reason)
    }

    fn emit(&self, event: TelemetryEvent) {
        self.telemetry.emit(event.with_session(self.id.as_str()));
    }
}
