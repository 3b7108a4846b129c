//! [`MemoryService`]: owns the lifecycle, scoring and observability engines
//! and applies the degradation policy between them and the record store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mnemos_core::{
    BehavioralScore, BehavioralSignal, MnemosConfig, MnemosError, MnemosResult, Record, RecordStore,
};
use mnemos_lifecycle::{CrossDomainLink, EvolutionTree, LifecycleEngine, ScoredBatch};
use mnemos_observability::capture_span;
use mnemos_observability::cascade::{CascadeStatistics, RiskPrediction};
use mnemos_observability::{
    CascadeEvent, CascadeVerdict, DegradationEvent, ObservabilityEngine, SamplingContext,
    SamplingStats, TrackedDegradation,
};
use mnemos_scoring::{ScoringEngine, ScoringReport};
use tracing::Instrument;

use crate::monitor::OperationTimer;
use crate::outcome::OperationOutcome;
use crate::request::{CaptureRequest, ReadResponse, SearchRequest};

/// Component name used for record store degradations.
pub const STORE_COMPONENT: &str = "record_store";

pub struct MemoryService<S: RecordStore> {
    lifecycle: LifecycleEngine<S>,
    scoring: ScoringEngine,
    observability: Arc<ObservabilityEngine>,
    config: MnemosConfig,
}

impl<S: RecordStore> MemoryService<S> {
    /// Validate `config` and build every engine over `store`.
    pub fn new(store: Arc<S>, config: MnemosConfig) -> MnemosResult<Self> {
        let observability = Arc::new(ObservabilityEngine::new(
            config.cascade.clone(),
            config.sampling.clone(),
        ));
        Self::with_observability(store, config, observability)
    }

    /// Build over a shared observability engine, e.g. one watched by other
    /// components of the same process.
    pub fn with_observability(
        store: Arc<S>,
        config: MnemosConfig,
        observability: Arc<ObservabilityEngine>,
    ) -> MnemosResult<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.service.store_timeout_ms);
        Ok(Self {
            lifecycle: LifecycleEngine::new(store, config.lifecycle.clone(), timeout),
            scoring: ScoringEngine::new(
                config.scoring.clone(),
                config.lifecycle.decay_factor,
                timeout,
            ),
            observability,
            config,
        })
    }

    pub fn config(&self) -> &MnemosConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        self.lifecycle.store()
    }

    pub fn lifecycle(&self) -> &LifecycleEngine<S> {
        &self.lifecycle
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn observability(&self) -> &Arc<ObservabilityEngine> {
        &self.observability
    }

    fn group(&self) -> &str {
        &self.config.service.group_id
    }

    // ── Read paths ─────────────────────────────────────────────────────────

    /// Ranked search. A store failure yields an empty, degraded response.
    pub async fn search(
        &self,
        request: &SearchRequest,
        now: DateTime<Utc>,
    ) -> MnemosResult<ReadResponse<ScoredBatch>> {
        let options = request.options(&self.config.lifecycle);
        let search = self.lifecycle.search(&request.query, self.group(), &options, now);
        let response = self.read_path("search", now, search).await?;
        if !response.data.write_failures.is_empty() {
            self.observability.record_degradation(DegradationEvent::new(
                STORE_COMPONENT,
                "reclassify",
                format!("{} reclassification writes failed", response.data.write_failures.len()),
                "reclassification_deferred",
                now,
            ));
        }
        Ok(response)
    }

    /// Records tagged for `topic`. Degrades like [`Self::search`].
    pub async fn cross_domain_links(
        &self,
        topic: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<ReadResponse<Vec<CrossDomainLink>>> {
        self.read_path(
            "cross_domain_links",
            now,
            self.lifecycle.cross_domain_links(topic, self.group(), now),
        )
        .await
    }

    /// Supersession history for `topic`. Degrades like [`Self::search`].
    pub async fn memory_evolution(
        &self,
        topic: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<ReadResponse<EvolutionTree>> {
        self.read_path(
            "memory_evolution",
            now,
            self.lifecycle.memory_evolution(topic, self.group(), now),
        )
        .await
    }

    /// Records from `id` to the head of its chain. Failures propagate.
    pub async fn supersession_chain(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<Vec<Record>> {
        self.monitored("supersession_chain", now, self.lifecycle.supersession_chain(id))
            .await
    }

    // ── Write paths ────────────────────────────────────────────────────────

    /// Capture new content as a single append.
    ///
    /// Signals are scored before the append so the record is written with its
    /// score in one step. Invalid signals reject the capture.
    pub async fn capture(
        &self,
        request: CaptureRequest,
        now: DateTime<Utc>,
    ) -> MnemosResult<String> {
        let span = capture_span!(request.source, request.signals.len());
        self.monitored("capture", now, self.capture_record(request, now))
            .instrument(span)
            .await
    }

    async fn capture_record(
        &self,
        request: CaptureRequest,
        now: DateTime<Utc>,
    ) -> MnemosResult<String> {
        let mut record =
            Record::new(request.content, request.source, now).with_group(self.group());
        if let Some(title) = request.title {
            record = record.with_title(title);
        }
        if !request.signals.is_empty() {
            record.metadata.behavioral = Some(self.scoring.score(&request.signals, now)?);
        }
        self.lifecycle.capture(record).await
    }

    /// Score `signals` and attach the result to an existing record.
    pub async fn attach_score(
        &self,
        id: &str,
        signals: &[BehavioralSignal],
        now: DateTime<Utc>,
    ) -> MnemosResult<BehavioralScore> {
        self.monitored(
            "attach_score",
            now,
            self.scoring.attach(self.store().as_ref(), id, signals, now),
        )
        .await
    }

    pub async fn supersede(
        &self,
        old_id: &str,
        new_content: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<String> {
        self.monitored(
            "supersede",
            now,
            self.lifecycle.supersede(old_id, new_content, reason, now),
        )
        .await
    }

    pub async fn deprecate(&self, id: &str, reason: &str, now: DateTime<Utc>) -> MnemosResult<()> {
        self.monitored("deprecate", now, self.lifecycle.deprecate(id, reason, now))
            .await
    }

    // ── Discriminated variants ─────────────────────────────────────────────

    pub async fn search_outcome(
        &self,
        request: &SearchRequest,
        now: DateTime<Utc>,
    ) -> OperationOutcome<ReadResponse<ScoredBatch>> {
        self.search(request, now).await.into()
    }

    pub async fn capture_outcome(
        &self,
        request: CaptureRequest,
        now: DateTime<Utc>,
    ) -> OperationOutcome<String> {
        self.capture(request, now).await.into()
    }

    pub async fn supersede_outcome(
        &self,
        old_id: &str,
        new_content: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> OperationOutcome<String> {
        self.supersede(old_id, new_content, reason, now).await.into()
    }

    pub async fn deprecate_outcome(
        &self,
        id: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> OperationOutcome<()> {
        self.deprecate(id, reason, now).await.into()
    }

    // ── Observability ──────────────────────────────────────────────────────

    pub fn record_operation_event(&self, event: CascadeEvent) -> Option<CascadeVerdict> {
        self.observability.record_operation_event(event)
    }

    pub fn should_sample(&self, ctx: &SamplingContext, now: DateTime<Utc>) -> bool {
        self.observability.should_sample_at(ctx, now)
    }

    pub fn active_cascades(&self, now: DateTime<Utc>) -> Vec<CascadeVerdict> {
        self.observability.active_cascades(now)
    }

    pub fn cascade_statistics(&self, now: DateTime<Utc>) -> CascadeStatistics {
        self.observability.cascade_statistics(now)
    }

    pub fn predict_risk(
        &self,
        memory_percent: f64,
        avg_latency_seconds: f64,
        error_rate: f64,
        now: DateTime<Utc>,
    ) -> RiskPrediction {
        self.observability.predict_risk(memory_percent, avg_latency_seconds, error_rate, now)
    }

    pub fn sampling_stats(&self, now: DateTime<Utc>) -> SamplingStats {
        self.observability.sampling_stats(now)
    }

    pub fn scoring_report(&self, now: DateTime<Utc>) -> ScoringReport {
        self.scoring.scoring_report(now)
    }

    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.observability.degradations()
    }

    // ── Policy helpers ─────────────────────────────────────────────────────

    /// Run `call`, reporting its duration when self-monitoring is on.
    async fn monitored<T, F>(
        &self,
        operation: &'static str,
        now: DateTime<Utc>,
        call: F,
    ) -> MnemosResult<T>
    where
        F: Future<Output = MnemosResult<T>>,
    {
        let timer = OperationTimer::start(operation, now);
        let result = call.await;
        if self.config.service.self_monitoring {
            timer.finish(&self.observability, result.as_ref().err());
        }
        result
    }

    /// Run a read `call`, replacing store failures with the empty fallback.
    async fn read_path<T, F>(
        &self,
        operation: &'static str,
        now: DateTime<Utc>,
        call: F,
    ) -> MnemosResult<ReadResponse<T>>
    where
        T: Default,
        F: Future<Output = MnemosResult<T>>,
    {
        match self.monitored(operation, now, call).await {
            Ok(data) => {
                if self.observability.is_degraded(STORE_COMPONENT) {
                    let recovered = self.observability.mark_recovered(STORE_COMPONENT, now);
                    tracing::info!(
                        event = "collaborator_recovered",
                        component = STORE_COMPONENT,
                        recovered,
                        "record store recovered"
                    );
                }
                Ok(ReadResponse::fresh(data))
            }
            Err(err) if err.is_collaborator_failure() => {
                self.degrade(operation, &err, now);
                Ok(ReadResponse::fallback())
            }
            Err(err) => Err(err),
        }
    }

    fn degrade(&self, operation: &str, err: &MnemosError, now: DateTime<Utc>) {
        self.observability.record_degradation(DegradationEvent::new(
            STORE_COMPONENT,
            operation,
            err.to_string(),
            "empty_results",
            now,
        ));
    }
}
