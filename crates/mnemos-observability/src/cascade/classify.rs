//! Pattern rules, evaluated in precedence order over the in-window events.

use std::collections::BTreeMap;

use mnemos_core::config::CascadeConfig;

use super::event::{CascadeEvent, OperationKind};
use super::verdict::CascadeKind;

/// A matched pattern before verdict bookkeeping.
#[derive(Debug, Clone)]
pub struct Classification {
    pub kind: CascadeKind,
    /// The events that corroborate the pattern, oldest first.
    pub events: Vec<CascadeEvent>,
    /// Whether the triggering signal exceeded its threshold by the critical multiple.
    pub exceeds_critically: bool,
}

/// Classify a time-ordered window. Returns `None` below `min_events` or when
/// no rule matches.
///
/// Precedence: memory exhaustion, LLM timeout, latency propagation,
/// semaphore starvation, batch overflow.
pub fn classify(window: &[CascadeEvent], config: &CascadeConfig) -> Option<Classification> {
    if window.len() < config.min_events {
        return None;
    }
    memory_exhaustion(window, config)
        .or_else(|| llm_timeout(window, config))
        .or_else(|| latency_propagation(window, config))
        .or_else(|| semaphore_starvation(window, config))
        .or_else(|| batch_overflow(window, config))
}

/// Length of the longest suffix where each adjacent pair satisfies `keep(prev, next)`
/// and every member satisfies `member`.
fn trailing_run<F, M>(window: &[CascadeEvent], member: M, keep: F) -> usize
where
    F: Fn(&CascadeEvent, &CascadeEvent) -> bool,
    M: Fn(&CascadeEvent) -> bool,
{
    let Some(last) = window.last() else {
        return 0;
    };
    if !member(last) {
        return 0;
    }
    let mut run = 1;
    for pair in window.windows(2).rev() {
        if member(&pair[0]) && keep(&pair[0], &pair[1]) {
            run += 1;
        } else {
            break;
        }
    }
    run
}

fn tail(window: &[CascadeEvent], run: usize) -> Vec<CascadeEvent> {
    window[window.len() - run..].to_vec()
}

fn memory_exhaustion(window: &[CascadeEvent], config: &CascadeConfig) -> Option<Classification> {
    let run = trailing_run(
        window,
        |_| true,
        |prev, next| next.memory_percent > prev.memory_percent,
    );
    let latest = window.last()?.memory_percent;
    if run < config.min_events || latest < config.memory_pressure_threshold {
        return None;
    }
    Some(Classification {
        kind: CascadeKind::MemoryExhaustion,
        events: tail(window, run),
        exceeds_critically: latest >= config.memory_critical_percent,
    })
}

fn llm_timeout(window: &[CascadeEvent], config: &CascadeConfig) -> Option<Classification> {
    let timed_out: Vec<CascadeEvent> = window
        .iter()
        .filter(|e| {
            e.kind == OperationKind::RemoteCall
                && e.duration_seconds > config.long_call_threshold_seconds
        })
        .cloned()
        .collect();
    if timed_out.is_empty() {
        return None;
    }
    let worst = timed_out.iter().map(|e| e.duration_seconds).fold(0.0, f64::max);
    Some(Classification {
        kind: CascadeKind::LlmTimeout,
        events: timed_out,
        exceeds_critically: worst
            >= config.long_call_threshold_seconds * config.critical_exceedance,
    })
}

fn latency_propagation(window: &[CascadeEvent], config: &CascadeConfig) -> Option<Classification> {
    let threshold = config.latency_threshold_seconds;
    let run = trailing_run(
        window,
        |e| e.duration_seconds > threshold,
        |prev, next| next.duration_seconds >= prev.duration_seconds,
    );
    if run < config.min_events {
        return None;
    }
    let latest = window.last()?.duration_seconds;
    Some(Classification {
        kind: CascadeKind::LatencyPropagation,
        events: tail(window, run),
        exceeds_critically: latest >= threshold * config.critical_exceedance,
    })
}

fn semaphore_starvation(window: &[CascadeEvent], config: &CascadeConfig) -> Option<Classification> {
    let mut by_operation: BTreeMap<&str, Vec<&CascadeEvent>> = BTreeMap::new();
    for event in window {
        if event.duration_seconds > config.wait_threshold_seconds
            && event.memory_delta_mb.abs() <= config.flat_memory_tolerance_mb
        {
            by_operation.entry(event.operation.as_str()).or_default().push(event);
        }
    }
    let (_, starved) = by_operation
        .into_iter()
        .filter(|(_, events)| events.len() >= config.min_events)
        .max_by_key(|(_, events)| events.len())?;
    let worst = starved.iter().map(|e| e.duration_seconds).fold(0.0, f64::max);
    Some(Classification {
        kind: CascadeKind::SemaphoreStarvation,
        events: starved.into_iter().cloned().collect(),
        exceeds_critically: worst >= config.wait_threshold_seconds * config.critical_exceedance,
    })
}

fn batch_overflow(window: &[CascadeEvent], config: &CascadeConfig) -> Option<Classification> {
    if window.len() <= config.batch_limit {
        return None;
    }
    Some(Classification {
        kind: CascadeKind::BatchOverflow,
        events: window.to_vec(),
        exceeds_critically: window.len() as f64
            >= config.batch_limit as f64 * config.critical_exceedance,
    })
}
