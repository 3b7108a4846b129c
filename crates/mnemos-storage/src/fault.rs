//! Toggleable failures and latency for exercising degradation paths.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashSet;
use mnemos_core::errors::{MnemosResult, StoreError};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Append,
    Get,
    TextSearch,
    SetMetadata,
    Scan,
}

impl StoreOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Get => "get",
            Self::TextSearch => "text_search",
            Self::SetMetadata => "set_metadata",
            Self::Scan => "scan",
        }
    }
}

#[derive(Debug, Default)]
pub struct FaultInjector {
    failing: DashSet<StoreOp>,
    delay_ms: AtomicU64,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `op` fail with `StoreError::Unavailable`.
    pub fn fail(&self, op: StoreOp) {
        self.failing.insert(op);
    }

    pub fn heal(&self, op: StoreOp) {
        self.failing.remove(&op);
    }

    pub fn heal_all(&self) {
        self.failing.clear();
        self.delay_ms.store(0, Ordering::Relaxed);
    }

    /// Delay every call by `delay` before it runs.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::Relaxed);
    }

    /// Apply the configured delay and failure for `op`.
    pub(crate) async fn before(&self, op: StoreOp) -> MnemosResult<()> {
        let delay = self.delay_ms.load(Ordering::Relaxed);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.failing.contains(&op) {
            return Err(StoreError::Unavailable {
                reason: format!("injected failure on {}", op.as_str()),
            }
            .into());
        }
        Ok(())
    }
}
