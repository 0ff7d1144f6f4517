use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One progress callback payload from a long-running device operation.
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub current: u64,
    pub total: u64,

    /// Unit the counters are expressed in, e.g. "bytes" or "sectors".
    pub unit: &'static str,

    pub message: Option<String>,
}

/// Callback long-running operations report through.
pub type ProgressCallback = Arc<dyn Fn(ProgressReport) + Send + Sync>;

/// Does nothing with the reports; for callers that don't display progress.
pub fn discard_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Cooperative cancellation flag shared between a caller and an operation.
/// Operations check it between chunks; nothing is preempted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
