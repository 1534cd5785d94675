pub mod batch;
pub mod burden;
pub mod clash;
pub mod evaluation;
pub mod extraction;
pub mod inference;
pub mod issues;
pub mod linking;
pub mod pipeline;
pub mod speaker;
pub mod status;
pub mod verdict;

pub use inference::{
    InferenceClient, InferenceError, InferenceRequest, InferenceResponse, JsonExtractor,
    RetryPolicy, RetryingClient, StrictJsonExtractor,
};
pub use pipeline::DebatePipeline;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline control for one pipeline run.
///
/// Once the token fires or the deadline passes, remaining inference-backed
/// work short-circuits to its fallback values instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct RunBudget {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RunBudget {
    /// No cancellation and no deadline.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn cancelled_by(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn exhausted(&self) -> bool {
        self.cancel.is_cancelled()
            || self
                .deadline
                .map(|deadline| Instant::now() >= deadline)
                .unwrap_or(false)
    }
}

/// Stage output plus whether any of its batches fell back to a stage
/// default.
#[derive(Debug, Clone)]
pub struct StageResult<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> StageResult<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn degraded(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unbounded_budget_never_exhausts() {
        assert!(!RunBudget::unbounded().exhausted());
    }

    #[test]
    fn test_cancelled_token_exhausts_budget() {
        let token = CancellationToken::new();
        let budget = RunBudget::cancelled_by(token.clone());
        assert!(!budget.exhausted());
        token.cancel();
        assert!(budget.exhausted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exhausts_budget() {
        let budget = RunBudget::unbounded().with_deadline(Instant::now() + Duration::from_secs(5));
        assert!(!budget.exhausted());
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(budget.exhausted());
    }
}
