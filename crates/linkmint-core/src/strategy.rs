use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// One attempt at producing a result, with its own wall-clock budget.
///
/// Both pipelines are "try several independent things until one is good
/// enough" loops; this trait is the shared shape of a single attempt.
/// `attempt` returns `None` for any failure (network errors, timeouts at
/// a lower layer, responses that fail validation) so that a broken
/// strategy can never abort the pipeline.
#[async_trait]
pub trait Strategy<I, O>: Send + Sync
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    fn name(&self) -> &str;

    /// Maximum time this strategy may run before the runner gives up on it.
    fn budget(&self) -> Duration;

    async fn attempt(&self, input: &I) -> Option<O>;
}

/// Runs strategies in priority order, returning the first result that the
/// `accept` predicate approves. A timed-out or empty attempt falls through
/// to the next strategy.
pub async fn run_ordered<I, O>(
    strategies: &[Arc<dyn Strategy<I, O>>],
    input: &I,
    accept: impl Fn(&O) -> bool,
) -> Option<O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    for strategy in strategies {
        match tokio::time::timeout(strategy.budget(), strategy.attempt(input)).await {
            Ok(Some(result)) if accept(&result) => {
                debug!(strategy = strategy.name(), "strategy produced an accepted result");
                return Some(result);
            }
            Ok(Some(_)) => {
                debug!(strategy = strategy.name(), "result rejected, trying next strategy");
            }
            Ok(None) => {
                debug!(strategy = strategy.name(), "strategy yielded nothing");
            }
            Err(_) => {
                warn!(
                    strategy = strategy.name(),
                    budget_ms = strategy.budget().as_millis() as u64,
                    "strategy timed out"
                );
            }
        }
    }

    None
}

/// Runs all strategies concurrently and returns the first accepted result,
/// abandoning the rest. Completion order, not list order, decides the
/// winner.
pub async fn run_race<I, O>(
    strategies: Vec<Arc<dyn Strategy<I, O>>>,
    input: Arc<I>,
    accept: impl Fn(&O) -> bool,
) -> Option<O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    let mut set = JoinSet::new();
    for strategy in strategies {
        let input = Arc::clone(&input);
        set.spawn(async move {
            let name = strategy.name().to_string();
            let result = tokio::time::timeout(strategy.budget(), strategy.attempt(&input))
                .await
                .ok()
                .flatten();
            (name, result)
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Some(result))) if accept(&result) => {
                debug!(strategy = %name, "race won");
                set.abort_all();
                return Some(result);
            }
            Ok((name, _)) => {
                debug!(strategy = %name, "race entrant produced no accepted result");
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                warn!(error = %e, "race task panicked");
            }
        }
    }

    None
}
