use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{Resource, ResourceFinder};
use crate::error::{LookupError, Result};

/// Bounds the latency of another finder
///
/// Each lookup runs the delegate on its own task and races it against a
/// timer. On timeout the caller gets [`LookupError::TimedOut`] immediately;
/// the delegate task is left to finish and its result is dropped. A panic in
/// the delegate is caught at the task boundary and reads as "no results".
pub struct TimeoutFinder {
    delegate: Arc<dyn ResourceFinder>,
    timeout: Duration,
}

impl TimeoutFinder {
    pub fn new(delegate: Arc<dyn ResourceFinder>, timeout: Duration) -> Self {
        Self { delegate, timeout }
    }
}

#[async_trait]
impl ResourceFinder for TimeoutFinder {
    async fn lookup(&self, locator: &[String]) -> Result<Vec<Resource>> {
        let delegate = Arc::clone(&self.delegate);
        let owned = locator.to_vec();
        let task = tokio::spawn(async move { delegate.lookup(&owned).await });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) if join_error.is_panic() => {
                debug!("resource lookup for {:?} panicked", locator);
                Ok(Vec::new())
            }
            Ok(Err(join_error)) => Err(LookupError::Aborted(join_error.to_string()).into()),
            Err(_) => {
                debug!("resource lookup for {:?} timed out after {:?}", locator, self.timeout);
                Err(LookupError::TimedOut(self.timeout).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::error::KubeshError;

    /// Answers with two pods after a fixed delay
    struct TimedFinder {
        delay: Duration,
    }

    #[async_trait]
    impl ResourceFinder for TimedFinder {
        async fn lookup(&self, _locator: &[String]) -> Result<Vec<Resource>> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![Resource::new("pods", "p1"), Resource::new("pods", "p2")])
        }
    }

    struct PanickingFinder;

    #[async_trait]
    impl ResourceFinder for PanickingFinder {
        async fn lookup(&self, _locator: &[String]) -> Result<Vec<Resource>> {
            panic!("lookup exploded");
        }
    }

    fn finder(delegate: impl ResourceFinder + 'static, timeout: Duration) -> TimeoutFinder {
        TimeoutFinder::new(Arc::new(delegate), timeout)
    }

    #[tokio::test]
    async fn test_slow_lookup_times_out() {
        let finder = finder(
            TimedFinder {
                delay: Duration::from_secs(1),
            },
            Duration::from_millis(100),
        );

        let started = Instant::now();
        let result = finder.lookup(&["pods".to_string()]).await;

        assert!(started.elapsed() < Duration::from_millis(800));
        assert!(matches!(
            result,
            Err(KubeshError::Lookup(LookupError::TimedOut(_)))
        ));
    }

    #[tokio::test]
    async fn test_fast_lookup_passes_through() {
        let finder = finder(
            TimedFinder {
                delay: Duration::from_millis(1),
            },
            Duration::from_secs(1),
        );

        let found = finder.lookup(&["pods".to_string()]).await.unwrap();
        assert_eq!(
            found,
            vec![Resource::new("pods", "p1"), Resource::new("pods", "p2")]
        );
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let finder = finder(PanickingFinder, Duration::from_secs(1));
        let found = finder.lookup(&["pods".to_string()]).await.unwrap();
        assert!(found.is_empty());
    }
}
