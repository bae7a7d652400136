//! In-process `ProjectSource` fakes (testing only)
//!
//! Each fake counts its calls so tests can assert how often the view fetched.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::domain::{FetchError, Project};
use crate::fetcher::ProjectSource;

type FetchResult = Result<Vec<Project>, FetchError>;

/// Convenience `Transport` error for scripting failures.
pub fn unreachable_error() -> FetchError {
    FetchError::Transport {
        url: "fake://projects".to_string(),
        message: "connection refused".to_string(),
    }
}

/// Returns the same result on every call, immediately.
#[derive(Debug)]
pub struct StaticSource {
    result: FetchResult,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn ok(projects: Vec<Project>) -> Self {
        Self {
            result: Ok(projects),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectSource for StaticSource {
    async fn fetch(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Returns queued results in order; fails once the queue is empty.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<FetchResult>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new<I>(results: I) -> Self
    where
        I: IntoIterator<Item = FetchResult>,
    {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectSource for ScriptedSource {
    async fn fetch(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unreachable_error()))
    }
}

/// Never resolves.
#[derive(Debug, Default)]
pub struct PendingSource {
    calls: AtomicUsize,
}

impl PendingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectSource for PendingSource {
    async fn fetch(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Handle that lets one gated fetch resolve.
#[derive(Debug, Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn open(&self) {
        self.0.add_permits(1);
    }
}

/// Each call takes the next queued result and holds it until that entry's
/// [`Gate`] is opened, so tests control the order in which fetches resolve.
#[derive(Debug, Default)]
pub struct GatedSource {
    script: Mutex<VecDeque<(Gate, FetchResult)>>,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `result` for the next call and return its gate.
    pub fn push(&self, result: FetchResult) -> Gate {
        let gate = Gate(Arc::new(Semaphore::new(0)));
        self.script
            .lock()
            .unwrap()
            .push_back((gate.clone(), result));
        gate
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectSource for GatedSource {
    async fn fetch(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let Some((gate, result)) = next else {
            return Err(unreachable_error());
        };
        // Closed only if the semaphore is dropped, which the gate prevents.
        let _permit = gate.0.acquire().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_source_order() {
        let source = ScriptedSource::new([Ok(vec![]), Err(unreachable_error())]);
        assert!(source.fetch().await.is_ok());
        assert!(source.fetch().await.is_err());
        assert!(source.fetch().await.is_err());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_gated_source_waits_for_gate() {
        let source = Arc::new(GatedSource::new());
        let gate = source.push(Ok(vec![Project::new("a", "A", "")]));

        let s = source.clone();
        let task = tokio::spawn(async move { s.fetch().await });
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.open();
        let projects = task.await.unwrap().unwrap();
        assert_eq!(projects.len(), 1);
    }
}
