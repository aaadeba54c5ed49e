/// Translation adapter
///
/// Wraps a blocking `Translator` behind a worker pool. Callers submit text
/// and get a `PendingTranslation` back immediately; the provider call runs
/// on a pool thread and its outcome is collected with `wait()`.
pub mod mymemory;

pub use mymemory::MyMemoryTranslator;

use crossbeam_channel::{bounded, Receiver};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::TranslationError;

/// Blocking translation provider
///
/// Implementations translate one fragment per call into a fixed target
/// language. Failures are returned as errors, never as substitute text.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, TranslationError>;

    /// Target language code (for logging)
    fn target_language(&self) -> &str;
}

/// Handle to a translation running on the worker pool
pub struct PendingTranslation {
    rx: Receiver<Result<String, TranslationError>>,
}

impl PendingTranslation {
    /// Block until the task has settled
    pub fn wait(self) -> Result<String, TranslationError> {
        self.rx.recv().unwrap_or(Err(TranslationError::WorkerLost))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Non-blocking front for a blocking `Translator`
pub struct TranslationAdapter {
    translator: Arc<dyn Translator>,
    pool: ThreadPool,
}

impl TranslationAdapter {
    /// Create an adapter with `workers` pool threads
    pub fn new(translator: Arc<dyn Translator>, workers: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("translate-{}", i))
            .build()?;

        tracing::info!(
            "✓ Translation adapter ready ({} workers, target: {})",
            workers.max(1),
            translator.target_language()
        );

        Ok(Self { translator, pool })
    }

    /// Schedule a translation and return immediately
    pub fn submit(&self, text: String) -> PendingTranslation {
        let (tx, rx) = bounded(1);

        if text.trim().is_empty() {
            let _ = tx.send(Err(TranslationError::EmptyInput));
            return PendingTranslation { rx };
        }

        let translator = Arc::clone(&self.translator);
        self.pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| translator.translate(&text)))
                .unwrap_or_else(|payload| Err(TranslationError::Panicked(panic_message(&*payload))));

            // Receiver may already be gone if the caller abandoned the frame
            let _ = tx.send(result);
        });

        PendingTranslation { rx }
    }

    pub fn target_language(&self) -> &str {
        self.translator.target_language()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct UppercaseTranslator {
        calls: AtomicUsize,
    }

    impl Translator for UppercaseTranslator {
        fn translate(&self, text: &str) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match text {
                "fail" => Err(TranslationError::Transport("connection reset".to_string())),
                "panic" => panic!("provider exploded"),
                _ => Ok(text.to_uppercase()),
            }
        }

        fn target_language(&self) -> &str {
            "xx"
        }
    }

    fn adapter() -> (TranslationAdapter, Arc<UppercaseTranslator>) {
        let translator = Arc::new(UppercaseTranslator {
            calls: AtomicUsize::new(0),
        });
        let adapter = TranslationAdapter::new(translator.clone(), 4).unwrap();
        (adapter, translator)
    }

    #[test]
    fn test_submit_success() {
        let (adapter, _) = adapter();
        assert_eq!(adapter.submit("exit".to_string()).wait(), Ok("EXIT".to_string()));
    }

    #[test]
    fn test_submit_failure_is_explicit() {
        let (adapter, _) = adapter();
        assert_eq!(
            adapter.submit("fail".to_string()).wait(),
            Err(TranslationError::Transport("connection reset".to_string()))
        );
    }

    #[test]
    fn test_panic_is_contained() {
        let (adapter, _) = adapter();
        match adapter.submit("panic".to_string()).wait() {
            Err(TranslationError::Panicked(message)) => assert!(message.contains("exploded")),
            other => panic!("Expected Panicked, got {:?}", other),
        }

        // Pool keeps working after a panicking task
        assert_eq!(adapter.submit("ok".to_string()).wait(), Ok("OK".to_string()));
    }

    #[test]
    fn test_empty_input_never_reaches_provider() {
        let (adapter, translator) = adapter();
        assert_eq!(
            adapter.submit("   ".to_string()).wait(),
            Err(TranslationError::EmptyInput)
        );
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }
}
