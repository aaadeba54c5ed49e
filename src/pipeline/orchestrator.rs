/// Fragment translation orchestrator
///
/// Fans one translation task out per fragment and waits for all of them.
/// A failed fragment is dropped; its siblings are unaffected.
use crate::capture::Frame;
use crate::fragment::{TextFragment, TranslatedFragment};
use crate::translation::TranslationAdapter;

/// What happened to one frame's fragment set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub translated: Vec<TranslatedFragment>,
    /// Fragments whose translation failed
    pub failed: usize,
    /// Fragments whose box fell outside the frame
    pub out_of_bounds: usize,
}

impl BatchOutcome {
    pub fn dropped(&self) -> usize {
        self.failed + self.out_of_bounds
    }
}

pub struct FragmentOrchestrator {
    adapter: TranslationAdapter,
}

impl FragmentOrchestrator {
    pub fn new(adapter: TranslationAdapter) -> Self {
        Self { adapter }
    }

    /// Translate every fragment concurrently; returns once all tasks settled
    pub fn translate_all(&self, fragments: Vec<TextFragment>) -> Vec<TranslatedFragment> {
        self.translate_batch(fragments).translated
    }

    /// Like `translate_all`, but first drops fragments whose region of
    /// interest does not fit inside `frame`
    pub fn translate_within(&self, frame: &Frame, fragments: Vec<TextFragment>) -> BatchOutcome {
        let (width, height) = frame.dimensions();
        let total = fragments.len();

        let in_bounds: Vec<TextFragment> = fragments
            .into_iter()
            .filter(|fragment| match fragment.bounds().check_within(width, height) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!("[orchestrator] dropping {:?}: {}", fragment.source_text(), e);
                    false
                }
            })
            .collect();

        let out_of_bounds = total - in_bounds.len();
        let mut outcome = self.translate_batch(in_bounds);
        outcome.out_of_bounds = out_of_bounds;
        outcome
    }

    fn translate_batch(&self, fragments: Vec<TextFragment>) -> BatchOutcome {
        if fragments.is_empty() {
            return BatchOutcome::default();
        }

        // Fan out: every task is scheduled before any result is awaited
        let pending: Vec<_> = fragments
            .into_iter()
            .map(|fragment| {
                let handle = self.adapter.submit(fragment.source_text().to_string());
                (fragment, handle)
            })
            .collect();

        // Fan in: barrier over all tasks
        let mut outcome = BatchOutcome {
            translated: Vec::with_capacity(pending.len()),
            ..BatchOutcome::default()
        };
        for (fragment, handle) in pending {
            match handle.wait() {
                Ok(text) => outcome.translated.push(fragment.into_translated(text)),
                Err(e) => {
                    tracing::warn!(
                        "[orchestrator] translation of {:?} failed: {}",
                        fragment.source_text(),
                        e
                    );
                    outcome.failed += 1;
                }
            }
        }

        tracing::debug!(
            "[orchestrator] {} translated, {} failed ({})",
            outcome.translated.len(),
            outcome.failed,
            self.adapter.target_language()
        );

        outcome
    }
}
