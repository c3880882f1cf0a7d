use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Limits on a single solve. Both are checked between augmentations; hitting either one ends the
/// solve with an interrupted outcome.
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    max_augmentations: Option<usize>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SolverOptions {
    pub fn with_max_augmentations(mut self, max_augmentations: usize) -> SolverOptions {
        self.max_augmentations = Some(max_augmentations);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> SolverOptions {
        self.cancel = Some(cancel);
        self
    }

    pub fn max_augmentations(&self) -> Option<usize> {
        self.max_augmentations
    }

    pub(crate) fn should_stop(&self, augmentations: usize) -> bool {
        self.max_augmentations
            .map_or(false, |max| augmentations >= max)
            || self
                .cancel
                .as_ref()
                .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}
