use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::reader::ReaderError;

/// Cooperative cancellation flag shared between a query and its caller.
///
/// Clones share the flag. Queries check it between record batches.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn check(&self) -> Result<(), ReaderError> {
        if self.is_cancelled() {
            Err(ReaderError::Cancelled)
        } else {
            Ok(())
        }
    }
}
