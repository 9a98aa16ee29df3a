//! Teardown guard for deferred work.
//!
//! The transition-lock deadline and the fullscreen request both outlive the
//! command that started them. Each holds a clone of the session's token and
//! checks it before touching session state.

use crate::error::{ReaderError, Result};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn check_cancelled(&self, stage: &'static str) -> Result<()> {
        if self.is_cancelled() {
            return Err(ReaderError::Cancelled { stage });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let token = CancellationToken::new();
        let pending = token.clone();
        assert!(pending.check_cancelled("fullscreen").is_ok());

        token.cancel();
        assert!(pending.is_cancelled());
        let err = pending
            .check_cancelled("fullscreen")
            .expect_err("cancelled token should refuse");
        assert_eq!(err.to_string(), "operation cancelled at stage=fullscreen");
    }
}
