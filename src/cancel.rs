//! Shared stop flag for the exhaustive search.
//!
//! The flag is set by a deadline holder (another thread or a timer) and polled by the search.
//! Signaling is idempotent. The search never resets the flag itself, the owner of the token must
//! call [reset](CancelToken::reset) before reusing it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// asks the search to stop
    pub fn signal(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
} // end of impl CancelToken

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn clones_share_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.signal();
        token.signal();
        assert!(other.is_cancelled());
        other.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn visible_from_thread() {
        let token = CancelToken::new();
        let other = token.clone();
        let handle = std::thread::spawn(move || {
            while !other.is_cancelled() {
                std::thread::yield_now();
            }
            true
        });
        token.signal();
        assert!(handle.join().unwrap());
    }
} // end of mod tests
