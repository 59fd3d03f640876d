// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! Cancellation for scheduled level advances.
//!
//! The session owns a [`CancellationSource`] for each pending advance and
//! hands a [`CancellationToken`] to whatever host timer will call back into
//! it. Any layout change, suspension, or disposal cancels the source, after
//! which the stale callback is ignored.
//!
//! ```
//! use splitcraft_runtime::cancellation::CancellationSource;
//! use web_time::Duration;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//!
//! let timer = std::thread::spawn(move || token.wait_timeout(Duration::from_secs(5)));
//! source.cancel();
//! assert!(timer.join().unwrap_or(false));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use web_time::{Duration, Instant};

struct Shared {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Control side: cancels every token derived from it.
///
/// Dropping the source leaves its tokens uncancelled.
pub struct CancellationSource {
    shared: Arc<Shared>,
}

/// Observer side. Cheap to clone and `Send`.
#[derive(Clone)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                cancelled: AtomicBool::new(false),
                lock: Mutex::new(()),
                wake: Condvar::new(),
            }),
        }
    }

    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Cancel and wake any thread blocked in [`CancellationToken::wait_timeout`].
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
        let _guard = self.shared.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.shared.wake.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Sleep for up to `duration`, returning early on cancellation.
    ///
    /// Returns `true` if cancelled, `false` if the full duration elapsed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut guard = self.shared.lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if self.is_cancelled() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            guard = match self.shared.wake.wait_timeout(guard, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
