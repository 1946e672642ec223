//! App lock gated on device authentication.
//!
//! [`AppLock`] holds the locked/unlocked state. Unlocking goes through an
//! [`Authenticator`], whose completion may run on any thread; the state is
//! shared so clones observe the same result.
//!
//! A device that cannot authenticate at all does not lock the user out: the
//! request succeeds and a warning is logged.
//!
//! # Example
//!
//! ```
//! use quill::lock::{AppLock, DeviceUnavailable};
//! use std::sync::Arc;
//!
//! let lock = AppLock::new(Arc::new(DeviceUnavailable), true);
//! assert!(!lock.is_unlocked());
//! assert!(lock.unlock_blocking("Unlock your journal"));
//! assert!(lock.is_unlocked());
//! ```

use crate::errors::AuthError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use tracing::{debug, info, warn};

/// Completion handed to [`Authenticator::evaluate`].
pub type Completion = Box<dyn FnOnce(Result<(), AuthError>) + Send + 'static>;

/// Device authentication, such as a fingerprint or face prompt.
pub trait Authenticator: Send + Sync {
    /// Whether the device can authenticate the user at all.
    fn can_evaluate(&self) -> bool;

    /// Prompts the user with `reason` and calls `completion` exactly once.
    fn evaluate(&self, reason: &str, completion: Completion);
}

/// Authenticator for devices with no authentication hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceUnavailable;

impl Authenticator for DeviceUnavailable {
    fn can_evaluate(&self) -> bool {
        false
    }

    fn evaluate(&self, _reason: &str, completion: Completion) {
        completion(Err(AuthError::Failed("no authentication device".to_string())));
    }
}

#[derive(Clone)]
pub struct AppLock {
    authenticator: Arc<dyn Authenticator>,
    unlocked: Arc<AtomicBool>,
    required: bool,
}

impl AppLock {
    /// Creates a lock. With `require_unlock` false it starts, and stays, unlocked.
    pub fn new(authenticator: Arc<dyn Authenticator>, require_unlock: bool) -> Self {
        Self {
            authenticator,
            unlocked: Arc::new(AtomicBool::new(!require_unlock)),
            required: require_unlock,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }

    /// Relocks, if unlocking is required at all.
    pub fn lock(&self) {
        if self.required {
            debug!("Locking journal");
            self.unlocked.store(false, Ordering::SeqCst);
        }
    }

    /// Starts an unlock attempt. `on_done` receives the resulting unlocked state.
    pub fn request_unlock<F>(&self, reason: &str, on_done: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        if self.is_unlocked() {
            on_done(true);
            return;
        }

        if !self.authenticator.can_evaluate() {
            warn!("Device cannot authenticate, unlocking without a prompt");
            self.unlocked.store(true, Ordering::SeqCst);
            on_done(true);
            return;
        }

        let unlocked = Arc::clone(&self.unlocked);
        self.authenticator.evaluate(
            reason,
            Box::new(move |result| {
                let success = match result {
                    Ok(()) => {
                        info!("Journal unlocked");
                        true
                    }
                    Err(e) => {
                        warn!("Unlock failed: {}", e);
                        false
                    }
                };
                unlocked.store(success, Ordering::SeqCst);
                on_done(success);
            }),
        );
    }

    /// Runs [`AppLock::request_unlock`] and waits for its completion.
    pub fn unlock_blocking(&self, reason: &str) -> bool {
        let (tx, rx) = mpsc::channel();
        self.request_unlock(reason, move |success| {
            let _ = tx.send(success);
        });
        rx.recv().unwrap_or(false)
    }
}

impl std::fmt::Debug for AppLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLock")
            .field("required", &self.required)
            .field("unlocked", &self.is_unlocked())
            .finish()
    }
}
