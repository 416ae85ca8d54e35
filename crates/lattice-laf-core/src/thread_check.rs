//! Thread affinity verification for UI-thread state.
//!
//! The menu selection manager, the focus coordinator and the directory models
//! all assume they are driven from the thread that created them (the UI
//! thread). [`ThreadAffinity`] records that thread and lets owners assert it.
//!
//! Two levels of checking are provided:
//!
//! - [`ThreadAffinity::debug_assert_same_thread`]: only active in debug builds,
//!   while checks are enabled both globally and on the affinity itself.
//! - [`ThreadAffinity::assert_same_thread`]: always active.
//!
//! Owners built from per-instance configuration use
//! [`ThreadAffinity::with_checks_enabled`] so one owner opting out does not
//! affect any other.
//!
//! ```
//! use lattice_laf_core::ThreadAffinity;
//!
//! struct Chooser {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Chooser {
//!     fn rescan(&self) {
//!         self.affinity.debug_assert_same_thread();
//!         // ... touch UI-thread state ...
//!     }
//! }
//!
//! Chooser { affinity: ThreadAffinity::current() }.rescan();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Flag to enable/disable debug thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enable or disable debug thread checks.
///
/// By default, checks are enabled in debug builds and disabled in release
/// builds. [`ThreadAffinity::assert_same_thread`] ignores this flag.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check if debug thread checks are currently enabled.
#[inline]
pub fn are_thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::Relaxed)
}

/// Records the thread an object was created on.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
    checks_enabled: bool,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
            checks_enabled: true,
        }
    }

    /// Enable or disable debug checks for this affinity only.
    #[inline]
    pub fn with_checks_enabled(mut self, enabled: bool) -> Self {
        self.checks_enabled = enabled;
        self
    }

    /// Check if debug checks are enabled for this affinity.
    #[inline]
    pub fn checks_enabled(&self) -> bool {
        self.checks_enabled
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the same thread as the affinity.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_with_msg("object accessed from wrong thread")
    }

    /// Assert that we are on the same thread, with a custom message.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only assertion that we are on the same thread.
    ///
    /// A no-op in release builds or while checks are disabled, globally or
    /// for this affinity.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        if cfg!(debug_assertions) && self.checks_enabled && are_thread_checks_enabled() {
            self.assert_same_thread();
        }
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "thread affinity violation: {msg}\n\
             object was created on thread {:?}, accessed from \"{current_name}\" ({current_id:?}).\n\
             Menu selection, focus coordination and directory models must be driven \
             from the UI thread that created them.",
            self.thread_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_thread_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread();
        affinity.debug_assert_same_thread();
    }

    #[test]
    fn test_thread_affinity_different_thread() {
        let affinity = ThreadAffinity::current();
        let result = Arc::new(AtomicBool::new(false));
        let result_clone = result.clone();

        std::thread::spawn(move || {
            result_clone.store(!affinity.is_same_thread(), Ordering::SeqCst);
        })
        .join()
        .unwrap();

        assert!(result.load(Ordering::SeqCst));
    }

    #[test]
    fn test_thread_affinity_panic_on_wrong_thread() {
        let affinity = ThreadAffinity::current();

        let result = std::thread::spawn(move || {
            affinity.assert_same_thread();
        })
        .join();

        assert!(result.is_err(), "expected affinity violation panic");
    }

    #[test]
    fn test_per_affinity_checks_disabled() {
        let quiet = ThreadAffinity::current().with_checks_enabled(false);
        assert!(!quiet.checks_enabled());

        let result = std::thread::spawn(move || {
            quiet.debug_assert_same_thread();
        })
        .join();
        assert!(result.is_ok());
        assert!(ThreadAffinity::current().checks_enabled());
    }

    #[test]
    fn test_thread_checks_enabled_flag() {
        let original = are_thread_checks_enabled();

        set_thread_checks_enabled(true);
        assert!(are_thread_checks_enabled());
        set_thread_checks_enabled(false);
        assert!(!are_thread_checks_enabled());

        set_thread_checks_enabled(original);
    }
}
