//! Helpers for tests that mutate process environment state.

use std::sync::{Mutex, OnceLock};

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Runs the closure while holding the process-wide env mutation lock.
/// A poisoned lock is taken over rather than propagated, so one failing
/// test cannot wedge the rest of the suite.
pub(crate) fn with_locked_env<R>(run: impl FnOnce() -> R) -> R {
    let _guard = env_lock()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    run()
}

/// Scoped override of one environment variable.
///
/// Captures the previous value and restores it on drop, including during
/// unwinding, so a failing assertion cannot leak the override into later
/// tests. Must be used inside [`with_locked_env`]; env mutation is not
/// serialized otherwise.
pub(crate) struct ScopedVar {
    key: &'static str,
    previous: Option<String>,
}

impl ScopedVar {
    /// Sets `key` to `value` until the guard drops.
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: callers hold the env lock via `with_locked_env`.
        unsafe { std::env::set_var(key, value) };
        Self { key, previous }
    }

    /// Unsets `key` until the guard drops.
    pub(crate) fn unset(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: callers hold the env lock via `with_locked_env`.
        unsafe { std::env::remove_var(key) };
        Self { key, previous }
    }
}

impl Drop for ScopedVar {
    fn drop(&mut self) {
        // SAFETY: drop runs inside the same `with_locked_env` scope that
        // created the guard.
        unsafe {
            match self.previous.take() {
                Some(value) => std::env::set_var(self.key, &value),
                None => std::env::remove_var(self.key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_var_restores_the_previous_value_on_drop() {
        with_locked_env(|| {
            let outer = ScopedVar::set("CHAINCHAT_SCOPED_TEST", "outer");
            {
                let _inner = ScopedVar::set("CHAINCHAT_SCOPED_TEST", "inner");
                assert_eq!(
                    std::env::var("CHAINCHAT_SCOPED_TEST").as_deref(),
                    Ok("inner")
                );
            }
            assert_eq!(
                std::env::var("CHAINCHAT_SCOPED_TEST").as_deref(),
                Ok("outer")
            );

            drop(outer);
            assert!(std::env::var("CHAINCHAT_SCOPED_TEST").is_err());
        });
    }
}
