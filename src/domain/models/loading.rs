#[cfg(test)]
#[path = "loading_test.rs"]
mod tests;

use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Per-screen in-flight flag. Screens consult it to refuse a second submit
/// while a request is pending.
#[derive(Debug, Default)]
pub struct Loading {
    active: AtomicBool,
}

struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Loading {
    pub fn is_loading(&self) -> bool {
        return self.active.load(Ordering::SeqCst);
    }

    /// Runs `fut` with the flag raised. The flag drops back on every exit
    /// path, including errors and a dropped future. Returns `None` without
    /// polling `fut` when a call is already in flight.
    pub async fn track<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        if self.active.swap(true, Ordering::SeqCst) {
            tracing::debug!("Ignoring submit while a request is in flight");
            return None;
        }

        let _guard = LoadingGuard { flag: &self.active };
        return Some(fut.await);
    }
}
