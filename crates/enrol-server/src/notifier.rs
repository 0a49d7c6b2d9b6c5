//! The success banner and its auto-hide timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug)]
struct Banner {
    message: String,
    shown_at: Instant,
}

/// Shows a confirmation message that hides itself after a fixed delay.
///
/// Showing again restarts the delay. Dismissing or dropping the notifier
/// cancels any pending timer.
#[derive(Debug)]
pub struct SuccessNotifier {
    banner: Arc<Mutex<Option<Banner>>>,
    duration: Duration,
    timer: Option<JoinHandle<()>>,
}

fn lock(banner: &Mutex<Option<Banner>>) -> MutexGuard<'_, Option<Banner>> {
    banner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SuccessNotifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            banner: Arc::new(Mutex::new(None)),
            duration,
            timer: None,
        }
    }

    /// Shows `message` and schedules it to disappear.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn show(&mut self, message: impl Into<String>) {
        self.cancel();
        *lock(&self.banner) = Some(Banner {
            message: message.into(),
            shown_at: Instant::now(),
        });

        let banner = Arc::clone(&self.banner);
        let duration = self.duration;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            *lock(&banner) = None;
            debug!("success banner hidden");
        }));
    }

    /// The message currently showing.
    pub fn current(&self) -> Option<String> {
        lock(&self.banner).as_ref().map(|b| b.message.clone())
    }

    /// Time left before the banner hides, if it is showing.
    pub fn remaining(&self) -> Option<Duration> {
        lock(&self.banner)
            .as_ref()
            .map(|b| self.duration.saturating_sub(b.shown_at.elapsed()))
    }

    /// Hides the banner now.
    pub fn dismiss(&mut self) {
        self.cancel();
        *lock(&self.banner) = None;
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SuccessNotifier {
    fn drop(&mut self) {
        self.cancel();
    }
}
