//! Terminal adapters for notices and navigation.
//!
//! A headless shell has no toasts or routes, so notices become log events and
//! navigation only records where the user should be.

use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::domain::ports::{Navigator, Notice, NoticeLevel, Notifier, Surface};

/// Emits every notice as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Success => info!(notice = notice.message(), "portal notice"),
            NoticeLevel::Error => warn!(notice = notice.message(), "portal notice"),
        }
    }
}

/// Tracks the surface the user was last sent to.
///
/// Navigating to the surface already shown is a no-op.
#[derive(Debug, Default)]
pub struct TracingNavigator {
    current: Mutex<Option<Surface>>,
}

impl TracingNavigator {
    /// Navigator with no surface shown yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface most recently navigated to.
    #[must_use]
    pub fn current(&self) -> Option<Surface> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for TracingNavigator {
    fn navigate(&self, surface: Surface) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == Some(surface) {
            return;
        }
        *current = Some(surface);
        info!(?surface, "navigating");
    }
}
