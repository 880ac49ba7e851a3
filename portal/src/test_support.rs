//! Shared test doubles for unit and integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CredentialStore, CredentialStoreError, InMemoryCredentialStore, Navigator, Notice, Notifier,
    Surface,
};
use crate::domain::Credential;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *lock(&self.0) += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// Notifier that keeps every notice for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier(Mutex<Vec<Notice>>);

impl RecordingNotifier {
    /// Drain the notices recorded so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *lock(&self.0))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        lock(&self.0).push(notice);
    }
}

/// Navigator that records each request.
#[derive(Debug, Default)]
pub struct RecordingNavigator(Mutex<Vec<Surface>>);

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<Surface> {
        lock(&self.0).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, surface: Surface) {
        lock(&self.0).push(surface);
    }
}

/// In-memory store that counts how often it was erased.
#[derive(Debug, Default)]
pub struct CountingCredentialStore {
    inner: InMemoryCredentialStore,
    erasures: AtomicUsize,
}

impl CountingCredentialStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            inner: InMemoryCredentialStore::with_credential(credential),
            erasures: AtomicUsize::new(0),
        }
    }

    pub fn erasures(&self) -> usize {
        self.erasures.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        self.inner.load()
    }

    fn persist(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        self.inner.persist(credential)
    }

    fn erase(&self) -> Result<(), CredentialStoreError> {
        self.erasures.fetch_add(1, Ordering::SeqCst);
        self.inner.erase()
    }
}
