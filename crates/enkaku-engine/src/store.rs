//! [`DataStore`] — load lifecycle around an immutable [`Snapshot`].
//!
//! Constructed once at process start and passed to all query callers
//! (dependency injection; no global). `load()` is idempotent and
//! at-most-once per store lifetime: concurrent callers wait on the
//! in-flight load and observe its terminal state without re-triggering
//! fetches. A failed load is sticky until an explicit [`reset`]; a reset
//! discards the snapshot wholesale and the next `load()` rebuilds it from
//! scratch.
//!
//! [`reset`]: DataStore::reset

use std::sync::{Arc, PoisonError, RwLock};

use enkaku_core::source::{RecordSet, RecordSource};

use crate::{
  error::{Error, Result},
  snapshot::{ResolverOptions, Snapshot},
};

enum LoadState {
  Idle,
  Loaded(Arc<Snapshot>),
  Failed(String),
}

pub struct DataStore<S> {
  source:    S,
  options:   ResolverOptions,
  load_lock: tokio::sync::Mutex<()>,
  state:     RwLock<LoadState>,
}

impl<S: RecordSource> DataStore<S> {
  pub fn new(source: S) -> Self {
    Self::with_options(source, ResolverOptions::default())
  }

  pub fn with_options(source: S, options: ResolverOptions) -> Self {
    Self {
      source,
      options,
      load_lock: tokio::sync::Mutex::new(()),
      state: RwLock::new(LoadState::Idle),
    }
  }

  /// Fetch all input collections concurrently and build the snapshot.
  ///
  /// Returns the existing snapshot if one is already built, waits on an
  /// in-flight load rather than re-fetching, and surfaces the recorded
  /// error if a previous attempt failed.
  pub async fn load(&self) -> Result<Arc<Snapshot>> {
    if let Ok(snapshot) = self.snapshot() {
      tracing::debug!("data already loaded, skipping");
      return Ok(snapshot);
    }

    let _guard = self.load_lock.lock().await;

    // A load that was in flight while we waited has reached a terminal
    // state; observe it instead of fetching again.
    match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
      LoadState::Loaded(snapshot) => return Ok(snapshot.clone()),
      LoadState::Failed(message) => {
        return Err(Error::LoadFailed(message.clone()));
      }
      LoadState::Idle => {}
    }

    tracing::info!("loading record collections");
    match self.fetch_all().await {
      Ok(records) => {
        let snapshot =
          Arc::new(Snapshot::build(records, self.options.clone()));
        tracing::info!(
          prefectures = snapshot.prefectures.len(),
          counties = snapshot.counties.len(),
          versions = snapshot.versions.len(),
          events = snapshot.events.len(),
          municipalities = snapshot.municipalities().len(),
          "data store loaded"
        );
        *self.state.write().unwrap_or_else(PoisonError::into_inner) =
          LoadState::Loaded(snapshot.clone());
        Ok(snapshot)
      }
      Err(source_error) => {
        let message = source_error.to_string();
        tracing::error!(error = %message, "load failed");
        *self.state.write().unwrap_or_else(PoisonError::into_inner) =
          LoadState::Failed(message);
        Err(Error::Source(Box::new(source_error)))
      }
    }
  }

  async fn fetch_all(&self) -> Result<RecordSet, S::Error> {
    let (prefectures, subprefectures, counties, versions, events) = tokio::try_join!(
      self.source.fetch_prefectures(),
      self.source.fetch_subprefectures(),
      self.source.fetch_counties(),
      self.source.fetch_versions(),
      self.source.fetch_events(),
    )?;
    Ok(RecordSet {
      prefectures,
      subprefectures,
      counties,
      versions,
      events,
    })
  }

  /// The loaded snapshot, or [`Error::NotLoaded`].
  pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
    match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
      LoadState::Loaded(snapshot) => Ok(snapshot.clone()),
      _ => Err(Error::NotLoaded),
    }
  }

  /// Discard the snapshot (and any recorded failure) wholesale. The next
  /// `load()` re-fetches everything.
  pub async fn reset(&self) {
    let _guard = self.load_lock.lock().await;
    *self.state.write().unwrap_or_else(PoisonError::into_inner) =
      LoadState::Idle;
    tracing::info!("data store reset");
  }
}
