//! # Autosave Coordinator
//!
//! Serializes save attempts for one document against a stream of edits.
//!
//! ```text
//! trigger_save ──debounce──▶ perform_save ──▶ handler.save
//!                                 │ in flight?
//!                                 └──▶ stash as pending (last writer wins)
//!
//! idle ─▶ saving ─▶ saved ─(window)─▶ idle
//!                └▶ error ─(window)─▶ idle
//! ```
//!
//! At most one save is in flight. A payload stashed while a save runs is
//! saved right after it settles, whatever the outcome. Failed payloads are
//! not retried.
//!
//! All timers run on the ambient tokio runtime, so `trigger_save` must be
//! called from within one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::AutosaveConfig;
use crate::errors::SaveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

/// External persistence call
#[async_trait]
pub trait SaveHandler<P>: Send + Sync + 'static {
    async fn save(&self, payload: P) -> Result<(), SaveError>;
}

/// Debounced, non-overlapping saves for a single document
///
/// Not shareable across documents: the pending slot holds one payload.
pub struct AutosaveCoordinator<P> {
    inner: Arc<Inner<P>>,
}

struct Inner<P> {
    handler: Box<dyn SaveHandler<P>>,
    config: AutosaveConfig,
    status: watch::Sender<SaveStatus>,
    state: Mutex<State<P>>,
}

struct State<P> {
    in_flight: bool,
    pending: Option<P>,
    last_error: Option<String>,
    debounce: Option<JoinHandle<()>>,
    follow_up: Option<JoinHandle<()>>,
    status_reset: Option<JoinHandle<()>>,
    /// Bumped by every trigger; a debounce timer only fires if still current
    debounce_seq: u64,
    /// Bumped by `reset_status`; older saves no longer report status
    epoch: u64,
}

impl<P> Default for State<P> {
    fn default() -> Self {
        Self {
            in_flight: false,
            pending: None,
            last_error: None,
            debounce: None,
            follow_up: None,
            status_reset: None,
            debounce_seq: 0,
            epoch: 0,
        }
    }
}

impl<P: Send + 'static> AutosaveCoordinator<P> {
    pub fn new<H: SaveHandler<P>>(handler: H, config: AutosaveConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                handler: Box::new(handler),
                config,
                status,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// (Re)start the debounce timer with `payload`
    ///
    /// A payload still waiting on the timer is discarded.
    pub fn trigger_save(&self, payload: P) {
        let mut state = self.inner.lock();
        if let Some(timer) = state.debounce.take() {
            timer.abort();
            tracing::trace!("autosave: superseded pending debounce");
        }

        state.debounce_seq += 1;
        let seq = state.debounce_seq;
        let delay = self.inner.config.debounce();
        let inner = Arc::clone(&self.inner);

        state.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let claimed = {
                let mut state = inner.lock();
                if state.debounce_seq != seq {
                    return;
                }
                state.debounce = None;
                inner.claim(&mut state, payload)
            };
            if let Some((epoch, payload)) = claimed {
                tokio::spawn(Inner::run(inner, epoch, payload));
            }
        }));
    }

    /// Save `payload` now, or stash it if a save is already running
    pub async fn perform_save(&self, payload: P) {
        let claimed = {
            let mut state = self.inner.lock();
            self.inner.claim(&mut state, payload)
        };
        if let Some((epoch, payload)) = claimed {
            Inner::run(Arc::clone(&self.inner), epoch, payload).await;
        }
    }

    /// Cancel timers and report `idle` immediately
    ///
    /// A save already in flight runs to completion, but its outcome is no
    /// longer reported.
    pub fn reset_status(&self) {
        let mut state = self.inner.lock();
        state.cancel_timers();
        state.last_error = None;
        self.inner.status.send_replace(SaveStatus::Idle);
        tracing::debug!("autosave: status reset");
    }

    pub fn status(&self) -> SaveStatus {
        *self.inner.status.borrow()
    }

    /// Watch status transitions
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status.subscribe()
    }

    /// Message from the most recent failed save, until the next reset
    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    pub fn is_saving(&self) -> bool {
        self.inner.lock().in_flight
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lock().pending.is_some()
    }

    pub fn config(&self) -> &AutosaveConfig {
        &self.inner.config
    }
}

impl<P> Drop for AutosaveCoordinator<P> {
    fn drop(&mut self) {
        self.inner.lock().cancel_timers();
    }
}

impl<P> State<P> {
    /// Abort every timer, drop the stashed payload and retire the epoch
    fn cancel_timers(&mut self) {
        for timer in [
            self.debounce.take(),
            self.follow_up.take(),
            self.status_reset.take(),
        ]
        .into_iter()
        .flatten()
        {
            timer.abort();
        }
        self.debounce_seq += 1;
        self.epoch += 1;
        self.pending = None;
    }
}

impl<P> Inner<P> {
    fn lock(&self) -> MutexGuard<'_, State<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the save slot for `payload`, or stash it as pending
    ///
    /// The slot is busy while a save runs and while a follow-up save is
    /// waiting to start, so stashed payloads never overtake newer ones.
    fn claim(&self, state: &mut State<P>, payload: P) -> Option<(u64, P)> {
        if state.in_flight || state.follow_up.is_some() {
            tracing::debug!("autosave: save in flight, payload stashed");
            state.pending = Some(payload);
            return None;
        }

        state.in_flight = true;
        if let Some(timer) = state.status_reset.take() {
            timer.abort();
        }
        self.status.send_replace(SaveStatus::Saving);
        tracing::debug!("autosave: saving");
        Some((state.epoch, payload))
    }
}

impl<P: Send + 'static> Inner<P> {
    fn run(inner: Arc<Self>, epoch: u64, payload: P) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let result = inner.handler.save(payload).await;

            let mut state = inner.lock();
            state.in_flight = false;
            let observed = state.epoch == epoch;
            let failed = result.is_err();

            let revert_after = match result {
                Ok(()) => {
                    if observed {
                        inner.status.send_replace(SaveStatus::Saved);
                        tracing::debug!("autosave: saved");
                    }
                    inner.config.saved_display()
                }
                Err(e) => {
                    tracing::warn!(error = %e, "autosave: save failed");
                    if observed {
                        state.last_error = Some(e.to_string());
                        inner.status.send_replace(SaveStatus::Error);
                    }
                    inner.config.error_display()
                }
            };

            if state.pending.is_some() {
                if observed && failed {
                    Self::schedule_status_reset(&inner, &mut state, revert_after);
                }
                Self::schedule_follow_up(&inner, &mut state);
            } else if observed {
                Self::schedule_status_reset(&inner, &mut state, revert_after);
            }
        })
    }

    fn schedule_follow_up(inner: &Arc<Self>, state: &mut State<P>) {
        let epoch = state.epoch;
        let delay = inner.config.settle();
        let task_inner = Arc::clone(inner);

        tracing::debug!("autosave: saving stashed payload");
        state.follow_up = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let claimed = {
                let mut state = task_inner.lock();
                if state.epoch != epoch {
                    return;
                }
                state.follow_up = None;
                match state.pending.take() {
                    Some(next) => task_inner.claim(&mut state, next),
                    None => None,
                }
            };
            if let Some((epoch, payload)) = claimed {
                tokio::spawn(Self::run(task_inner, epoch, payload));
            }
        }));
    }

    fn schedule_status_reset(inner: &Arc<Self>, state: &mut State<P>, after: Duration) {
        if let Some(timer) = state.status_reset.take() {
            timer.abort();
        }

        let epoch = state.epoch;
        let task_inner = Arc::clone(inner);
        state.status_reset = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let mut state = task_inner.lock();
            let settled = matches!(
                *task_inner.status.borrow(),
                SaveStatus::Saved | SaveStatus::Error
            );
            if state.epoch == epoch && !state.in_flight && settled {
                state.status_reset = None;
                task_inner.status.send_replace(SaveStatus::Idle);
                tracing::trace!("autosave: idle");
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl SaveHandler<u32> for CountingHandler {
        async fn save(&self, _payload: u32) -> Result<(), SaveError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_initial_status_is_idle() {
        let coordinator = AutosaveCoordinator::new(
            CountingHandler(Arc::new(AtomicUsize::new(0))),
            AutosaveConfig::default(),
        );
        assert_eq!(coordinator.status(), SaveStatus::Idle);
        assert!(!coordinator.is_saving());
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_perform_save_directly() {
        let count = Arc::new(AtomicUsize::new(0));
        let coordinator =
            AutosaveCoordinator::new(CountingHandler(count.clone()), AutosaveConfig::default());

        coordinator.perform_save(1).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.status(), SaveStatus::Saved);

        tokio::time::sleep(coordinator.config().saved_display() + Duration::from_millis(1)).await;
        assert_eq!(coordinator.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SaveStatus::Saving).unwrap(), "\"saving\"");
    }
}
