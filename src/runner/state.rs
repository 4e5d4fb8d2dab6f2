//! Shared run state: counters, records and flags.
//!
//! One [`RunState`] is shared by every probe task of a run. Counters are
//! atomics, records and flags sit behind mutexes, and the in-flight count
//! lives in a watch channel so the aggregator can await quiescence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{error, warn};

use crate::probe::{CompatibilityFlags, ProbeRecord};

/// Final counter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub success: usize,
    pub failed: usize,
    pub undefined_alias: usize,
}

/// State shared by all probes of one run.
#[derive(Debug)]
pub struct RunState {
    success: AtomicUsize,
    failed: AtomicUsize,
    undefined_alias: AtomicUsize,
    active: watch::Sender<usize>,
    records: Mutex<Vec<(usize, ProbeRecord)>>,
    flags: Mutex<CompatibilityFlags>,
}

impl Default for RunState {
    fn default() -> Self {
        let (active, _) = watch::channel(0);
        Self {
            success: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            undefined_alias: AtomicUsize::new(0),
            active,
            records: Mutex::new(Vec::new()),
            flags: Mutex::new(CompatibilityFlags::new()),
        }
    }
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_undefined_alias(&self) {
        self.undefined_alias.fetch_add(1, Ordering::SeqCst);
    }

    /// Snapshot of the counters.
    pub fn counts(&self) -> Counts {
        Counts {
            success: self.success.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            undefined_alias: self.undefined_alias.load(Ordering::SeqCst),
        }
    }

    /// Number of probes launched but not yet finished.
    pub fn active(&self) -> usize {
        *self.active.borrow()
    }

    /// Declare a flag for a capability.
    pub fn declare_flag(&self, name: &str) {
        self.flags.lock().declare(name);
    }

    /// Set flags staged by a passing probe.
    pub fn commit_flags<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = self.flags.lock();
        for name in names {
            flags.set(name.as_ref());
        }
    }

    pub fn flags(&self) -> CompatibilityFlags {
        self.flags.lock().clone()
    }

    /// Store a probe's record under its launch position.
    pub fn push_record(&self, position: usize, record: ProbeRecord) {
        self.records.lock().push((position, record));
    }

    /// Records in launch order.
    pub fn records(&self) -> Vec<ProbeRecord> {
        let mut records = self.records.lock().clone();
        records.sort_by_key(|(position, _)| *position);
        records.into_iter().map(|(_, record)| record).collect()
    }

    /// Wait until no probe is in flight.
    pub async fn quiescent(&self) {
        let mut rx = self.active.subscribe();
        if rx.wait_for(|active| *active == 0).await.is_err() {
            warn!("active probe channel closed before quiescence");
        }
    }
}

/// Holds one unit of the active probe count; releases it on drop.
///
/// Created at launch and moved into the probe task, so the count drops
/// exactly once per probe even if the task unwinds.
#[derive(Debug)]
pub struct ActiveGuard {
    state: Arc<RunState>,
}

impl ActiveGuard {
    pub fn acquire(state: Arc<RunState>) -> Self {
        state.active.send_modify(|active| *active += 1);
        Self { state }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.state.active.send_modify(|active| match active.checked_sub(1) {
            Some(n) => *active = n,
            None => error!("active probe count released below zero"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeOutcome;

    fn record(name: &str) -> ProbeRecord {
        ProbeRecord {
            name: name.to_string(),
            outcome: ProbeOutcome::Unimplemented,
            missing_aliases: vec![],
        }
    }

    #[test]
    fn counters_start_at_zero() {
        let state = RunState::new();
        assert_eq!(state.counts(), Counts::default());
        assert_eq!(state.active(), 0);
    }

    #[test]
    fn guard_tracks_active_count() {
        let state = Arc::new(RunState::new());
        let a = ActiveGuard::acquire(state.clone());
        let b = ActiveGuard::acquire(state.clone());
        assert_eq!(state.active(), 2);
        drop(a);
        assert_eq!(state.active(), 1);
        drop(b);
        assert_eq!(state.active(), 0);
    }

    #[test]
    fn records_come_back_in_launch_order() {
        let state = RunState::new();
        state.push_record(2, record("c"));
        state.push_record(0, record("a"));
        state.push_record(1, record("b"));
        let names: Vec<_> = state.records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn committed_flags_override_declarations() {
        let state = RunState::new();
        state.declare_flag("fs");
        state.declare_flag("net");
        state.commit_flags(["fs"]);
        let flags = state.flags();
        assert!(flags.get("fs"));
        assert!(!flags.get("net"));
    }

    #[tokio::test]
    async fn quiescent_returns_immediately_when_idle() {
        let state = RunState::new();
        state.quiescent().await;
    }

    #[tokio::test]
    async fn quiescent_waits_for_last_guard() {
        let state = Arc::new(RunState::new());
        let guard = ActiveGuard::acquire(state.clone());
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            drop(guard);
        });
        state.quiescent().await;
        assert_eq!(state.active(), 0);
        handle.await.unwrap();
    }
}
