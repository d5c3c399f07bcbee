// ── Printer registry ──
//
// In-memory map of the account's printers, keyed by printer id, kept
// reasonably current by a periodic resync task. Lookups are lock-free;
// refreshes serialize on an async mutex so a timer tick never piles a
// second request onto a slow in-flight one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use cloudprint_api::{CloudClient, Printer, PrinterSource};

use crate::client::Notification;
use crate::error::CoreError;

/// Registry of the account's printers.
///
/// A refresh fetches one of the printers-info listings and upserts every
/// returned record by id -- full replace, never a field merge. A failed
/// refresh leaves the previous map untouched, so callers always see the
/// last good data (stale-but-available).
pub struct PrinterRegistry {
    api: Arc<CloudClient>,

    /// Primary storage: printer id -> record.
    printers: DashMap<String, Arc<Printer>>,

    /// Full snapshot, rebuilt on mutation for cheap observation.
    snapshot: watch::Sender<Arc<Vec<Arc<Printer>>>>,

    /// When the last successful refresh completed.
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,

    /// Whether the periodic resync is enabled.
    live: AtomicBool,

    /// Held for the duration of a refresh; a resync tick that cannot take
    /// it is skipped rather than queued.
    refreshing: Mutex<()>,
}

impl PrinterRegistry {
    pub(crate) fn new(api: Arc<CloudClient>, live: bool) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (last_refresh, _) = watch::channel(None);

        Self {
            api,
            printers: DashMap::new(),
            snapshot,
            last_refresh,
            live: AtomicBool::new(live),
            refreshing: Mutex::new(()),
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch the printer list from the selected source and upsert every
    /// returned record. Returns the post-refresh snapshot.
    pub async fn refresh(
        &self,
        source: PrinterSource,
    ) -> Result<Arc<Vec<Arc<Printer>>>, CoreError> {
        let _guard = self.refreshing.lock().await;
        self.refresh_locked(source).await
    }

    /// The refresh body, assuming the caller holds `refreshing`.
    async fn refresh_locked(
        &self,
        source: PrinterSource,
    ) -> Result<Arc<Vec<Arc<Printer>>>, CoreError> {
        let list = self.api.list_printers(source).await?;
        debug!(count = list.len(), ?source, "printers fetched");

        for printer in list {
            self.upsert(printer);
        }
        self.last_refresh.send_replace(Some(Utc::now()));

        Ok(self.snapshot())
    }

    /// Insert or replace the record for a printer id. Returns `true` if
    /// the id was new.
    fn upsert(&self, printer: Printer) -> bool {
        let is_new = !self.printers.contains_key(&printer.id);
        self.printers
            .insert(printer.id.clone(), Arc::new(printer));
        self.rebuild_snapshot();
        is_new
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Look up a printer by id.
    ///
    /// An empty registry (no load has completed yet) fails with
    /// [`CoreError::PrintersNotLoaded`]; a populated registry without the
    /// id fails with [`CoreError::PrinterNotFound`].
    pub fn get(&self, id: &str) -> Result<Arc<Printer>, CoreError> {
        if self.printers.is_empty() {
            return Err(CoreError::PrintersNotLoaded);
        }
        self.printers
            .get(id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| CoreError::PrinterNotFound { id: id.to_owned() })
    }

    /// The current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<Printer>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Printer>>>> {
        self.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }

    // ── Resync control ───────────────────────────────────────────────

    /// Whether the periodic resync is enabled.
    pub fn live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    /// Enable or disable the periodic resync without tearing down the
    /// timer task.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Relaxed);
    }

    /// When the last successful refresh completed, or `None` if never.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last successful refresh was.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// One timer tick. No-op while resync is disabled or nothing has been
    /// loaded; skipped outright when a refresh is already in flight.
    async fn resync(&self, notify: &broadcast::Sender<Notification>) {
        if !self.live() || self.printers.is_empty() {
            return;
        }

        let Ok(_guard) = self.refreshing.try_lock() else {
            debug!("skipping resync tick: refresh already in flight");
            return;
        };

        debug!("resyncing printers");
        // Resync always polls the static source, whatever the registry was
        // first loaded from.
        match self.refresh_locked(PrinterSource::Static).await {
            Ok(_) => {
                let _ = notify.send(Notification::Debug("resynced printers".into()));
            }
            Err(e) => {
                warn!(error = %e, "printer resync failed");
                let _ = notify.send(Notification::Error(e.to_string()));
            }
        }
    }

    /// Collect all values into a snapshot vec and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<Printer>> =
            self.printers.iter().map(|r| Arc::clone(r.value())).collect();
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

// ── Background task ──────────────────────────────────────────────────

/// Periodically resync the registry until cancelled.
pub(crate) async fn resync_task(
    registry: Arc<PrinterRegistry>,
    period: Duration,
    notify: broadcast::Sender<Notification>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    // A tick delayed past its successor is dropped, not replayed in a burst.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => registry.resync(&notify).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cloudprint_api::{PrinterStatus, TransportConfig};

    fn registry() -> PrinterRegistry {
        let api = Arc::new(CloudClient::new(&TransportConfig::default()).unwrap());
        PrinterRegistry::new(api, true)
    }

    fn printer(id: &str, name: &str) -> Printer {
        Printer {
            id: id.to_owned(),
            name: Some(name.to_owned()),
            printer_type: None,
            image_url: None,
            owned_by: None,
            status: PrinterStatus::default(),
        }
    }

    #[test]
    fn get_on_empty_registry_is_not_loaded() {
        let reg = registry();
        assert!(matches!(reg.get("p1"), Err(CoreError::PrintersNotLoaded)));
    }

    #[test]
    fn get_on_populated_registry() {
        let reg = registry();
        reg.upsert(printer("p1", "Replicator"));

        assert_eq!(reg.get("p1").unwrap().name.as_deref(), Some("Replicator"));
        assert!(matches!(
            reg.get("missing"),
            Err(CoreError::PrinterNotFound { .. })
        ));
    }

    #[test]
    fn upsert_replaces_whole_record() {
        let reg = registry();
        assert!(reg.upsert(printer("p1", "old name")));
        assert!(!reg.upsert(printer("p1", "new name")));

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("p1").unwrap().name.as_deref(), Some("new name"));
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let reg = registry();
        assert!(reg.snapshot().is_empty());

        reg.upsert(printer("p1", "a"));
        reg.upsert(printer("p2", "b"));

        assert_eq!(reg.snapshot().len(), 2);
    }

    #[test]
    fn live_flag_toggles() {
        let reg = registry();
        assert!(reg.live());
        reg.set_live(false);
        assert!(!reg.live());
    }
}
