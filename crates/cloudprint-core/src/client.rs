// ── Client lifecycle ──
//
// The connected-account hub: authentication, the concurrent initial loads,
// readiness gating, and the notification channel. Cheaply cloneable via an
// inner Arc; background work is tied to an explicit close().

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use cloudprint_api::{CloudClient, Credentials, Printer, PrinterSource, Session, User};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::registry::{self, PrinterRegistry};

const NOTIFY_CHANNEL_SIZE: usize = 64;

/// Out-of-band notifications for observers.
///
/// These never replace `Result`s: every operation reports its own failure
/// to its caller, and the channel only carries narration plus errors from
/// background work that has no awaiting caller.
#[derive(Debug, Clone)]
pub enum Notification {
    /// Diagnostic narration of the session lifecycle.
    Debug(String),
    /// The client holds a session and both initial loads completed.
    Ready,
    /// A background resync failed; cached data is retained.
    Error(String),
}

/// A CloudPrint account client.
///
/// Construct with a [`ClientConfig`], then [`connect`](Self::connect).
/// With username/password credentials, connecting logs in, loads the user
/// profile and the printer registry concurrently, and flips readiness once
/// both complete. Readiness is monotonic: later refresh failures never
/// clear it, and the registry keeps serving its last good data.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    api: Arc<CloudClient>,
    registry: Arc<PrinterRegistry>,
    user: ArcSwapOption<User>,
    ready: watch::Sender<bool>,
    notify_tx: broadcast::Sender<Notification>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Client {
    /// Create a new client. Does NOT connect -- call
    /// [`connect()`](Self::connect) to authenticate and start background
    /// work. Fails with [`CoreError::Config`] when the config carries
    /// neither a username/password pair nor a token.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        config.credentials()?;

        let api = Arc::new(CloudClient::new(&config.transport())?);
        let registry = Arc::new(PrinterRegistry::new(Arc::clone(&api), config.live));
        let (ready, _) = watch::channel(false);
        let (notify_tx, _) = broadcast::channel(NOTIFY_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                api,
                registry,
                user: ArcSwapOption::empty(),
                ready,
                notify_tx,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The raw API client underneath.
    pub fn api(&self) -> &Arc<CloudClient> {
        &self.inner.api
    }

    /// The printer registry.
    pub fn registry(&self) -> &Arc<PrinterRegistry> {
        &self.inner.registry
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Authenticate and bring the client up.
    ///
    /// With username/password credentials: logs in, then loads the user
    /// profile and the printer registry concurrently; when both resolve,
    /// readiness flips true and [`Notification::Ready`] is broadcast. Any
    /// failure is returned to the caller and readiness stays false.
    ///
    /// With a token: the cookie is installed without validation and
    /// `connect` returns immediately. No initial loads run and readiness
    /// stays false -- the caller drives [`load_user`](Self::load_user) and
    /// [`refresh`](Self::refresh) explicitly. This asymmetry is inherited
    /// from the upstream API contract.
    ///
    /// Either way the resync task is started (when `config.live` is set);
    /// it idles until the registry has something to resync.
    pub async fn connect(&self) -> Result<(), CoreError> {
        match self.inner.config.credentials()? {
            Credentials::Password { username, password } => {
                self.notify(Notification::Debug(
                    "logging in with username and password".into(),
                ));

                let session = self.inner.api.login(&username, &password).await?;
                debug!(issued_at = %session.issued_at, "session established");

                // Profile and registry load together; readiness needs both.
                let (user, printers) = tokio::try_join!(
                    self.load_user(),
                    self.refresh(PrinterSource::Static)
                )?;

                self.inner.ready.send_replace(true);
                info!(
                    user = user.full_name.as_deref().unwrap_or("<unknown>"),
                    printers = printers.len(),
                    "client ready"
                );
                self.notify(Notification::Ready);
            }
            Credentials::Token(token) => {
                self.inner.api.set_token(&token);
                self.notify(Notification::Debug("added token to cookie".into()));
            }
        }

        self.spawn_resync().await;
        Ok(())
    }

    /// Tear down background work.
    ///
    /// Cancels the resync task and waits for it to finish. In-flight
    /// requests are abandoned, not interrupted. The session itself has no
    /// server-side logout to call.
    pub async fn close(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("client closed");
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the user profile and fold it into the cached record.
    ///
    /// Only fields present in the response are overwritten; repeated loads
    /// against partial responses accumulate rather than reset.
    pub async fn load_user(&self) -> Result<Arc<User>, CoreError> {
        let patch = self.inner.api.fetch_user().await?;

        let mut user = self
            .inner
            .user
            .load_full()
            .map(|u| (*u).clone())
            .unwrap_or_default();
        user.apply(patch);

        let user = Arc::new(user);
        self.inner.user.store(Some(Arc::clone(&user)));
        debug!(
            user = user.full_name.as_deref().unwrap_or("<unknown>"),
            "user loaded"
        );
        Ok(user)
    }

    /// Refresh the printer registry from the selected source.
    pub async fn refresh(
        &self,
        source: PrinterSource,
    ) -> Result<Arc<Vec<Arc<Printer>>>, CoreError> {
        self.inner.registry.refresh(source).await
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The cached user profile, once loaded.
    pub fn user(&self) -> Option<Arc<User>> {
        self.inner.user.load_full()
    }

    /// The established session, if any.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.inner.api.session()
    }

    /// Snapshot of all known printers.
    pub fn printers(&self) -> Arc<Vec<Arc<Printer>>> {
        self.inner.registry.snapshot()
    }

    /// Look up a printer by id (see [`PrinterRegistry::get`]).
    pub fn printer(&self, id: &str) -> Result<Arc<Printer>, CoreError> {
        self.inner.registry.get(id)
    }

    /// Whether the client has completed its initial loads.
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.borrow()
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to readiness changes. The transition is monotonic
    /// false→true.
    pub fn readiness(&self) -> watch::Receiver<bool> {
        self.inner.ready.subscribe()
    }

    /// Subscribe to the notification stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.notify_tx.subscribe()
    }

    /// Subscribe to printer snapshot changes.
    pub fn subscribe_printers(&self) -> watch::Receiver<Arc<Vec<Arc<Printer>>>> {
        self.inner.registry.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn notify(&self, notification: Notification) {
        let _ = self.inner.notify_tx.send(notification);
    }

    /// Start the resync task, once, when live mode is configured.
    async fn spawn_resync(&self) {
        if !self.inner.config.live {
            return;
        }

        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            return;
        }

        handles.push(tokio::spawn(registry::resync_task(
            Arc::clone(&self.inner.registry),
            self.inner.config.resync_interval,
            self.inner.notify_tx.clone(),
            self.inner.cancel.clone(),
        )));
    }
}
