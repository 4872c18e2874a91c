// ── Console abstraction ──
//
// Full lifecycle management for one operator session: the auth gate,
// the realtime relay, device polling, and every resource operation.
// Each operation reports its outcome through the notification channel.

mod content;
mod devices;

use std::future::Future;
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use innkeep_api::{ApiClient, ConnectionStatus, RealtimeConfig, RealtimeHandle};
use secrecy::SecretString;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{Entity, EntityId, User};
use crate::notify::{Notification, Notifier};
use crate::relay::{self, RelayEffect};
use crate::session::{AuthState, Session, SessionStore};
use crate::store::{DataStore, EntityCollection, OperationId};

pub use content::Move;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Holds the explicit session
/// (an `ApiClient` carrying the bearer token), the central store, and the
/// single realtime connection.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    sessions: Arc<dyn SessionStore>,
    client: ArcSwap<ApiClient>,
    user: ArcSwapOption<User>,
    store: Arc<DataStore>,
    notifier: Notifier,
    cancel: CancellationToken,
    /// Cancelled on disconnect, replaced on reconnect.
    cancel_child: Mutex<CancellationToken>,
    relay: Mutex<Option<Arc<RealtimeHandle>>>,
    joined_property: Mutex<Option<EntityId>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Console {
    /// Build a console. Does NOT touch the network: call
    /// [`authenticate()`](Self::authenticate) or [`connect()`](Self::connect).
    pub fn new(config: ConsoleConfig, sessions: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.api_url.clone(), &config.transport())?;
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();
        let joined = config.property.clone();

        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                sessions,
                client: ArcSwap::from_pointee(client),
                user: ArcSwapOption::empty(),
                store: Arc::new(DataStore::new()),
                notifier: Notifier::new(),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                relay: Mutex::new(None),
                joined_property: Mutex::new(joined),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    /// The current API client. Swapped on login / logout.
    pub fn client(&self) -> Arc<ApiClient> {
        self.inner.client.load_full()
    }

    pub fn user(&self) -> Option<Arc<User>> {
        self.inner.user.load_full()
    }

    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifier.subscribe()
    }

    /// Property scope for list fetches.
    pub fn property(&self) -> Option<&EntityId> {
        self.inner.config.property.as_ref()
    }

    // ── Auth gate ────────────────────────────────────────────────────

    /// Validate the stored session against `/api/auth/verify`.
    ///
    /// No stored token yields `LoginRequired` without a request. A token the
    /// backend rejects is cleared from the session store. Network failures
    /// are errors, not a logout.
    pub async fn authenticate(&self) -> Result<AuthState, CoreError> {
        let Some(session) = self.inner.sessions.load()? else {
            debug!("no stored session");
            return Ok(AuthState::LoginRequired);
        };

        let client = self.client().with_token(session.token.clone());
        match client.verify().await {
            Ok(user) => {
                self.inner.client.store(Arc::new(client));
                self.inner.user.store(Some(Arc::new(user.clone())));
                self.inner
                    .sessions
                    .save(&Session::new(session.token, Some(user.clone())))?;
                info!(user = ?user.email, "session verified");
                Ok(AuthState::Authenticated(user))
            }
            Err(e) if e.is_auth_expired() => {
                warn!("stored session rejected, clearing it");
                self.drop_session();
                Ok(AuthState::LoginRequired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Exchange credentials for a token and persist the session.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        let result: Result<User, CoreError> = async {
            let data = self.client().login(email, password).await?;
            let token = SecretString::from(data.token);
            self.inner
                .sessions
                .save(&Session::new(token.clone(), Some(data.user.clone())))?;
            self.inner
                .client
                .store(Arc::new(self.client().with_token(token)));
            self.inner.user.store(Some(Arc::new(data.user.clone())));
            Ok(data.user)
        }
        .await;

        self.finish(result, |user: &User| {
            format!(
                "Logged in as {}",
                user.name
                    .as_deref()
                    .or(user.email.as_deref())
                    .unwrap_or("unknown user")
            )
        })
    }

    /// Best-effort server logout, then forget the session locally.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if let Err(e) = self.client().logout().await {
            warn!(error = %e, "logout request failed (non-fatal)");
        }
        self.disconnect().await;
        self.inner.sessions.clear()?;
        self.inner
            .client
            .store(Arc::new(self.client().without_token()));
        self.inner.user.store(None);
        self.inner.notifier.info("Logged out");
        Ok(())
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Verify the session, then start the realtime relay and device
    /// polling as configured.
    pub async fn connect(&self) -> Result<User, CoreError> {
        let AuthState::Authenticated(user) = self.authenticate().await? else {
            return Err(CoreError::LoginRequired);
        };

        let cancel = self.inner.cancel_child.lock().await.clone();
        let mut handles = Vec::new();

        if self.inner.config.realtime_enabled {
            self.spawn_relay(&cancel, &mut handles).await?;
        }

        let interval = self.inner.config.device_poll_interval;
        if !interval.is_zero() {
            handles.push(tokio::spawn(device_poll_task(
                self.clone(),
                interval,
                cancel.clone(),
            )));
        }

        self.inner.task_handles.lock().await.extend(handles);
        info!("console connected");
        Ok(user)
    }

    async fn spawn_relay(
        &self,
        cancel: &CancellationToken,
        handles: &mut Vec<JoinHandle<()>>,
    ) -> Result<(), CoreError> {
        let mut config = RealtimeConfig::new(self.inner.config.realtime_url().clone());
        config.reconnect = self.inner.config.reconnect.clone();
        if let Some(token) = self.client().token() {
            config = config.with_token(token.clone());
        }

        let handle = Arc::new(RealtimeHandle::connect(config, cancel.child_token())?);

        // Join the configured room once the socket is up; the relay
        // re-joins it by itself after a reconnect.
        if let Some(property) = self.inner.joined_property.lock().await.clone() {
            let join_handle = Arc::clone(&handle);
            let join_cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                let mut status = join_handle.status();
                tokio::select! {
                    biased;
                    () = join_cancel.cancelled() => {}
                    ready = status.wait_for(|s| s.connected) => {
                        if ready.is_ok() {
                            join_handle.join_property(&property.to_string());
                        }
                    }
                }
            }));
        }

        handles.push(tokio::spawn(relay_bridge_task(
            self.clone(),
            handle.subscribe(),
            cancel.clone(),
        )));

        *self.inner.relay.lock().await = Some(handle);
        info!("realtime relay spawned (handshake in progress)");
        Ok(())
    }

    /// Tear down background tasks and the relay. Safe to call repeatedly;
    /// the socket close is sent at most once, and only if it was open.
    pub async fn disconnect(&self) {
        if let Some(handle) = self.inner.relay.lock().await.take() {
            handle.disconnect();
        }

        {
            let mut child = self.inner.cancel_child.lock().await;
            child.cancel();
            *child = self.inner.cancel.child_token();
        }

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("disconnected");
    }

    /// One-shot: authenticate, run closure, disconnect.
    ///
    /// For the CLI: no relay and no polling, since one request/response
    /// cycle is all a command needs.
    pub async fn oneshot<F, Fut, T>(
        config: ConsoleConfig,
        sessions: Arc<dyn SessionStore>,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Console) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.realtime_enabled = false;
        cfg.device_poll_interval = std::time::Duration::ZERO;

        let console = Console::new(cfg, sessions)?;
        console.connect().await?;
        let result = f(console.clone()).await;
        console.disconnect().await;
        result
    }

    // ── Realtime state ───────────────────────────────────────────────

    /// Relay state for a status banner. `None` when no relay is running.
    pub async fn relay_status(&self) -> Option<ConnectionStatus> {
        self.inner
            .relay
            .lock()
            .await
            .as_ref()
            .map(|h| h.status().borrow().clone())
    }

    pub async fn is_connected(&self) -> bool {
        self.relay_status().await.is_some_and(|s| s.connected)
    }

    pub async fn connection_error(&self) -> Option<String> {
        self.relay_status().await.and_then(|s| s.error)
    }

    /// Scope realtime events to a property. Fire-and-forget; `false` when
    /// nothing was sent (no open relay or empty id).
    pub async fn join_property(&self, property_id: &EntityId) -> bool {
        let sent = match self.inner.relay.lock().await.as_ref() {
            Some(handle) => handle.join_property(&property_id.to_string()),
            None => false,
        };
        if sent {
            *self.inner.joined_property.lock().await = Some(property_id.clone());
        }
        sent
    }

    pub async fn leave_property(&self, property_id: &EntityId) -> bool {
        let sent = match self.inner.relay.lock().await.as_ref() {
            Some(handle) => handle.leave_property(&property_id.to_string()),
            None => false,
        };
        let mut joined = self.inner.joined_property.lock().await;
        if sent && joined.as_ref() == Some(property_id) {
            *joined = None;
        }
        sent
    }

    // ── Outcome reporting ────────────────────────────────────────────

    /// Emit exactly one notification for a finished operation.
    fn finish<R>(
        &self,
        result: Result<R, CoreError>,
        success: impl FnOnce(&R) -> String,
    ) -> Result<R, CoreError> {
        match result {
            Ok(value) => {
                self.inner.notifier.success(success(&value));
                Ok(value)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Reads stay quiet on success and report failures once.
    fn read<R>(&self, result: Result<R, CoreError>) -> Result<R, CoreError> {
        result.map_err(|err| self.fail(err))
    }

    fn fail(&self, err: CoreError) -> CoreError {
        if err.is_login_required() {
            self.drop_session();
        }
        self.inner.notifier.error(err.user_message());
        err
    }

    fn drop_session(&self) {
        if let Err(e) = self.inner.sessions.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
        self.inner
            .client
            .store(Arc::new(self.client().without_token()));
        self.inner.user.store(None);
    }

    /// Store an optimistic operation's outcome: commit with the server
    /// echo, or roll back exactly what it touched.
    fn settle<T: Entity, R>(
        collection: &EntityCollection<T>,
        op: OperationId,
        result: Result<R, innkeep_api::Error>,
        echo: impl FnOnce(&R) -> Option<T>,
    ) -> Result<R, CoreError> {
        match result {
            Ok(value) => {
                collection.commit(op, echo(&value));
                Ok(value)
            }
            Err(err) => {
                collection.rollback(op);
                Err(err.into())
            }
        }
    }

    // ── Relay effects ────────────────────────────────────────────────

    async fn run_effect(&self, effect: RelayEffect) -> Result<(), CoreError> {
        match effect {
            RelayEffect::Nothing => Ok(()),
            RelayEffect::RefetchGuests(property) => {
                let scope = match property {
                    Some(p) => Some(p),
                    None => self.inner.joined_property.lock().await.clone(),
                };
                self.fetch_guests(scope.as_ref()).await.map(|_| ())
            }
            RelayEffect::RefetchDevice(id) => self.fetch_device(&id).await.map(|_| ()),
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Poll the device list on a fixed period.
async fn device_poll_task(
    console: Console,
    interval: std::time::Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let scope = console.property().cloned();
                if let Err(e) = console.fetch_devices(scope.as_ref()).await {
                    warn!(error = %e, "device poll failed");
                }
            }
        }
    }
}

/// Relay events -> store invalidation, notifications, targeted refetch.
async fn relay_bridge_task(
    console: Console,
    mut events: broadcast::Receiver<Arc<innkeep_api::RealtimeEvent>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = events.recv() => {
                match result {
                    Ok(event) => {
                        let effect = relay::apply(&console.inner.store, &event);
                        if let Some((level, message)) = relay::describe(&event) {
                            console.inner.notifier.send(level, message);
                        }
                        if let Err(e) = console.run_effect(effect).await {
                            warn!(error = %e, event = event.name(), "refetch after event failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "relay bridge: receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}
