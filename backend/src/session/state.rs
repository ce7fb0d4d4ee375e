use crate::source::SheetSource;
use common::catalog::{territory_options, Catalog};
use common::filter::{update, FilterEvent, FilterState, TerritoryRequest};
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// One client's catalog and filter cascade.
///
/// Created by `POST /api/dashboard/sessions` and stored in [`SessionsState`]
/// under a random id. Every read or event refreshes `touched`; sessions left
/// idle longer than the configured TTL are dropped by [`start_session_sweeper`].
#[derive(Debug, Clone)]
pub struct Session {
    /// Catalog loaded when the session was opened. Shared, never mutated.
    pub catalog: Arc<Catalog>,
    /// Current selection, option lists and territory discovery status.
    pub filter: FilterState,
    /// Last time a client read or changed this session.
    pub(crate) touched: Instant,
}

impl Session {
    pub fn new(catalog: Catalog, filter: FilterState) -> Self {
        Self {
            catalog: Arc::new(catalog),
            filter,
            touched: Instant::now(),
        }
    }
}

/// A thread-safe, shareable table of all open filter sessions.
///
/// Created in `main.rs` and shared with the handlers as `web::Data`. Handlers
/// apply user events directly; territory discovery results arrive later
/// through `tx` and are applied by [`start_session_updater`].
#[derive(Clone)]
pub struct SessionsState {
    /// Session id to session.
    ///
    /// Read by `GET /api/dashboard/sessions/{id}`, written by the event route,
    /// the updater task and the sweeper.
    pub sessions: Arc<RwLock<HashMap<String, Session>>>,

    /// Sender half of the updater channel.
    ///
    /// Each discovery task spawned by [`SessionsState::apply`] clones it and
    /// pushes one [`SessionUpdate`] when its fetch settles, so the task never
    /// needs the session lock while the fetch is in flight.
    pub tx: mpsc::Sender<SessionUpdate>,
}

/// A filter event produced by a background task for one session.
///
/// Sent through `SessionsState.tx` and consumed by [`start_session_updater`].
#[derive(Debug)]
pub struct SessionUpdate {
    /// The session the event belongs to. It may have been evicted meanwhile.
    pub(crate) session_id: String,
    /// `TerritoriesLoaded` or `TerritoriesFailed`, tagged with its request id.
    pub(crate) event: FilterEvent,
}

impl SessionsState {
    pub fn new(tx: mpsc::Sender<SessionUpdate>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            tx,
        }
    }

    /// Registers a session and returns its id.
    pub async fn insert(&self, session: Session) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    /// A copy of the session, refreshing its idle timer.
    pub async fn session(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;
        session.touched = Instant::now();
        Some(session.clone())
    }

    pub async fn filter(&self, session_id: &str) -> Option<FilterState> {
        self.session(session_id).await.map(|s| s.filter)
    }

    /// Closes a session. Returns whether it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Drops every session idle for at least `ttl` and returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.touched.elapsed() < ttl);
        before - sessions.len()
    }

    /// Runs `event` through the reducer and starts the fetch it asks for.
    ///
    /// Returns the new filter state, or `None` for an unknown session.
    pub async fn apply(
        &self,
        session_id: &str,
        event: FilterEvent,
        source: &Arc<dyn SheetSource>,
    ) -> Option<FilterState> {
        let (filter, fetch) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(session_id)?;
            session.touched = Instant::now();
            let transition = update(&session.catalog, session.filter.clone(), event);
            session.filter = transition.state;
            (session.filter.clone(), transition.fetch)
        };

        if let Some(request) = fetch {
            spawn_discovery(self.tx.clone(), session_id.to_string(), request, Arc::clone(source));
        }
        Some(filter)
    }
}

/// Fetches the indicator sheet of `request` and reports its territories.
fn spawn_discovery(
    tx: mpsc::Sender<SessionUpdate>,
    session_id: String,
    request: TerritoryRequest,
    source: Arc<dyn SheetSource>,
) {
    tokio::spawn(async move {
        let TerritoryRequest { request, entry } = request;
        let event = match source.fetch_range(&entry.a1_range()).await {
            Ok(sheet) => FilterEvent::TerritoriesLoaded {
                request,
                territories: territory_options(&sheet, Some(&entry.territory_column)),
            },
            Err(e) => {
                warn!("territory discovery for {} failed: {}", entry.sheet_name, e);
                FilterEvent::TerritoriesFailed {
                    request,
                    message: e.to_string(),
                }
            }
        };
        if tx.send(SessionUpdate { session_id, event }).await.is_err() {
            warn!("session updater stopped, dropping territory response");
        }
    });
}

/// Applies background results to their sessions until every sender is gone.
pub async fn start_session_updater(
    state: SessionsState,
    source: Arc<dyn SheetSource>,
    mut rx: mpsc::Receiver<SessionUpdate>,
) {
    while let Some(pending) = rx.recv().await {
        if state.apply(&pending.session_id, pending.event, &source).await.is_none() {
            debug!("update for unknown session {}", pending.session_id);
        }
    }
}

/// Evicts idle sessions every `ttl / 4` (at least once a second) forever.
pub async fn start_session_sweeper(state: SessionsState, ttl: Duration) {
    let mut ticker = tokio::time::interval((ttl / 4).max(Duration::from_secs(1)));
    loop {
        ticker.tick().await;
        let evicted = state.evict_idle(ttl).await;
        if evicted > 0 {
            info!("evicted {} idle session(s)", evicted);
        }
    }
}
