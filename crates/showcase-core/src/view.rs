//! Presentation binding for the portfolio list.
//!
//! [`screen_for`] is the pure mapping from (fetch, cache, connectivity,
//! banner dismissal) to what the user sees before anything has been shown.
//! [`PortfolioView`] owns the
//! lifecycle: it starts the fetch on mount, republishes the [`Screen`] on
//! every input change, writes successful results to the cache, and discards
//! results that arrive after it has been dropped.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::cache::ProjectCache;
use crate::connectivity::{ReachabilitySignal, Subscription};
use crate::domain::{FetchError, Project};
use crate::fetcher::{FetchState, ProjectSource};
use crate::metrics::METRICS;
use crate::obs::{emit_fetch_discarded, emit_view_resolved, view_span};
use crate::resolution::{resolve, ResolvedView, Source};

pub const LOADING_TEXT: &str = "Loading…";
pub const BANNER_MESSAGE: &str = "Showing cached/fallback data.";
pub const RETRY_LABEL: &str = "Retry";

/// Warning shown above degraded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub message: &'static str,
    pub retry_label: &'static str,
}

impl Default for Banner {
    fn default() -> Self {
        Banner {
            message: BANNER_MESSAGE,
            retry_label: RETRY_LABEL,
        }
    }
}

/// What the portfolio page currently displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Screen {
    /// Online, nothing resolved yet this session and no cache to show.
    Loading,
    Ready { view: ResolvedView },
    /// `banner` is `None` once the user dismissed it.
    Degraded {
        view: ResolvedView,
        banner: Option<Banner>,
    },
}

impl Screen {
    pub fn view(&self) -> Option<&ResolvedView> {
        match self {
            Screen::Loading => None,
            Screen::Ready { view } | Screen::Degraded { view, .. } => Some(view),
        }
    }

    pub fn banner(&self) -> Option<&Banner> {
        match self {
            Screen::Degraded { banner, .. } => banner.as_ref(),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Screen::Loading)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Screen::Degraded { .. })
    }
}

/// Map the current inputs to a screen for a view that has not shown a list
/// yet.
///
/// An unsettled fetch with no cache loads only while online. Offline, the
/// fallback set is already degraded and is shown with the banner.
pub fn screen_for(
    fetch: &FetchState,
    cached: Option<&[Project]>,
    online: bool,
    banner_dismissed: bool,
) -> Screen {
    let view = resolve(fetch, cached, online);
    if !fetch.is_settled() && cached.is_none() && !view.degraded {
        return Screen::Loading;
    }
    present(view, banner_dismissed)
}

/// Keep the list shown when the previous fetch settled while a retry runs.
fn retained_screen(last: &ResolvedView, online: bool, banner_dismissed: bool) -> Screen {
    let view = ResolvedView {
        degraded: last.source != Source::Network && (last.degraded || !online),
        ..last.clone()
    };
    present(view, banner_dismissed)
}

fn present(view: ResolvedView, banner_dismissed: bool) -> Screen {
    if view.degraded {
        Screen::Degraded {
            view,
            banner: (!banner_dismissed).then(Banner::default),
        }
    } else {
        Screen::Ready { view }
    }
}

// ============================================================================
// PortfolioView
// ============================================================================

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// A mounted portfolio page.
///
/// Dropping the view tears it down: in-flight fetches keep running but their
/// results are discarded, and the connectivity listener is detached.
pub struct PortfolioView {
    shared: Arc<Shared>,
    _connectivity: Subscription,
}

struct Shared {
    span: tracing::Span,
    source: Arc<dyn ProjectSource>,
    cache: ProjectCache,
    cached: OnceLock<Option<Vec<Project>>>,
    connectivity: Arc<dyn ReachabilitySignal>,
    state: Mutex<ViewState>,
    screen_tx: watch::Sender<Screen>,
    fetch_tx: watch::Sender<FetchState>,
    pending_writes: Mutex<Vec<JoinHandle<()>>>,
    torn_down: AtomicBool,
}

#[derive(Default)]
struct ViewState {
    fetch: FetchState,
    banner_dismissed: bool,
    /// A list has been on screen at least once.
    has_resolved: bool,
    /// List on screen when the last fetch settled.
    last_settled: Option<ResolvedView>,
}

impl ViewState {
    /// Once a list has been shown it never gives way to `Loading`.
    fn screen(&self, cached: Option<&[Project]>, online: bool) -> Screen {
        if !self.fetch.is_settled() {
            if let Some(last) = &self.last_settled {
                return retained_screen(last, online, self.banner_dismissed);
            }
            if self.has_resolved {
                return present(resolve(&self.fetch, cached, online), self.banner_dismissed);
            }
        }
        screen_for(&self.fetch, cached, online, self.banner_dismissed)
    }

    fn record(&mut self, screen: &Screen) {
        if let Some(view) = screen.view() {
            self.has_resolved = true;
            if self.fetch.is_settled() {
                self.last_settled = Some(view.clone());
            }
        }
    }
}

impl PortfolioView {
    /// Mount the view and start the initial fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(
        source: Arc<dyn ProjectSource>,
        cache: ProjectCache,
        connectivity: Arc<dyn ReachabilitySignal>,
    ) -> Self {
        let view_id = NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed);
        let (screen_tx, _) = watch::channel(Screen::Loading);
        let (fetch_tx, _) = watch::channel(FetchState::Idle);

        let shared = Arc::new(Shared {
            span: view_span(view_id),
            source,
            cache,
            cached: OnceLock::new(),
            connectivity: connectivity.clone(),
            state: Mutex::new(ViewState::default()),
            screen_tx,
            fetch_tx,
            pending_writes: Mutex::new(Vec::new()),
            torn_down: AtomicBool::new(false),
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let subscription = connectivity.on_change(Arc::new(move |online| {
            if let Some(shared) = weak.upgrade() {
                shared.on_connectivity(online);
            }
        }));

        Shared::start_fetch(&shared);

        PortfolioView {
            shared,
            _connectivity: subscription,
        }
    }

    /// Re-run the fetch from scratch.
    ///
    /// Returns `false` (and does nothing) when the current fetch already
    /// succeeded.
    pub fn retry(&self) -> bool {
        if matches!(self.shared.lock_state().fetch, FetchState::Succeeded(_)) {
            return false;
        }
        Shared::start_fetch(&self.shared);
        true
    }

    /// Hide the banner until the next degraded transition.
    pub fn dismiss_banner(&self) {
        let mut state = self.shared.lock_state();
        state.banner_dismissed = true;
        self.shared.publish(&mut state);
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.shared.screen_tx.borrow().clone()
    }

    /// Receive every screen change.
    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.shared.screen_tx.subscribe()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.shared.lock_state().fetch.clone()
    }

    /// Resolved list, unless still loading.
    pub fn resolved(&self) -> Option<ResolvedView> {
        self.screen().view().cloned()
    }

    /// Cache snapshot this view resolved against (read once, at mount).
    pub fn cached_snapshot(&self) -> Option<Vec<Project>> {
        self.shared.cached().map(<[Project]>::to_vec)
    }

    /// Wait until the current fetch has resolved and return its state.
    pub async fn settled(&self) -> FetchState {
        let mut rx = self.shared.fetch_tx.subscribe();
        let settled = rx.wait_for(FetchState::is_settled).await.map(|state| state.clone());
        settled.unwrap_or_else(|_| self.fetch_state())
    }

    /// Wait for cache writes issued so far. The render path never needs this.
    pub async fn flush_cache_writes(&self) {
        let handles: Vec<JoinHandle<()>> =
            std::mem::take(&mut *self.shared.lock_pending_writes());
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "cache write task did not complete");
            }
        }
    }
}

impl Drop for PortfolioView {
    fn drop(&mut self) {
        self.shared.torn_down.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for PortfolioView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioView")
            .field("screen", &self.screen())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pending_writes(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self) -> Option<&[Project]> {
        self.cached
            .get_or_init(|| self.span.in_scope(|| self.cache.read()))
            .as_deref()
    }

    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    fn start_fetch(this: &Arc<Self>) {
        {
            let mut state = this.lock_state();
            state.fetch = FetchState::Pending;
            this.fetch_tx.send_replace(FetchState::Pending);
            this.publish(&mut state);
        }

        let source = this.source.clone();
        let weak = Arc::downgrade(this);
        let span = this.span.clone();
        tokio::spawn(
            async move {
                let result = source.fetch().await;
                match weak.upgrade().filter(|shared| !shared.is_torn_down()) {
                    Some(shared) => shared.finish_fetch(result),
                    None => {
                        METRICS.inc_fetches_discarded();
                        emit_fetch_discarded(result.is_ok());
                    }
                }
            }
            .instrument(span),
        );
    }

    fn finish_fetch(&self, result: Result<Vec<Project>, FetchError>) {
        let mut state = self.lock_state();
        match result {
            Ok(projects) => {
                METRICS.inc_fetches_succeeded();
                state.fetch = FetchState::Succeeded(projects.clone());
                self.fetch_tx.send_replace(state.fetch.clone());
                self.publish(&mut state);
                drop(state);

                let handle = self.cache.write_in_background(projects);
                self.lock_pending_writes().push(handle);
            }
            Err(err) => {
                METRICS.inc_fetches_failed();
                state.fetch = FetchState::Failed(err);
                state.banner_dismissed = false;
                self.fetch_tx.send_replace(state.fetch.clone());
                self.publish(&mut state);
            }
        }
    }

    fn on_connectivity(&self, online: bool) {
        if self.is_torn_down() {
            return;
        }
        let mut state = self.lock_state();
        if !online {
            state.banner_dismissed = false;
        }
        self.publish(&mut state);
    }

    /// Recompute and broadcast the screen. Called with the state lock held so
    /// publications are ordered.
    fn publish(&self, state: &mut ViewState) {
        let online = self.connectivity.snapshot();
        let screen = state.screen(self.cached(), online);
        state.record(&screen);

        if let Some(view) = screen.view() {
            self.span.in_scope(|| {
                emit_view_resolved(view.source.as_str(), view.degraded, view.len());
            });
        }
        if screen.is_degraded() {
            METRICS.inc_degraded_renders();
        }
        self.screen_tx.send_replace(screen);
    }
}
