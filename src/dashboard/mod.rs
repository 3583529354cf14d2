mod state;
mod view;

use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::TokenSource;
use crate::router::Navigator;
use crate::types::token::Token;

pub use self::state::{LoadOutcome, LoadState};
pub use self::view::{View, TITLE};

/// The dashboard page. Mounting it loads the session identity token once;
/// any failure sends the user to the login route.
pub struct Dashboard {
    source: Arc<dyn TokenSource>,
    navigator: Arc<dyn Navigator>,
    login_route: String,

    state: Arc<Mutex<LoadState>>,
    task: Option<LoadTask>,
}

/// The in-flight load, bound to the current mount.
struct LoadTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<LoadOutcome>>,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn TokenSource>,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            source,
            navigator,
            login_route: login_route.into(),
            state: Arc::new(Mutex::new(LoadState::Idle)),
            task: None,
        }
    }

    /// Start loading the token. Does nothing if already mounted.
    ///
    /// Must be called within a tokio runtime.
    pub fn mount(&mut self) {
        if self.task.is_some() {
            debug!("Dashboard already mounted, skip loading token");
            return;
        }

        *self.state.lock().unwrap() = LoadState::Loading;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(load_token(
            Arc::clone(&self.source),
            Arc::clone(&self.navigator),
            self.login_route.clone(),
            Arc::clone(&self.state),
            cancel.clone(),
        ));

        self.task = Some(LoadTask {
            cancel,
            handle: Some(handle),
        });
    }

    pub fn render(&self) -> View {
        View
    }

    pub fn state(&self) -> LoadState {
        self.state.lock().unwrap().clone()
    }

    pub fn token(&self) -> Option<Token> {
        self.state.lock().unwrap().token().cloned()
    }

    pub fn is_mounted(&self) -> bool {
        self.task.is_some()
    }

    /// Wait for the current load to finish. Returns `None` when not mounted
    /// or when the outcome was already collected.
    pub async fn settled(&mut self) -> Option<LoadOutcome> {
        let handle = self.task.as_mut()?.handle.take()?;
        join_load(handle).await
    }

    /// Cancel any in-flight load and drop the token. A later [`Dashboard::mount`]
    /// starts a fresh load.
    pub async fn unmount(&mut self) -> Option<LoadOutcome> {
        let task = self.task.take()?;
        task.cancel.cancel();

        let outcome = match task.handle {
            Some(handle) => join_load(handle).await,
            None => None,
        };

        *self.state.lock().unwrap() = LoadState::Idle;
        outcome
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(task) = self.task.as_ref() {
            task.cancel.cancel();
        }
    }
}

async fn join_load(handle: JoinHandle<LoadOutcome>) -> Option<LoadOutcome> {
    match handle.await {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            error!("Token load task failed: {err}");
            None
        }
    }
}

async fn load_token(
    source: Arc<dyn TokenSource>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    state: Arc<Mutex<LoadState>>,
    cancel: CancellationToken,
) -> LoadOutcome {
    let result = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("Token load cancelled before response");
            return LoadOutcome::Cancelled;
        }
        result = source.fetch_token() => result,
    };

    // Checked under the state lock: once unmounted, no write and no navigation.
    let failure = {
        let mut state = state.lock().unwrap();
        if cancel.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        match result {
            Ok(resp) => {
                let token = resp.token();
                if token.is_none() {
                    warn!("Token response has no id_token");
                }
                *state = LoadState::Loaded(token);
                None
            }
            Err(err) => {
                *state = LoadState::Failed;
                Some(err)
            }
        }
    };

    match failure {
        None => {
            info!("Token loaded");
            LoadOutcome::Loaded
        }
        Some(err) => {
            error!("Error fetching token: {err}");
            navigator.navigate(&login_route);
            LoadOutcome::Redirected
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::client::{FetchFailure, TokenFetchError};
    use crate::router::History;
    use crate::types::token::TokenResponse;

    use super::*;

    enum Reply {
        Token(&'static str),
        Empty,
        Status(u16),
        Malformed,
    }

    /// Token source answering with a fixed reply once `gate` is opened.
    struct FakeSource {
        reply: Reply,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl FakeSource {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                gate: None,
            })
        }

        fn gated(reply: Reply, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenSource for FakeSource {
        async fn fetch_token(&self) -> Result<TokenResponse, TokenFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gate.as_ref() {
                gate.notified().await;
            }
            match self.reply {
                Reply::Token(token) => Ok(TokenResponse {
                    id_token: Some(token.to_string()),
                    access_token: None,
                }),
                Reply::Empty => Ok(TokenResponse::default()),
                Reply::Status(code) => Err(FetchFailure::Status(code).into()),
                Reply::Malformed => {
                    let err = serde_json::from_str::<TokenResponse>("not json").unwrap_err();
                    Err(FetchFailure::Parse(err).into())
                }
            }
        }
    }

    fn new_dashboard(source: Arc<FakeSource>) -> (Dashboard, History) {
        let history = History::new("/dashboard");
        let dashboard = Dashboard::new(source, Arc::new(history.clone()), "/login");
        (dashboard, history)
    }

    #[tokio::test]
    async fn test_load_token() {
        let source = FakeSource::new(Reply::Token("abc123"));
        let (mut dashboard, history) = new_dashboard(Arc::clone(&source));
        assert_eq!(dashboard.state(), LoadState::Idle);

        dashboard.mount();
        assert_eq!(dashboard.settled().await, Some(LoadOutcome::Loaded));
        assert_eq!(dashboard.token(), Some(Token::new("abc123")));
        assert!(dashboard.state().is_settled());
        assert_eq!(history.entries(), vec!["/dashboard"]);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_redirect_on_status() {
        let source = FakeSource::new(Reply::Status(401));
        let (mut dashboard, history) = new_dashboard(source);

        dashboard.mount();
        assert_eq!(dashboard.settled().await, Some(LoadOutcome::Redirected));
        assert_eq!(dashboard.state(), LoadState::Failed);
        assert_eq!(dashboard.token(), None);
        assert_eq!(history.location(), "/login");
    }

    #[tokio::test]
    async fn test_redirect_on_malformed() {
        let source = FakeSource::new(Reply::Malformed);
        let (mut dashboard, history) = new_dashboard(source);

        dashboard.mount();
        assert_eq!(dashboard.settled().await, Some(LoadOutcome::Redirected));
        assert_eq!(history.location(), "/login");
    }

    #[tokio::test]
    async fn test_render_independent_of_state() {
        let gate = Arc::new(Notify::new());
        let source = FakeSource::gated(Reply::Status(500), Arc::clone(&gate));
        let (mut dashboard, _history) = new_dashboard(source);

        assert!(dashboard.render().to_string().contains(TITLE));
        dashboard.mount();
        assert!(dashboard.render().to_string().contains(TITLE));

        gate.notify_one();
        dashboard.settled().await;
        assert_eq!(dashboard.state(), LoadState::Failed);
        assert!(dashboard.render().to_string().contains(TITLE));
    }

    #[tokio::test]
    async fn test_fetch_once_per_mount() {
        let source = FakeSource::new(Reply::Token("abc123"));
        let (mut dashboard, _history) = new_dashboard(Arc::clone(&source));

        dashboard.mount();
        dashboard.mount();
        for _ in 0..5 {
            dashboard.render();
        }
        dashboard.settled().await;
        dashboard.mount();
        assert_eq!(dashboard.settled().await, None);
        assert_eq!(source.calls(), 1);

        // A remount is a new mount.
        assert_eq!(dashboard.unmount().await, None);
        assert_eq!(dashboard.token(), None);
        dashboard.mount();
        assert_eq!(dashboard.settled().await, Some(LoadOutcome::Loaded));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_unmount_cancels_load() {
        let gate = Arc::new(Notify::new());
        let source = FakeSource::gated(Reply::Status(401), Arc::clone(&gate));
        let (mut dashboard, history) = new_dashboard(Arc::clone(&source));

        dashboard.mount();
        assert_eq!(dashboard.state(), LoadState::Loading);
        tokio::task::yield_now().await;

        assert_eq!(dashboard.unmount().await, Some(LoadOutcome::Cancelled));
        assert!(!dashboard.is_mounted());
        assert_eq!(dashboard.state(), LoadState::Idle);

        gate.notify_one();
        tokio::task::yield_now().await;
        assert_eq!(history.entries(), vec!["/dashboard"]);
    }

    #[tokio::test]
    async fn test_load_without_token() {
        let source = FakeSource::new(Reply::Empty);
        let (mut dashboard, history) = new_dashboard(source);

        dashboard.mount();
        assert_eq!(dashboard.settled().await, Some(LoadOutcome::Loaded));
        assert_eq!(dashboard.state(), LoadState::Loaded(None));
        assert_eq!(dashboard.token(), None);
        assert_eq!(history.entries(), vec!["/dashboard"]);
    }

    struct PanicNavigator;

    impl Navigator for PanicNavigator {
        fn navigate(&self, route: &str) {
            panic!("cannot navigate to {route}");
        }
    }

    #[tokio::test]
    async fn test_state_usable_after_navigator_panic() {
        let source = FakeSource::new(Reply::Status(401));
        let mut dashboard = Dashboard::new(source, Arc::new(PanicNavigator), "/login");

        dashboard.mount();
        assert_eq!(dashboard.settled().await, None);
        assert_eq!(dashboard.state(), LoadState::Failed);
        assert_eq!(dashboard.token(), None);

        assert_eq!(dashboard.unmount().await, None);
        assert_eq!(dashboard.state(), LoadState::Idle);
    }
}
