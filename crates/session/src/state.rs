//! The authentication state container.
//!
//! `AuthStore` is the only writer. Everything else reads through an
//! [`AuthHandle`], which has no write methods, and learns about changes by
//! subscribing. The container is `!Send`: the engine is single-threaded and
//! every write completes before any subscriber runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;

use timeportal_auth::{
    Credential, LoginRejected, LoginResponse, MalformedReason, Role, TokenStatus, UserRecord,
    token_status,
};
use timeportal_core::{Clock, SystemClock};

use crate::config::SessionConfig;
use crate::credential_store::{CredentialStore, LoadOutcome};
use crate::facade::AuthFacade;
use crate::guard::{GuardedView, RouteGuard};
use crate::navigation::{NavigationMode, Navigator};
use crate::storage::{KeyValueStorage, StorageError};

/// Snapshot of the session as seen by guards, gates and views.
///
/// # Invariants
/// - `is_authenticated` iff a token and user are present and the token was
///   valid when the state was written.
/// - While `is_loading`, no decision derived from this state may be acted on.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserRecord>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthState {
    /// Initial state, before persisted credentials have been read.
    pub fn loading() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            is_loading: false,
            ..Self::loading()
        }
    }

    pub fn authenticated(credential: Credential) -> Self {
        Self {
            user: Some(credential.user),
            token: Some(credential.token),
            is_authenticated: true,
            is_loading: false,
        }
    }

    /// Role of the authenticated user; `None` when signed out or loading.
    pub fn role(&self) -> Option<Role> {
        if !self.is_authenticated {
            return None;
        }
        self.user.as_ref().map(|user| user.role)
    }
}

impl core::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthState")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("is_authenticated", &self.is_authenticated)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

/// What hydration found in persistent storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationOutcome {
    Restored,
    Empty,
    Corrupt,
    Expired,
    Malformed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error(transparent)]
    Rejected(#[from] LoginRejected),

    #[error("token is malformed: {0}")]
    MalformedToken(MalformedReason),

    #[error("token has already expired")]
    ExpiredToken,

    #[error("could not persist credential: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Rc<dyn Fn(&AuthState)>;

struct Shared {
    state: AuthState,
    listeners: Vec<(Subscription, Listener)>,
    next_id: u64,
}

/// Read-only view of the container.
#[derive(Clone)]
pub struct AuthHandle {
    shared: Rc<RefCell<Shared>>,
}

impl AuthHandle {
    pub fn state(&self) -> AuthState {
        self.shared.borrow().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.borrow().state.is_loading
    }

    /// Register a listener called with the new state after every write.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) -> Subscription {
        let mut shared = self.shared.borrow_mut();
        let subscription = Subscription(shared.next_id);
        shared.next_id += 1;
        shared.listeners.push((subscription, Rc::new(listener)));
        subscription
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut shared = self.shared.borrow_mut();
        let before = shared.listeners.len();
        shared.listeners.retain(|(id, _)| *id != subscription);
        shared.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.borrow().listeners.len()
    }
}

impl core::fmt::Debug for AuthHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("AuthHandle")
            .field("state", &shared.state)
            .field("subscribers", &shared.listeners.len())
            .finish()
    }
}

pub struct AuthStore<S: KeyValueStorage> {
    shared: Rc<RefCell<Shared>>,
    credentials: CredentialStore<S>,
    navigator: Rc<dyn Navigator>,
    clock: Rc<dyn Clock>,
    config: SessionConfig,
    hydration: Cell<Option<HydrationOutcome>>,
}

impl<S: KeyValueStorage> AuthStore<S> {
    /// Create an empty, loading container. Call [`AuthStore::hydrate`] before
    /// trusting any decision.
    pub fn new(storage: S, navigator: impl Navigator + 'static, config: SessionConfig) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                state: AuthState::loading(),
                listeners: Vec::new(),
                next_id: 0,
            })),
            credentials: CredentialStore::new(storage, &config),
            navigator: Rc::new(navigator),
            clock: Rc::new(SystemClock),
            config,
            hydration: Cell::new(None),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    pub fn handle(&self) -> AuthHandle {
        AuthHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> AuthState {
        self.shared.borrow().state.clone()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn credential_store(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    pub fn facade(&self) -> AuthFacade {
        AuthFacade::new(self.handle(), Rc::clone(&self.navigator), self.config.clone())
    }

    /// Bind a route guard to this container for one navigation.
    pub fn guard(&self, guard: RouteGuard) -> GuardedView {
        GuardedView::new(
            self.handle(),
            Rc::clone(&self.navigator),
            guard,
            self.config.clone(),
        )
    }

    /// Read persisted credentials once and settle the loading window.
    ///
    /// Expired or malformed tokens are torn down silently: storage is cleared
    /// and the state starts empty. No navigation happens here; guards redirect
    /// once they observe the settled state. Later calls return the first
    /// outcome without touching storage.
    pub fn hydrate(&self) -> HydrationOutcome {
        if let Some(outcome) = self.hydration.get() {
            return outcome;
        }

        let (outcome, next) = match self.credentials.load() {
            LoadOutcome::Empty => (HydrationOutcome::Empty, AuthState::signed_out()),
            LoadOutcome::Corrupt => (HydrationOutcome::Corrupt, AuthState::signed_out()),
            LoadOutcome::Loaded(credential) => {
                match token_status(&credential.token, self.clock.now()) {
                    TokenStatus::Valid => (
                        HydrationOutcome::Restored,
                        AuthState::authenticated(credential),
                    ),
                    TokenStatus::Expired => {
                        tracing::warn!("persisted token has expired; tearing down session");
                        self.credentials.clear();
                        (HydrationOutcome::Expired, AuthState::signed_out())
                    }
                    TokenStatus::Malformed(reason) => {
                        tracing::warn!(%reason, "persisted token is malformed; tearing down session");
                        self.credentials.clear();
                        (HydrationOutcome::Malformed, AuthState::signed_out())
                    }
                }
            }
        };

        self.hydration.set(Some(outcome));
        tracing::info!(?outcome, role = ?next.role(), "session hydrated");
        self.replace_state(next);
        outcome
    }

    /// Install a fresh credential.
    ///
    /// The token must be well-formed and unexpired; nothing is persisted or
    /// changed otherwise.
    pub fn login(&self, credential: Credential) -> Result<(), LoginError> {
        match token_status(&credential.token, self.clock.now()) {
            TokenStatus::Valid => {}
            TokenStatus::Expired => return Err(LoginError::ExpiredToken),
            TokenStatus::Malformed(reason) => return Err(LoginError::MalformedToken(reason)),
        }

        self.credentials.save(&credential)?;
        tracing::info!(user_id = %credential.user.id, role = %credential.user.role, "logged in");
        self.replace_state(AuthState::authenticated(credential));
        Ok(())
    }

    pub fn login_with_response(&self, response: LoginResponse) -> Result<(), LoginError> {
        let credential = Credential::from_login_response(response)?;
        self.login(credential)
    }

    /// Tear the session down and force a full reload of the login view.
    pub fn logout(&self) {
        self.credentials.clear();
        self.replace_state(AuthState::signed_out());
        tracing::info!("logged out");
        self.navigator
            .navigate(&self.config.login_path, NavigationMode::Hard);
    }

    /// Re-check the current token against the clock, logging out if it is no
    /// longer valid. Returns `None` when there is no session.
    ///
    /// Never scheduled by the engine itself; hosts decide when to call it.
    pub fn revalidate(&self) -> Option<TokenStatus> {
        let token = self.shared.borrow().state.token.clone()?;
        let status = token_status(&token, self.clock.now());
        if !status.permits_use() {
            tracing::warn!(?status, "session token no longer valid; logging out");
            self.logout();
        }
        Some(status)
    }

    fn replace_state(&self, next: AuthState) {
        let listeners: Vec<Listener> = {
            let mut shared = self.shared.borrow_mut();
            shared.state = next.clone();
            shared
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener(&next);
        }
    }
}
