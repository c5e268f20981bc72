//! Auth-aware components.
//!
//! [`AuthProvider`] owns the only [`AuthStore`] and mirrors its state into a
//! signal; everything else reads that signal through [`use_auth`].

use std::rc::Rc;

use leptos::*;
use leptos_router::{NavigateOptions, use_navigate};

use timeportal_auth::{LoginResponse, Permission, Role, role_badge, role_description};
use timeportal_session::{
    AuthFacade, AuthState, AuthStore, GateDecision, GuardDecision, LoginError, RouteGuard,
};

use crate::browser::{BrowserNavigator, LocalStorage};
use crate::config::WebConfig;
use crate::frontend::api;
use crate::login::LoginRequest;

/// Shared auth state, provided by [`AuthProvider`].
#[derive(Clone)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    store: Rc<AuthStore<LocalStorage>>,
    config: WebConfig,
}

impl AuthContext {
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    pub fn facade(&self) -> AuthFacade {
        self.store.facade()
    }

    pub fn login(&self, response: LoginResponse) -> Result<(), LoginError> {
        self.store.login_with_response(response)
    }

    pub fn logout(&self) {
        self.store.logout();
    }
}

/// Panics outside an [`AuthProvider`].
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Must sit inside a `<Router>`.
#[component]
pub fn AuthProvider(config: WebConfig, children: Children) -> impl IntoView {
    let store = Rc::new(AuthStore::new(
        LocalStorage,
        BrowserNavigator::from_router(),
        config.session.clone(),
    ));

    let (state, set_state) = create_signal(store.state());
    let handle = store.handle();
    let subscription = handle.subscribe(move |next| set_state.set(next.clone()));
    on_cleanup(move || {
        handle.unsubscribe(subscription);
    });

    // Hydrate after the first render so guards see the loading window.
    let hydrating = Rc::clone(&store);
    spawn_local(async move {
        let outcome = hydrating.hydrate();
        tracing::debug!(?outcome, "session hydrated");
    });

    provide_context(AuthContext {
        state,
        store,
        config,
    });

    children()
}

/// Renders `children` only when the session satisfies the requirements.
///
/// While hydration is running a neutral placeholder is shown and no
/// redirect happens.
#[component]
pub fn ProtectedRoute(
    #[prop(optional)] required_roles: Option<Vec<Role>>,
    #[prop(optional)] required_permissions: Option<Vec<Permission>>,
    #[prop(optional, into)] fallback: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_auth();

    let mut guard = RouteGuard::new();
    if let Some(roles) = required_roles {
        guard = guard.require_roles(roles);
    }
    if let Some(permissions) = required_permissions {
        guard = guard.require_permissions(permissions);
    }
    if let Some(path) = fallback {
        guard = guard.with_fallback(path);
    }

    let config = auth.config().session.clone();
    let state = auth.state;
    let decision = create_memo(move |_| guard.evaluate(&state.get(), &config));

    let navigate = use_navigate();
    create_effect(move |_| {
        if let GuardDecision::Redirect(path) = decision.get() {
            navigate(
                &path,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    move || match decision.get() {
        GuardDecision::Render => children().into_view(),
        GuardDecision::Pending | GuardDecision::Redirect(_) => {
            view! { <div class="route-pending"></div> }.into_view()
        }
    }
}

/// Shows `children` when the current role holds the listed permissions,
/// otherwise `fallback`. Renders nothing while loading.
#[component]
pub fn PermissionGate(
    #[prop(optional)] permissions: Vec<Permission>,
    #[prop(optional)] require_all: bool,
    #[prop(optional, into)] fallback: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let state = use_auth().state;
    let gate = timeportal_session::PermissionGate::new()
        .permissions(permissions)
        .require_all(require_all);
    let decision = create_memo(move |_| gate.evaluate(&state.get()));

    move || match decision.get() {
        GateDecision::Children => children().into_view(),
        GateDecision::Fallback => fallback.run(),
        GateDecision::Nothing => ().into_view(),
    }
}

#[component]
pub fn RoleBadge(role: Role) -> impl IntoView {
    let badge = role_badge(role);
    view! {
        <span class=badge.class title=role_description(role)>
            {badge.label}
        </span>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let submitting = create_rw_signal(false);

    // Already signed in: go straight to the landing view.
    {
        let state = auth.state;
        let home = auth.config().session.default_authenticated_path.clone();
        let navigate = use_navigate();
        create_effect(move |_| {
            if state.get().is_authenticated {
                navigate(&home, Default::default());
            }
        });
    }

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let request = match LoginRequest::new(&email.get_untracked(), &password.get_untracked()) {
            Ok(request) => request,
            Err(err) => {
                error.set(Some(err.to_string()));
                return;
            }
        };

        error.set(None);
        submitting.set(true);

        let auth = auth.clone();
        spawn_local(async move {
            let result = match api::login(auth.config(), &request).await {
                Ok(response) => auth.login(response).map_err(|err| err.to_string()),
                Err(err) => Err(format!("{err:#}")),
            };

            // On success the signed-in effect above moves to the landing view.
            if let Err(message) = result {
                tracing::warn!(%message, "login failed");
                error.set(Some(message));
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="login">
            <h1>"Sign in"</h1>
            <form on:submit=submit>
                <input
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                <button type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
