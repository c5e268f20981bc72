//! Full-view enforcement.
//!
//! A guard's decision moves `Pending → {Redirect(login), Redirect(home), Render}`
//! and is never acted on while the state is still loading.

use std::cell::RefCell;
use std::rc::Rc;

use timeportal_auth::{Permission, Role, authorize_any, authorize_role};

use crate::config::SessionConfig;
use crate::navigation::{NavigationMode, Navigator};
use crate::state::{AuthHandle, AuthState, Subscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Hydration has not finished; show a neutral placeholder.
    Pending,
    Redirect(String),
    Render,
}

/// Requirements for a protected view.
///
/// An allow-list that is given but empty admits nobody; the same holds for
/// a permission list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    required_roles: Option<Vec<Role>>,
    required_permissions: Option<Vec<Permission>>,
    fallback: Option<String>,
}

impl RouteGuard {
    /// A guard that only requires authentication.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_role(mut self, role: Role) -> Self {
        self.required_roles.get_or_insert_with(Vec::new).push(role);
        self
    }

    pub fn require_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles
            .get_or_insert_with(Vec::new)
            .extend(roles);
        self
    }

    /// Passing several permissions means any one of them suffices.
    pub fn require_permission(mut self, permission: Permission) -> Self {
        self.required_permissions
            .get_or_insert_with(Vec::new)
            .push(permission);
        self
    }

    pub fn require_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.required_permissions
            .get_or_insert_with(Vec::new)
            .extend(permissions);
        self
    }

    /// Redirect target for authenticated visitors who fail a role or
    /// permission check. Defaults to the configured landing view.
    pub fn with_fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback = Some(path.into());
        self
    }

    pub fn evaluate(&self, state: &AuthState, config: &SessionConfig) -> GuardDecision {
        if state.is_loading {
            return GuardDecision::Pending;
        }

        let Some(role) = state.role() else {
            return GuardDecision::Redirect(config.login_path.clone());
        };

        let denied = self
            .required_roles
            .as_deref()
            .map(|allowed| authorize_role(role, allowed))
            .transpose()
            .and_then(|_| {
                self.required_permissions
                    .as_deref()
                    .map(|required| authorize_any(role, required))
                    .transpose()
            });

        match denied {
            Ok(_) => GuardDecision::Render,
            Err(err) => {
                tracing::debug!(%err, "route guard denied access");
                GuardDecision::Redirect(
                    self.fallback
                        .clone()
                        .unwrap_or_else(|| config.default_authenticated_path.clone()),
                )
            }
        }
    }
}

struct GuardRun {
    guard: RouteGuard,
    config: SessionConfig,
    navigator: Rc<dyn Navigator>,
    decision: GuardDecision,
    redirected: bool,
}

impl GuardRun {
    fn observe(&mut self, state: &AuthState) {
        // A redirect ends this navigation; the view is gone.
        if self.redirected {
            return;
        }
        let decision = self.guard.evaluate(state, &self.config);
        if let GuardDecision::Redirect(path) = &decision {
            self.navigator.navigate(path, NavigationMode::Soft);
            self.redirected = true;
        }
        self.decision = decision;
    }
}

/// A route guard bound to the live session for one navigation.
///
/// Evaluates immediately and again after every state write. A redirect is
/// issued at most once; [`GuardedView::reset`] starts a new navigation.
pub struct GuardedView {
    handle: AuthHandle,
    run: Rc<RefCell<GuardRun>>,
    subscription: Subscription,
}

impl GuardedView {
    pub fn new(
        handle: AuthHandle,
        navigator: Rc<dyn Navigator>,
        guard: RouteGuard,
        config: SessionConfig,
    ) -> Self {
        let run = Rc::new(RefCell::new(GuardRun {
            guard,
            config,
            navigator,
            decision: GuardDecision::Pending,
            redirected: false,
        }));
        run.borrow_mut().observe(&handle.state());

        let listener = Rc::clone(&run);
        let subscription = handle.subscribe(move |state| listener.borrow_mut().observe(state));

        Self {
            handle,
            run,
            subscription,
        }
    }

    pub fn decision(&self) -> GuardDecision {
        self.run.borrow().decision.clone()
    }

    pub fn should_render(&self) -> bool {
        self.decision() == GuardDecision::Render
    }

    pub fn reset(&self) {
        let state = self.handle.state();
        let mut run = self.run.borrow_mut();
        run.redirected = false;
        run.decision = GuardDecision::Pending;
        run.observe(&state);
    }
}

impl Drop for GuardedView {
    fn drop(&mut self) {
        self.handle.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeportal_auth::{Credential, UserRecord};

    fn signed_in(role: Role) -> AuthState {
        AuthState::authenticated(Credential::new(
            "h.p.s",
            UserRecord {
                id: "1".to_string(),
                name: "Lee".to_string(),
                email: "lee@example.com".to_string(),
                role,
            },
        ))
    }

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    #[test]
    fn pending_while_loading() {
        let guard = RouteGuard::new().require_role(Role::Admin);
        assert_eq!(
            guard.evaluate(&AuthState::loading(), &config()),
            GuardDecision::Pending
        );
    }

    #[test]
    fn unauthenticated_goes_to_login() {
        assert_eq!(
            RouteGuard::new().evaluate(&AuthState::signed_out(), &config()),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn authenticated_without_requirements_renders() {
        assert_eq!(
            RouteGuard::new().evaluate(&signed_in(Role::User), &config()),
            GuardDecision::Render
        );
    }

    #[test]
    fn dispatcher_blocked_from_admin_view() {
        let guard = RouteGuard::new().require_roles([Role::Admin]);
        assert_eq!(
            guard.evaluate(&signed_in(Role::Dispatcher), &config()),
            GuardDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(
            guard.evaluate(&signed_in(Role::Admin), &config()),
            GuardDecision::Render
        );
    }

    #[test]
    fn permissions_use_any_semantics() {
        let guard = RouteGuard::new()
            .require_permissions([Permission::DELETE_USERS, Permission::VIEW_ALL_USERS]);
        assert_eq!(
            guard.evaluate(&signed_in(Role::Dispatcher), &config()),
            GuardDecision::Render
        );
        assert_eq!(
            guard.evaluate(&signed_in(Role::User), &config()),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn role_and_permission_must_both_pass() {
        let guard = RouteGuard::new()
            .require_roles([Role::User, Role::Dispatcher])
            .require_permission(Permission::MANAGE_USERS);
        assert_eq!(
            guard.evaluate(&signed_in(Role::Dispatcher), &config()),
            GuardDecision::Render
        );
        assert!(matches!(
            guard.evaluate(&signed_in(Role::User), &config()),
            GuardDecision::Redirect(_)
        ));
        assert!(matches!(
            guard.evaluate(&signed_in(Role::Admin), &config()),
            GuardDecision::Redirect(_)
        ));
    }

    #[test]
    fn empty_allow_list_admits_nobody() {
        let guard = RouteGuard::new().require_roles([]);
        assert!(matches!(
            guard.evaluate(&signed_in(Role::Admin), &config()),
            GuardDecision::Redirect(_)
        ));
    }

    #[test]
    fn fallback_overrides_landing_view() {
        let guard = RouteGuard::new()
            .require_role(Role::Admin)
            .with_fallback("/forbidden");
        assert_eq!(
            guard.evaluate(&signed_in(Role::User), &config()),
            GuardDecision::Redirect("/forbidden".to_string())
        );
        // Unauthenticated visitors still go to login.
        assert_eq!(
            guard.evaluate(&AuthState::signed_out(), &config()),
            GuardDecision::Redirect("/login".to_string())
        );
    }
}
