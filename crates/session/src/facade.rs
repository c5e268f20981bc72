//! Imperative access checks for views that are not wrapped in a guard.

use std::rc::Rc;

use timeportal_auth::{Permission, Role, UserRecord, has_any};

use crate::config::SessionConfig;
use crate::navigation::{NavigationMode, Navigator};
use crate::state::{AuthHandle, AuthState};

/// Result of a `require_*` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// State is still loading; nothing was decided and nothing navigated.
    Pending,
    Satisfied,
    Redirected(String),
}

impl Requirement {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Requirement::Satisfied)
    }
}

/// Read-and-request surface over the session.
///
/// Exposes the current state and applies route-guard logic on demand: an
/// unmet requirement against settled state navigates to the redirect target.
#[derive(Clone)]
pub struct AuthFacade {
    handle: AuthHandle,
    navigator: Rc<dyn Navigator>,
    config: SessionConfig,
}

impl AuthFacade {
    pub fn new(handle: AuthHandle, navigator: Rc<dyn Navigator>, config: SessionConfig) -> Self {
        Self {
            handle,
            navigator,
            config,
        }
    }

    pub fn state(&self) -> AuthState {
        self.handle.state()
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.handle.state().user
    }

    pub fn token(&self) -> Option<String> {
        self.handle.state().token
    }

    pub fn role(&self) -> Option<Role> {
        self.handle.state().role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.handle.state().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.handle.is_loading()
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|role| roles.contains(&role))
    }

    pub fn has_permission(&self, permissions: &[Permission]) -> bool {
        self.role().is_some_and(|role| has_any(role, permissions))
    }

    /// Default redirect: the login view.
    pub fn require_auth(&self, redirect_to: Option<&str>) -> Requirement {
        self.require(
            |state| state.is_authenticated,
            redirect_to.unwrap_or(&self.config.login_path),
        )
    }

    /// Default redirect: the login view when signed out, otherwise the
    /// landing view.
    pub fn require_role(&self, roles: &[Role], redirect_to: Option<&str>) -> Requirement {
        let target = self.denied_target(redirect_to);
        self.require(
            |state| state.role().is_some_and(|role| roles.contains(&role)),
            &target,
        )
    }

    /// Any one of `permissions` suffices. Redirects like [`Self::require_role`].
    pub fn require_permission(
        &self,
        permissions: &[Permission],
        redirect_to: Option<&str>,
    ) -> Requirement {
        let target = self.denied_target(redirect_to);
        self.require(
            |state| state.role().is_some_and(|role| has_any(role, permissions)),
            &target,
        )
    }

    fn denied_target(&self, redirect_to: Option<&str>) -> String {
        match redirect_to {
            Some(path) => path.to_string(),
            None if self.is_authenticated() => self.config.default_authenticated_path.clone(),
            None => self.config.login_path.clone(),
        }
    }

    fn require(&self, met: impl FnOnce(&AuthState) -> bool, redirect_to: &str) -> Requirement {
        let state = self.handle.state();
        if state.is_loading {
            return Requirement::Pending;
        }
        if met(&state) {
            return Requirement::Satisfied;
        }
        tracing::debug!(redirect_to, "requirement not met; redirecting");
        self.navigator.navigate(redirect_to, NavigationMode::Soft);
        Requirement::Redirected(redirect_to.to_string())
    }
}
