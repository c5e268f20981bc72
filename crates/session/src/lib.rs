//! `timeportal-session`: client-side session lifecycle and access control.
//!
//! Data flows one way: [`CredentialStore`] → token validation →
//! [`AuthStore`] → {[`RouteGuard`], [`PermissionGate`], [`AuthFacade`]}.
//! `AuthStore` is the single writer; everything downstream reads.

pub mod config;
pub mod credential_store;
pub mod facade;
pub mod gate;
pub mod guard;
pub mod navigation;
pub mod state;
pub mod storage;

pub use config::{ConfigError, SessionConfig};
pub use credential_store::{CredentialStore, LoadOutcome};
pub use facade::{AuthFacade, Requirement};
pub use gate::{GateDecision, PermissionGate};
pub use guard::{GuardDecision, GuardedView, RouteGuard};
pub use navigation::{HistoryNavigator, NavigationMode, Navigator};
pub use state::{AuthHandle, AuthState, AuthStore, HydrationOutcome, LoginError, Subscription};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
