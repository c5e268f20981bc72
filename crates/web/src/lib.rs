//! `timeportal-web`
//!
//! **Responsibility:** browser bindings for the session engine.
//!
//! This crate provides:
//! - `localStorage`-backed credential storage and router-backed navigation
//! - Leptos components: auth provider, protected route, permission gate,
//!   role badge and the login page
//!
//! Everything browser-specific is compiled for `wasm32` only; configuration
//! and request types are shared with native builds.

pub mod config;
pub mod login;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use config::{EndpointError, PortalRoutes, WebConfig};
pub use login::{LoginRequest, LoginRequestError};
