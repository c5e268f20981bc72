//! Browser implementations of the storage and navigation seams.

use std::rc::Rc;

use leptos_router::{NavigateOptions, use_navigate};
use web_sys::Storage;

use timeportal_session::{KeyValueStorage, NavigationMode, Navigator, StorageError};

/// `window.location.origin`, e.g. `https://portal.example.com`.
pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|_| StorageError::Unavailable)?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| StorageError::Read(format!("{err:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }
}

/// Soft navigation through the Leptos router, hard navigation through
/// `window.location`.
#[derive(Clone)]
pub struct BrowserNavigator {
    soft: Rc<dyn Fn(&str)>,
}

impl BrowserNavigator {
    /// Must be called inside a `<Router>`.
    pub fn from_router() -> Self {
        let navigate = use_navigate();
        Self {
            soft: Rc::new(move |path: &str| {
                navigate(
                    path,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                )
            }),
        }
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str, mode: NavigationMode) {
        match mode {
            NavigationMode::Soft => (self.soft)(path),
            NavigationMode::Hard => {
                let Some(window) = web_sys::window() else {
                    tracing::warn!(path, "no window; cannot reload");
                    return;
                };
                if let Err(err) = window.location().set_href(path) {
                    tracing::warn!(path, ?err, "hard navigation failed");
                }
            }
        }
    }
}
