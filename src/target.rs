//! Decode targets: caller-owned slots that response bodies are decoded into.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;

/// Type-erased sink for a JSON response body.
pub(crate) trait Decode: Send + Sync {
    fn decode(&self, body: &[u8]) -> serde_json::Result<()>;
}

/// A shared slot that a successful response is decoded into.
///
/// Cloning a `Target` yields another handle to the same slot, so the caller
/// keeps one handle and passes another to
/// [`Resource::decode_into`](crate::Resource::decode_into).
///
/// ```
/// use restnode::Target;
///
/// #[derive(Debug, Default, Clone, serde::Deserialize)]
/// struct User {
///     login: String,
/// }
///
/// let user = Target::<User>::new();
/// assert_eq!(user.get().login, "");
/// ```
pub struct Target<T> {
    slot: Arc<Mutex<T>>,
}

impl<T: Default> Target<T> {
    /// A target holding `T::default()` until a response is decoded into it.
    pub fn new() -> Self {
        Self::with_value(T::default())
    }

    /// Move the current value out, leaving `T::default()` behind.
    pub fn take(&self) -> T {
        std::mem::take(&mut *self.lock())
    }
}

impl<T> Target<T> {
    pub fn with_value(value: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(value)),
        }
    }

    /// Run `f` with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Overwrite the current value.
    pub fn set(&self, value: T) {
        *self.lock() = value;
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        // A panic elsewhere cannot leave a half-written value: decoding
        // finishes before the slot is touched.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Target<T> {
    /// A clone of the current value.
    pub fn get(&self) -> T {
        self.lock().clone()
    }
}

impl<T: DeserializeOwned + Send + 'static> Target<T> {
    pub(crate) fn sink(&self) -> Arc<dyn Decode> {
        self.slot.clone()
    }
}

impl<T> Clone for Target<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Default> Default for Target<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Target").field(&*self.lock()).finish()
    }
}

impl<T: DeserializeOwned + Send> Decode for Mutex<T> {
    fn decode(&self, body: &[u8]) -> serde_json::Result<()> {
        let value: T = serde_json::from_slice(body)?;
        *self.lock().unwrap_or_else(PoisonError::into_inner) = value;
        Ok(())
    }
}
