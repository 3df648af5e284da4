//! Move-only ownership of raw native resources.
//!
//! Windowing and graphics libraries hand out raw handles (pointers, GL
//! object names) that require an explicit release call. [`Handle`] pairs
//! one such value with its destroy function and guarantees the release
//! runs exactly once, at the earliest of explicit replacement or scope
//! exit. A null handle carries no destroy function at all, so the default
//! state is safe to drop and to move-assign over.

use thiserror::Error;

/// Raw resource values that have a designated "null" sentinel.
pub trait RawHandle: Copy {
    /// The sentinel value representing "no resource".
    const NULL: Self;

    /// Whether this value is the null sentinel.
    fn is_null(self) -> bool;
}

impl<T> RawHandle for *mut T {
    const NULL: Self = std::ptr::null_mut();

    fn is_null(self) -> bool {
        self == Self::NULL
    }
}

/// GL object names: zero is never a valid name.
impl RawHandle for u32 {
    const NULL: Self = 0;

    fn is_null(self) -> bool {
        self == 0
    }
}

/// Error raised when a native create call returns a null handle.
#[derive(Error, Debug)]
#[error("failed to create {what}{}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
pub struct ResourceCreationError {
    what: String,
    detail: Option<String>,
}

impl ResourceCreationError {
    /// A creation error for the named resource kind.
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            detail: None,
        }
    }

    /// Attach the platform's last-error string (or similar context).
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Exclusive owner of a single raw resource.
///
/// Move-only: native handles are not duplicable. Moving transfers
/// ownership; [`Handle::take`] and [`Handle::replace`] leave the source
/// in the null state, which never invokes the destroy function.
pub struct Handle<T: RawHandle> {
    raw: T,
    destroy: Option<Box<dyn FnMut(T)>>,
}

impl<T: RawHandle> Handle<T> {
    /// Invoke `create` and take ownership of the result.
    ///
    /// Fails with [`ResourceCreationError`] if the result is null; the
    /// destroy function is then never called.
    pub fn acquire<C, D>(create: C, destroy: D, what: &str) -> Result<Self, ResourceCreationError>
    where
        C: FnOnce() -> T,
        D: FnMut(T) + 'static,
    {
        Self::from_raw(create(), destroy, what)
    }

    /// Take ownership of a pre-constructed raw value, with the same
    /// null-check contract as [`Handle::acquire`].
    pub fn from_raw<D>(raw: T, destroy: D, what: &str) -> Result<Self, ResourceCreationError>
    where
        D: FnMut(T) + 'static,
    {
        if raw.is_null() {
            return Err(ResourceCreationError::new(what));
        }

        Ok(Self {
            raw,
            destroy: Some(Box::new(destroy)),
        })
    }

    /// The empty state: a null value and no destroy function.
    pub fn null() -> Self {
        Self {
            raw: T::NULL,
            destroy: None,
        }
    }

    /// The owned raw value (null for the empty state).
    pub fn raw(&self) -> T {
        self.raw
    }

    /// Whether this handle is in the empty state.
    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// Replace the owned resource, destroying the previous one.
    pub fn replace(&mut self, other: Self) {
        let previous = std::mem::replace(self, other);
        drop(previous);
    }

    /// Move the resource out, leaving this handle in the null state.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::null())
    }
}

impl<T: RawHandle> Drop for Handle<T> {
    fn drop(&mut self) {
        if self.raw.is_null() {
            return;
        }
        if let Some(destroy) = self.destroy.as_mut() {
            destroy(self.raw);
        }
        self.raw = T::NULL;
    }
}

impl<T: RawHandle> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: RawHandle> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("null", &self.raw.is_null())
            .finish()
    }
}
