// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The outcome of decoding a stored payload.
///
/// `Present` carries whatever was stored, including values that are "empty" in the caller's
/// domain (`0`, `false`, `""`, `null`); `Absent` means nothing usable was stored.
///
/// # Examples
///
/// ```
/// use cache_store::Lookup;
///
/// let stored_false = Lookup::Present(false);
/// assert_eq!(stored_false.into_option(), Some(false));
/// assert_eq!(Lookup::<bool>::Absent.into_option(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<V> {
    /// A value was stored.
    Present(V),
    /// Nothing was stored under the key.
    Absent,
}

impl<V> Lookup<V> {
    /// Converts into an [`Option`], mapping `Absent` to `None`.
    #[must_use]
    pub fn into_option(self) -> Option<V> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<V> From<Option<V>> for Lookup<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}
