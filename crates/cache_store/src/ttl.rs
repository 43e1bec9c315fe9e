// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, WriteOptions};

/// Expiry applied to writes that don't carry their own TTL: five minutes.
pub const DEFAULT_TTL: TtlSeconds = TtlSeconds(300);

/// A time-to-live in whole seconds, as understood by the backend's native expiry.
///
/// # Examples
///
/// ```
/// use cache_store::TtlSeconds;
///
/// let ttl = TtlSeconds::new(30);
/// assert_eq!(ttl.as_secs(), 30);
/// assert!(!ttl.is_zero());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TtlSeconds(u64);

impl TtlSeconds {
    /// Creates a TTL of `secs` seconds.
    #[must_use]
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the TTL in seconds.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Returns `true` for a zero TTL, which no backend write accepts.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for TtlSeconds {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for TtlSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Resolves the effective expiry of a write.
///
/// A per-call [`WriteOptions::ttl`] wins over the configured default. A per-call TTL of zero
/// counts as "not specified", so every resolved TTL is non-zero.
///
/// # Examples
///
/// ```
/// use cache_store::{TtlPolicy, TtlSeconds, WriteOptions};
///
/// let policy = TtlPolicy::new(TtlSeconds::new(60))?;
/// assert_eq!(policy.resolve(&WriteOptions::default()).as_secs(), 60);
/// assert_eq!(policy.resolve(&WriteOptions::with_ttl(30)).as_secs(), 30);
/// # Ok::<(), cache_store::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlPolicy {
    default_ttl: TtlSeconds,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self { default_ttl: DEFAULT_TTL }
    }
}

impl TtlPolicy {
    /// Creates a policy falling back to `default_ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `default_ttl` is zero.
    pub fn new(default_ttl: TtlSeconds) -> Result<Self> {
        if default_ttl.is_zero() {
            return Err(Error::InvalidConfig("default TTL must be greater than zero".to_owned()));
        }
        Ok(Self { default_ttl })
    }

    /// Returns the configured default TTL.
    #[must_use]
    pub fn default_ttl(&self) -> TtlSeconds {
        self.default_ttl
    }

    /// Returns the TTL to apply for a write carrying `options`.
    #[must_use]
    pub fn resolve(&self, options: &WriteOptions) -> TtlSeconds {
        options.ttl.filter(|ttl| !ttl.is_zero()).unwrap_or(self.default_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_uses_five_minutes() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.default_ttl(), TtlSeconds::new(300));
        assert_eq!(policy.resolve(&WriteOptions::default()), DEFAULT_TTL);
    }

    #[test]
    fn explicit_ttl_overrides_default() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.resolve(&WriteOptions::with_ttl(30)), TtlSeconds::new(30));
    }

    #[test]
    fn zero_ttl_falls_back_to_default() {
        let policy = TtlPolicy::new(TtlSeconds::new(90)).expect("valid policy");
        assert_eq!(policy.resolve(&WriteOptions::with_ttl(0)), TtlSeconds::new(90));
    }

    #[test]
    fn zero_default_is_rejected() {
        let err = TtlPolicy::new(TtlSeconds::new(0)).expect_err("zero default must be rejected");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn display_includes_unit() {
        assert_eq!(TtlSeconds::new(12).to_string(), "12s");
    }
}
