// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The envelope every value is stored in.
//!
//! Values are never stored raw. Wrapping them as `{"value": ...}` keeps a stored `null`,
//! `false`, `0` or `""` distinguishable from a key that holds nothing.

use cache_store::{Lookup, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The stored form of a cached value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<V> {
    /// The cached value.
    pub value: V,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, V: ?Sized> {
    value: &'a V,
}

/// Encodes `value` into its stored JSON envelope.
///
/// # Errors
///
/// Returns [`Error::Codec`](cache_store::Error::Codec) if `value` can't be serialized.
///
/// # Examples
///
/// ```
/// let payload = cache_store_redis::codec::encode(&false)?;
/// assert_eq!(payload, r#"{"value":false}"#);
/// # Ok::<(), cache_store::Error>(())
/// ```
pub fn encode<V>(value: &V) -> Result<String>
where
    V: Serialize + ?Sized,
{
    Ok(serde_json::to_string(&EnvelopeRef { value })?)
}

/// Decodes a stored payload.
///
/// A missing payload and a bare JSON `null` both decode to [`Lookup::Absent`]; an envelope
/// decodes to [`Lookup::Present`] whatever its inner value is.
///
/// # Errors
///
/// Returns [`Error::Codec`](cache_store::Error::Codec) if the payload is not an envelope holding
/// a `V`.
///
/// # Examples
///
/// ```
/// use cache_store::Lookup;
/// use cache_store_redis::codec::decode;
///
/// assert_eq!(decode::<u32>(Some(r#"{"value":0}"#))?, Lookup::Present(0));
/// assert_eq!(decode::<u32>(None)?, Lookup::Absent);
/// assert_eq!(decode::<u32>(Some("null"))?, Lookup::Absent);
/// # Ok::<(), cache_store::Error>(())
/// ```
pub fn decode<V>(payload: Option<&str>) -> Result<Lookup<V>>
where
    V: DeserializeOwned,
{
    let Some(payload) = payload else {
        return Ok(Lookup::Absent);
    };

    let envelope: Option<Envelope<V>> = serde_json::from_str(payload)?;
    Ok(envelope.map(|envelope| envelope.value).into())
}
