// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! [`Backend`] implementation over a Redis server.

use std::fmt;

use cache_store::{CacheKey, Error, Result, TtlSeconds};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Cmd, RedisError};
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::{Backend, BackendFault};

const DEFAULT_URL: &str = "redis://127.0.0.1:6379";
const FAULT_CAPACITY: usize = 64;

/// Connection parameters for [`RedisBackend`].
///
/// ```
/// use cache_store_redis::BackendOptions;
///
/// let options: BackendOptions = serde_json::from_str(r#"{ "url": "redis://cache:6379/2" }"#)?;
/// assert_eq!(options.url, "redis://cache:6379/2");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendOptions {
    /// Redis connection URL, e.g. `redis://127.0.0.1:6379/0`.
    pub url: String,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
        }
    }
}

/// A Redis connection used as a cache backend.
///
/// Wraps a multiplexed, automatically reconnecting connection. Clones share the connection.
/// Calls that fail because the connection broke are returned as errors and also published
/// as [`BackendFault`]s.
#[derive(Clone)]
pub struct RedisBackend {
    connection: ConnectionManager,
    faults: broadcast::Sender<BackendFault>,
}

impl RedisBackend {
    /// Connects to the server described by `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server can't be reached.
    pub async fn connect(options: &BackendOptions) -> Result<Self> {
        let client = Client::open(options.url.as_str()).map_err(Error::from_message)?;
        Self::from_client(client).await
    }

    /// Connects through an already configured client.
    ///
    /// # Errors
    ///
    /// Returns an error if the server can't be reached.
    pub async fn from_client(client: Client) -> Result<Self> {
        let connection = client.get_connection_manager().await.map_err(Error::from_message)?;
        let (faults, _) = broadcast::channel(FAULT_CAPACITY);
        tracing::debug!("connected to redis");
        Ok(Self { connection, faults })
    }

    fn fail(&self, error: RedisError) -> Error {
        if is_connection_fault(&error) {
            // No subscriber is fine; the error still reaches the caller.
            _ = self.faults.send(BackendFault::new(error.to_string()));
        }
        Error::from_message(error)
    }
}

/// Errors meaning the connection itself broke, as opposed to a rejected command.
fn is_connection_fault(error: &RedisError) -> bool {
    error.is_connection_dropped() || error.is_connection_refusal() || error.is_io_error() || error.is_timeout()
}

/// Builds `DEL key...`, or nothing for an empty key list since `DEL` requires at least one key.
fn delete_command(keys: &[CacheKey]) -> Option<Cmd> {
    if keys.is_empty() {
        return None;
    }

    let mut command = redis::cmd("DEL");
    for key in keys {
        command.arg(key.as_str());
    }
    Some(command)
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisBackend")
            .field("fault_subscribers", &self.faults.receiver_count())
            .finish_non_exhaustive()
    }
}

impl Backend for RedisBackend {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<String>>(key.as_str())
            .await
            .map_err(|error| self.fail(error))
    }

    async fn set_with_expiry(&self, key: &CacheKey, ttl: TtlSeconds, payload: &str) -> Result<()> {
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(key.as_str(), payload, ttl.as_secs())
            .await
            .map_err(|error| self.fail(error))
    }

    async fn delete(&self, keys: &[CacheKey]) -> Result<()> {
        let Some(command) = delete_command(keys) else {
            return Ok(());
        };

        let mut connection = self.connection.clone();
        command
            .query_async::<()>(&mut connection)
            .await
            .map_err(|error| self.fail(error))
    }

    async fn keys(&self, pattern: &CacheKey) -> Result<Vec<CacheKey>> {
        let mut connection = self.connection.clone();
        let keys = connection
            .keys::<_, Vec<String>>(pattern.as_str())
            .await
            .map_err(|error| self.fail(error))?;
        Ok(keys.into_iter().map(CacheKey::new).collect())
    }

    fn faults(&self) -> Option<broadcast::Receiver<BackendFault>> {
        Some(self.faults.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use redis::ErrorKind;

    use super::*;

    #[test]
    fn empty_delete_sends_nothing() {
        assert!(delete_command(&[]).is_none());
    }

    #[test]
    fn delete_lists_every_key() {
        let keys = [CacheKey::new("ns:a"), CacheKey::new("ns:b")];
        let command = delete_command(&keys).expect("command for non-empty keys");

        assert_eq!(
            command.get_packed_command(),
            b"*3\r\n$3\r\nDEL\r\n$4\r\nns:a\r\n$4\r\nns:b\r\n".to_vec()
        );
    }

    #[test]
    fn broken_connections_are_faults() {
        let refused = RedisError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        let reset = RedisError::from(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        let io_kind = RedisError::from((ErrorKind::IoError, "broken pipe"));

        assert!(is_connection_fault(&refused));
        assert!(is_connection_fault(&reset));
        assert!(is_connection_fault(&io_kind));
    }

    #[test]
    fn rejected_commands_are_not_faults() {
        let wrong_type = RedisError::from((ErrorKind::ResponseError, "WRONGTYPE"));
        let bad_reply = RedisError::from((ErrorKind::TypeError, "unexpected reply"));

        assert!(!is_connection_fault(&wrong_type));
        assert!(!is_connection_fault(&bad_reply));
    }

    #[test]
    fn backend_options_default_to_local_server() {
        assert_eq!(BackendOptions::default().url, DEFAULT_URL);
        let options: BackendOptions = serde_json::from_str("{}").expect("empty options parse");
        assert_eq!(options, BackendOptions::default());
    }
}
