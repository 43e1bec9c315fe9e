// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Caches HTTP-like responses in a local Redis server.
//!
//! Run with a server listening on `redis://127.0.0.1:6379`, or set `REDIS_URL`.

use cache_store::{CacheName, WriteOptions};
use cache_store_redis::{BackendOptions, RedisBackend, RedisCacheStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

#[tokio::main]
async fn main() -> cache_store::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let mut options = BackendOptions::default();
    if let Ok(url) = std::env::var("REDIS_URL") {
        options.url = url;
    }

    let backend = RedisBackend::connect(&options).await?;
    let store = RedisCacheStore::builder().namespace("response_cache_demo").build(backend)?;

    let name = CacheName::from("GET https://api.example.com/users/1");
    let response = CachedResponse {
        status: 200,
        headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        body: r#"{"id":1,"name":"Ada"}"#.to_owned(),
    };

    store.write(&name, &response, WriteOptions::with_ttl(30)).await?;

    match store.read::<CachedResponse>(&name).await {
        Some(cached) => println!("hit: {} {}", cached.status, cached.body),
        None => println!("miss"),
    }

    store.clear().await?;
    println!("after clear: {:?}", store.read::<CachedResponse>(&name).await);

    Ok(())
}
