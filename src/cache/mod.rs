pub mod invalidator;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::info;

pub use invalidator::ScoreCacheInvalidator;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Key/value cache used for read-optimised aggregate views. Never a source
/// of truth: callers treat every error as a miss.
#[async_trait]
pub trait CacheClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError>;
    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;
    async fn close(&self) {}
}

#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        info!("redis cache connected");
        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.manager.clone();
        let mut keys = Vec::new();
        let mut iter = conn.scan_match::<_, String>(format!("{prefix}*")).await?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.manager.clone();
        redis::cmd("DEL")
            .arg(keys)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        info!("redis cache released");
    }
}

/// Used when no cache backend is configured.
#[derive(Debug, Clone, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheClient for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }
    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), CacheError> {
        Ok(())
    }
    async fn scan_prefix(&self, _prefix: &str) -> Result<Vec<String>, CacheError> {
        Ok(Vec::new())
    }
    async fn delete(&self, _keys: &[String]) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-process cache for tests. `fail` makes every call error out.
    #[derive(Default)]
    pub struct MemoryCache {
        entries: Mutex<BTreeMap<String, (String, u64)>>,
        pub fail: AtomicBool,
        pub deletes: AtomicUsize,
    }

    impl MemoryCache {
        pub fn failing() -> Self {
            let cache = Self::default();
            cache.fail.store(true, Ordering::SeqCst);
            cache
        }

        pub fn insert(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), 0));
        }

        pub fn keys(&self) -> Vec<String> {
            self.entries.lock().unwrap().keys().cloned().collect()
        }

        pub fn ttl(&self, key: &str) -> Option<u64> {
            self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
        }

        fn check(&self) -> Result<(), CacheError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CacheError::Unavailable("memory cache offline".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CacheClient for MemoryCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.check()?;
            Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
        }

        async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
            self.check()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), ttl_secs));
            Ok(())
        }

        async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
            self.check()?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }

        async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
            self.check()?;
            let mut entries = self.entries.lock().unwrap();
            for key in keys {
                entries.remove(key);
            }
            self.deletes.fetch_add(keys.len(), Ordering::SeqCst);
            Ok(())
        }
    }
}
