use super::{Collection, DocumentStore};
use crate::error::{store_error, AppResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::{debug, info};

/// Redis keys
mod keys {
    /// Each collection is a hash of id -> JSON document
    pub const COLLECTION_PREFIX: &str = "navette:";
}

/// Redis document store
pub struct RedisDb {
    client: RedisClient,
}

impl RedisDb {
    /// Create a client for the given URL. No connection is made yet.
    pub fn new(redis_url: &str) -> AppResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = RedisClient::open(redis_url)
            .map_err(|e| store_error(&format!("Failed to create Redis client: {}", e)))?;

        Ok(Self { client })
    }

    /// Check that the server answers
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.get_connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| store_error(&format!("Redis PING error: {}", e)))?;
        Ok(())
    }

    /// Get a Redis connection from the client
    async fn get_connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| store_error(&format!("Failed to connect to Redis: {}", e)))
    }

    fn key(collection: Collection) -> String {
        format!("{}{}", keys::COLLECTION_PREFIX, collection.name())
    }
}

#[async_trait]
impl DocumentStore for RedisDb {
    async fn list(&self, collection: Collection) -> AppResult<Vec<String>> {
        let mut conn = self.get_connection().await?;

        let documents: Vec<String> = conn
            .hvals(Self::key(collection))
            .await
            .map_err(|e| store_error(&format!("Redis HVALS error: {}", e)))?;

        Ok(documents)
    }

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<String>> {
        let mut conn = self.get_connection().await?;

        let document: Option<String> = conn
            .hget(Self::key(collection), id)
            .await
            .map_err(|e| store_error(&format!("Redis HGET error: {}", e)))?;

        Ok(document)
    }

    async fn put(&self, collection: Collection, id: &str, document: &str) -> AppResult<()> {
        let mut conn = self.get_connection().await?;

        conn.hset::<_, _, _, ()>(Self::key(collection), id, document)
            .await
            .map_err(|e| store_error(&format!("Redis HSET error: {}", e)))?;

        debug!("Stored {} in {}", id, collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool> {
        let mut conn = self.get_connection().await?;

        let removed: i64 = conn
            .hdel(Self::key(collection), id)
            .await
            .map_err(|e| store_error(&format!("Redis HDEL error: {}", e)))?;

        if removed > 0 {
            info!("Deleted {} from {}", id, collection);
        }
        Ok(removed > 0)
    }
}
