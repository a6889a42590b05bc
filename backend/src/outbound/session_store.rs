//! Redis-backed session store.
//!
//! Sessions live under `session:<token>` keys holding the JSON-serialised
//! identity snapshot, written set-if-absent with the fixed TTL. A nil read
//! is "no session"; expiry is Redis's job, not ours.

use async_trait::async_trait;
use bb8_redis::bb8::Pool;
use bb8_redis::redis;
use bb8_redis::RedisConnectionManager;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::session::{SessionIdentity, SessionToken, SESSION_TTL};

const KEY_PREFIX: &str = "session:";

/// Session store backed by a Redis connection pool.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisSessionStore {
    /// Build the store against a `redis://` URL.
    pub async fn connect(url: &str) -> Result<Self, SessionStoreError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        Ok(Self { pool })
    }

    /// Round-trip a PING to verify connectivity at startup.
    pub async fn ping(&self) -> Result<(), SessionStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        redis::cmd("PING")
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))
    }

    fn key(token: &SessionToken) -> String {
        format!("{KEY_PREFIX}{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(
        &self,
        identity: &SessionIdentity,
    ) -> Result<SessionToken, SessionStoreError> {
        let token = SessionToken::random();
        let payload = serde_json::to_string(identity)
            .map_err(|err| SessionStoreError::query(err.to_string()))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;

        // SET NX EX: nil means the key already existed.
        let outcome: Option<String> = redis::cmd("SET")
            .arg(Self::key(&token))
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(SESSION_TTL.as_secs())
            .query_async(&mut *conn)
            .await
            .map_err(|err| SessionStoreError::query(err.to_string()))?;
        if outcome.is_none() {
            return Err(SessionStoreError::TokenCollision);
        }
        Ok(token)
    }

    async fn get(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionIdentity>, SessionStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(Self::key(token))
            .query_async(&mut *conn)
            .await
            .map_err(|err| SessionStoreError::query(err.to_string()))?;
        match payload {
            None => Ok(None),
            Some(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|err| SessionStoreError::query(format!("corrupt session: {err}"))),
        }
    }

    async fn delete(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        redis::cmd("DEL")
            .arg(Self::key(token))
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| SessionStoreError::query(err.to_string()))
    }
}
