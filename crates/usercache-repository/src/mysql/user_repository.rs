//! MySQL user repository implementation.

use crate::{traits::UserRepository, ConnectionProvider};
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::debug;
use usercache_core::{UserCacheResult, UserRecord};

/// MySQL user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct MySqlUserRepository {
    #[shaku(inject)]
    connector: Arc<dyn ConnectionProvider>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(connector: Arc<dyn ConnectionProvider>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_name(&self, name: &str) -> UserCacheResult<Option<UserRecord>> {
        debug!("Finding user by name: {}", name);

        let mut conn = self.connector.acquire().await?;

        // Exact match: no case folding, no trailing-space padding.
        let result = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT name, profession, age, country
            FROM users
            WHERE name = ? AND CAST(name AS BINARY) = CAST(? AS BINARY)
            "#,
        )
        .bind(name)
        .bind(name)
        .fetch_optional(conn.connection_mut())
        .await;

        self.connector.release(conn).await;

        Ok(result?)
    }
}
