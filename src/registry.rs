//! # Redis
//!
//! RAM database recording which user ids have ever submitted data.
//!
//! ## Requirements
//!
//! - O(1) "has this user ever posted" lookups for the registration check
//! - One key per user, written at most once logically, never deleted
//!
//! ## Implementation
//!
//! - One `users:{id}` string key per registered user
//! - `SET` is idempotent, re-marking an existing user is a no-op
//! - `EXISTS` answers the membership check; read-your-writes is the only
//!   ordering this service relies on

use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::error::StoreError;
use crate::store::MembershipStore;

const USER_KEY_PREFIX: &str = "users:";

pub struct RedisMembershipStore {
    connection: ConnectionManager,
}

impl RedisMembershipStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(100));

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self { connection })
    }

    fn user_key(user_id: &str) -> String {
        format!("{USER_KEY_PREFIX}{user_id}")
    }
}

#[async_trait]
impl MembershipStore for RedisMembershipStore {
    async fn mark_registered(&self, user_id: &str) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        connection
            .set::<_, _, ()>(Self::user_key(user_id), user_id)
            .await?;

        Ok(())
    }

    async fn is_registered(&self, user_id: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let registered = connection.exists(Self::user_key(user_id)).await?;

        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_keys_are_namespaced() {
        assert_eq!(RedisMembershipStore::user_key("u1"), "users:u1");
    }
}
