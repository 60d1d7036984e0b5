//! PostgreSQL-backed `UserStore` using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel_async::RunQueryDsl;

use crate::domain::User;
use crate::domain::ports::{UserStore, UserStoreError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRefresh};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user store port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn upsert(&self, user: &User, seen_at: DateTime<Utc>) -> Result<(), UserStoreError> {
        const OPERATION: &str = "upsert user";
        let work = async {
            let mut conn = self
                .pool
                .get()
                .await
                .map_err(|err| map_pool_error(err, UserStoreError::connection))?;

            let row = NewUserRow {
                email: user.email().as_str(),
                name: user.name(),
                provider_subject: user.provider_subject(),
                created_at: seen_at,
                updated_at: seen_at,
            };
            let refresh = UserRefresh {
                name: user.name(),
                provider_subject: user.provider_subject(),
                updated_at: seen_at,
            };

            diesel::insert_into(users::table)
                .values(&row)
                .on_conflict(users::email)
                .do_update()
                .set(&refresh)
                .execute(&mut conn)
                .await
                .map_err(|err| {
                    map_diesel_error(
                        err,
                        OPERATION,
                        UserStoreError::query,
                        UserStoreError::connection,
                    )
                })?;
            Ok(())
        };

        tokio::time::timeout(self.pool.query_timeout(), work)
            .await
            .map_err(|_| UserStoreError::query(format!("{OPERATION}: timed out")))?
    }
}
