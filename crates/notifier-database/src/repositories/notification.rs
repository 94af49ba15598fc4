//! PostgreSQL notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use notifier_core::error::{AppError, ErrorKind};
use notifier_core::result::AppResult;
use notifier_core::types::Consistency;
use notifier_entity::{NewNotification, Notification, NotificationCategory, QuotaRule};

use crate::store::{NotificationStore, QuotaCheck, count_then_create};

const COUNT_SINCE_SQL: &str = "SELECT COUNT(*) FROM notifications \
     WHERE user_id = $1 AND type = $2 AND created_at >= $3";

const INSERT_SQL: &str = "INSERT INTO notifications (user_id, type, message, created_at) \
     VALUES ($1, $2, $3, clock_timestamp()) \
     RETURNING id, user_id, type, message, created_at";

const ADVISORY_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))";

/// Repository for the `notifications` table.
///
/// In [`Consistency::Exact`] mode, `create_within_quota` runs count and
/// insert in one transaction holding a transaction-scoped advisory lock
/// keyed by owner+category, so concurrent admissions for the same key are
/// serialized by PostgreSQL across every process sharing the database.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
    consistency: Consistency,
}

impl PgNotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool, consistency: Consistency) -> Self {
        Self { pool, consistency }
    }

    async fn count_on(
        conn: &mut PgConnection,
        owner: &str,
        category: &NotificationCategory,
        since: DateTime<Utc>,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(COUNT_SINCE_SQL)
            .bind(owner)
            .bind(category.as_str())
            .bind(since)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to count notifications", e)
            })?;
        Ok(count.max(0) as u64)
    }

    async fn insert_on(
        conn: &mut PgConnection,
        notification: &NewNotification,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(INSERT_SQL)
            .bind(&notification.owner)
            .bind(notification.category.as_str())
            .bind(&notification.body)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to create notification", e)
            })
    }

    async fn create_exact(
        &self,
        notification: &NewNotification,
        since: DateTime<Utc>,
        rule: &QuotaRule,
    ) -> AppResult<QuotaCheck> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to begin transaction", e)
        })?;

        sqlx::query(ADVISORY_LOCK_SQL)
            .bind(advisory_key(&notification.owner, &notification.category))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to acquire admission lock", e)
            })?;

        let count = Self::count_on(
            &mut tx,
            &notification.owner,
            &notification.category,
            since,
        )
        .await?;

        if rule.is_exceeded_by(count) {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to roll back transaction", e)
            })?;
            return Ok(QuotaCheck::Exceeded { count });
        }

        let record = Self::insert_on(&mut tx, notification).await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to commit notification", e)
        })?;

        debug!(id = %record.id, count, "Notification created under advisory lock");
        Ok(QuotaCheck::Created(record))
    }
}

#[async_trait]
impl NotificationStore for PgNotificationRepository {
    fn consistency(&self) -> Consistency {
        self.consistency
    }

    async fn count_since(
        &self,
        owner: &str,
        category: &NotificationCategory,
        since: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to acquire connection", e)
        })?;
        Self::count_on(&mut conn, owner, category, since).await
    }

    async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to acquire connection", e)
        })?;
        Self::insert_on(&mut conn, notification).await
    }

    async fn create_within_quota(
        &self,
        notification: &NewNotification,
        since: DateTime<Utc>,
        rule: &QuotaRule,
    ) -> AppResult<QuotaCheck> {
        match self.consistency {
            Consistency::BestEffort => count_then_create(self, notification, since, rule).await,
            Consistency::Exact => self.create_exact(notification, since, rule).await,
        }
    }
}

/// Advisory lock key text for an owner+category pair.
///
/// The category is length-prefixed so no two pairs share a key.
fn advisory_key(owner: &str, category: &NotificationCategory) -> String {
    format!("{}:{}:{}", category.as_str().len(), category.as_str(), owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::TimeDelta;
    use notifier_core::config::{DatabaseConfig, StoreBackend};
    use notifier_core::types::NotificationId;

    use crate::connection::DatabasePool;
    use crate::migration::run_migrations;

    #[test]
    fn test_advisory_key_separates_fields() {
        let status = NotificationCategory::new("status");
        assert_eq!(advisory_key("u1", &status), "6:status:u1");
        assert_ne!(
            advisory_key("u1", &status),
            advisory_key("u1", &NotificationCategory::new("news"))
        );
    }

    #[test]
    fn test_advisory_key_is_unambiguous_with_separators() {
        assert_ne!(
            advisory_key("b:c", &NotificationCategory::new("a")),
            advisory_key("c", &NotificationCategory::new("a:b"))
        );
    }

    #[test]
    fn test_count_query_uses_inclusive_bound() {
        assert!(COUNT_SINCE_SQL.contains("created_at >= $3"));
    }

    /// Connect to the database named by `NOTIFIER_TEST_DATABASE_URL`.
    ///
    /// Returns `None` when the variable is unset so these tests pass
    /// without a running PostgreSQL.
    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("NOTIFIER_TEST_DATABASE_URL").ok()?;
        let config = DatabaseConfig {
            backend: StoreBackend::Postgres,
            url,
            ..DatabaseConfig::default()
        };
        let pool = DatabasePool::connect(&config)
            .await
            .expect("Failed to connect to test database")
            .into_pool();
        run_migrations(&pool)
            .await
            .expect("Failed to run test migrations");
        Some(pool)
    }

    async fn clean_owner(pool: &PgPool, owner: &str) {
        sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(owner)
            .execute(pool)
            .await
            .expect("Failed to clean test rows");
    }

    fn marketing(owner: &str) -> NewNotification {
        NewNotification {
            owner: owner.to_string(),
            category: NotificationCategory::new("marketing"),
            body: "sale".to_string(),
        }
    }

    #[tokio::test]
    async fn test_pg_create_then_count() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = PgNotificationRepository::new(pool.clone(), Consistency::BestEffort);
        let owner = format!("test-{}", NotificationId::new());
        let since = Utc::now() - TimeDelta::minutes(1);

        let record = repo.create(&marketing(&owner)).await.unwrap();
        assert_eq!(record.owner, owner);
        assert_eq!(record.category.as_str(), "marketing");

        let count = repo
            .count_since(&owner, &NotificationCategory::new("marketing"), since)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let other = repo
            .count_since(&owner, &NotificationCategory::new("news"), since)
            .await
            .unwrap();
        assert_eq!(other, 0);

        clean_owner(&pool, &owner).await;
    }

    #[tokio::test]
    async fn test_pg_exact_mode_admits_exactly_the_quota() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = PgNotificationRepository::new(pool.clone(), Consistency::Exact);
        let rule = QuotaRule::new(3, Duration::from_secs(3600)).unwrap();
        let owner = format!("test-{}", NotificationId::new());
        let since = Utc::now() - TimeDelta::hours(1);

        let attempts = (0..8).map(|_| {
            let repo = repo.clone();
            let notification = marketing(&owner);
            async move {
                repo.create_within_quota(&notification, since, &rule)
                    .await
                    .unwrap()
            }
        });
        let results = futures::future::join_all(attempts).await;

        let created = results
            .iter()
            .filter(|r| matches!(r, QuotaCheck::Created(_)))
            .count();
        assert_eq!(created, 3);
        assert!(
            results
                .iter()
                .filter_map(|r| match r {
                    QuotaCheck::Exceeded { count } => Some(*count),
                    QuotaCheck::Created(_) => None,
                })
                .all(|count| count == 3)
        );

        let count = repo
            .count_since(&owner, &NotificationCategory::new("marketing"), since)
            .await
            .unwrap();
        assert_eq!(count, 3);

        clean_owner(&pool, &owner).await;
    }
}
