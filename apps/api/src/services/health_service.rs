//! Health checks for monitoring and load balancers.

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use tavola_db::migrations::migration_status;
use tavola_db::Database;

/// Overall serving status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingStatus {
    Serving,
    NotServing,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: ServingStatus,
    pub database: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
    pub server_time: String,
}

impl HealthReport {
    pub fn is_serving(&self) -> bool {
        self.status == ServingStatus::Serving
    }
}

/// Check database connectivity and migration state.
pub async fn check_health(db: &Database) -> HealthReport {
    let database = db.health_check().await;

    let (migrations_total, migrations_applied) = if database {
        match migration_status(db.pool()).await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Could not read migration status");
                (0, 0)
            }
        }
    } else {
        warn!("Database health check failed");
        (0, 0)
    };

    let status = if database && migrations_applied >= migrations_total {
        ServingStatus::Serving
    } else {
        ServingStatus::NotServing
    };

    HealthReport {
        status,
        database,
        migrations_applied,
        migrations_total,
        server_time: Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_db::DbConfig;

    #[tokio::test]
    async fn test_healthy_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let report = check_health(&db).await;
        assert!(report.is_serving());
        assert!(report.database);
        assert!(report.migrations_total > 0);
    }

    #[tokio::test]
    async fn test_closed_database_not_serving() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let report = check_health(&db).await;
        assert_eq!(report.status, ServingStatus::NotServing);
        assert!(!report.database);
    }
}
