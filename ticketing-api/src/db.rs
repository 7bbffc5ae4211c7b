//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres and the
//! `TicketStore` implementation on top of it. Every statement is
//! parameterized and derived from the column list in
//! `ticketing_core::schema`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use deadpool_postgres::{
    Config, ManagerConfig, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime, Timeouts,
};
use tokio_postgres::{error::SqlState, types::ToSql, NoTls, Row};
use ticketing_core::{
    schema, NewTicket, StorageError, StorageResult, Ticket, TicketId, TicketUpdate,
};
use ticketing_storage::TicketStore;

use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full connection string; takes precedence over the discrete fields
    pub url: Option<String>,
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            dbname: "tickets".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            host: std::env::var("TICKETING_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TICKETING_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("TICKETING_DB_NAME").unwrap_or_else(|_| "tickets".to_string()),
            user: std::env::var("TICKETING_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("TICKETING_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("TICKETING_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("TICKETING_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        match &self.url {
            Some(url) => cfg.url = Some(url.clone()),
            None => {
                cfg.host = Some(self.host.clone());
                cfg.port = Some(self.port);
                cfg.dbname = Some(self.dbname.clone());
                cfg.user = Some(self.user.clone());
                cfg.password = Some(self.password.clone());
            }
        }

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(self.max_size);
        pool_config.timeouts = Timeouts {
            wait: Some(self.timeout),
            create: Some(self.timeout),
            recycle: Some(self.timeout),
        };
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

fn pool_error(err: PoolError) -> StorageError {
    match err {
        PoolError::Timeout(_) => StorageError::unavailable("connection pool exhausted"),
        PoolError::Closed => StorageError::unavailable("connection pool is closed"),
        PoolError::Backend(e) => StorageError::unavailable(format!("connection failed: {}", e)),
        other => StorageError::unavailable(other.to_string()),
    }
}

fn query_error(err: tokio_postgres::Error) -> StorageError {
    if err.is_closed() {
        return StorageError::unavailable(err.to_string());
    }

    match err.as_db_error() {
        // Class 22 (data exception) and 23 (integrity constraint violation)
        Some(db) if db.code().code().starts_with("22") || db.code().code().starts_with("23") => {
            StorageError::constraint(db.column().unwrap_or("unknown"), db.message())
        }
        Some(db) if *db.code() == SqlState::UNDEFINED_TABLE => {
            StorageError::query(format!("table {} is missing", schema::TICKETS_TABLE))
        }
        _ => StorageError::query(err.to_string()),
    }
}

fn row_to_ticket(row: &Row) -> StorageResult<Ticket> {
    let get_err = |e: tokio_postgres::Error| StorageError::query(format!("bad ticket row: {}", e));
    Ok(Ticket {
        id: TicketId::new(row.try_get(schema::ID.name).map_err(get_err)?),
        license_plate: row.try_get(schema::LICENSE_PLATE.name).map_err(get_err)?,
        driver_name: row.try_get(schema::DRIVER_NAME.name).map_err(get_err)?,
        violation_type: row.try_get(schema::VIOLATION_TYPE.name).map_err(get_err)?,
        fine_amount: row.try_get(schema::FINE_AMOUNT.name).map_err(get_err)?,
        // `date_issued` is TIMESTAMP WITHOUT TIME ZONE holding UTC wall-clock time
        date_issued: row
            .try_get::<_, Option<NaiveDateTime>>(schema::DATE_ISSUED.name)
            .map_err(get_err)?
            .map(|naive| naive.and_utc()),
        is_paid: row.try_get(schema::IS_PAID.name).map_err(get_err)?,
    })
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// SQL text for every store operation, built once from the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    pub list: String,
    pub get: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

impl Statements {
    pub fn new() -> Self {
        let table = schema::TICKETS_TABLE;
        let columns = schema::select_list();

        let writable: Vec<_> = schema::writable_columns().collect();
        let insert_names = writable.iter().map(|c| c.name).collect::<Vec<_>>().join(", ");
        let insert_values = writable
            .iter()
            .enumerate()
            .map(|(i, c)| match c.default {
                // Nullable columns with a default fall back to it when bound to NULL
                Some(default) if !c.not_null => format!("COALESCE(${}, {})", i + 1, default),
                _ => format!("${}", i + 1),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = writable
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", c.name, i + 2))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            list: format!("SELECT {} FROM {} ORDER BY {}", columns, table, schema::ID.name),
            get: format!("SELECT {} FROM {} WHERE {} = $1", columns, table, schema::ID.name),
            insert: format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                table, insert_names, insert_values, columns
            ),
            update: format!(
                "UPDATE {} SET {} WHERE {} = $1 RETURNING {}",
                table, assignments, schema::ID.name, columns
            ),
            delete: format!("DELETE FROM {} WHERE {} = $1", table, schema::ID.name),
        }
    }
}

impl Default for Statements {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// POSTGRES TICKET STORE
// ============================================================================

/// `TicketStore` backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgTicketStore {
    pool: Pool,
    statements: Arc<Statements>,
}

impl PgTicketStore {
    /// Create a new store with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            statements: Arc::new(Statements::new()),
        }
    }

    /// Create a new store from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    pub async fn get_conn(&self) -> StorageResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(pool_error)
    }

    /// Create the `tickets` table if it does not exist.
    pub async fn ensure_schema(&self) -> StorageResult<()> {
        let conn = self.get_conn().await?;
        conn.batch_execute(&schema::create_table_sql())
            .await
            .map_err(query_error)?;
        tracing::info!(table = schema::TICKETS_TABLE, "Ticket schema ensured");
        Ok(())
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StorageResult<Option<Ticket>> {
        let conn = self.get_conn().await?;
        let stmt = conn.prepare_cached(sql).await.map_err(query_error)?;
        let row = conn.query_opt(&stmt, params).await.map_err(query_error)?;
        row.as_ref().map(row_to_ticket).transpose()
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn list(&self) -> StorageResult<Vec<Ticket>> {
        let conn = self.get_conn().await?;
        let stmt = conn
            .prepare_cached(&self.statements.list)
            .await
            .map_err(query_error)?;
        let rows = conn.query(&stmt, &[]).await.map_err(query_error)?;
        rows.iter().map(row_to_ticket).collect()
    }

    async fn get(&self, id: TicketId) -> StorageResult<Option<Ticket>> {
        self.query_opt(&self.statements.get, &[&id.get()]).await
    }

    async fn insert(&self, ticket: &NewTicket) -> StorageResult<Ticket> {
        let date_issued: Option<NaiveDateTime> = ticket.date_issued.map(|t| t.naive_utc());
        self.query_opt(
            &self.statements.insert,
            &[
                &ticket.license_plate,
                &ticket.driver_name,
                &ticket.violation_type,
                &ticket.fine_amount,
                &date_issued,
                &ticket.is_paid,
            ],
        )
        .await?
        .ok_or_else(|| StorageError::query("insert returned no row"))
    }

    async fn update(&self, id: TicketId, update: &TicketUpdate) -> StorageResult<Option<Ticket>> {
        self.query_opt(
            &self.statements.update,
            &[
                &id.get(),
                &update.license_plate,
                &update.driver_name,
                &update.violation_type,
                &update.fine_amount,
                &update.date_issued.naive_utc(),
                &update.is_paid,
            ],
        )
        .await
    }

    async fn delete(&self, id: TicketId) -> StorageResult<bool> {
        let conn = self.get_conn().await?;
        let stmt = conn
            .prepare_cached(&self.statements.delete)
            .await
            .map_err(query_error)?;
        let affected = conn.execute(&stmt, &[&id.get()]).await.map_err(query_error)?;
        Ok(affected > 0)
    }

    async fn ping(&self) -> StorageResult<()> {
        let conn = self.get_conn().await?;
        conn.simple_query("SELECT 1").await.map_err(query_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_config() {
        let config = DbConfig::default();
        assert!(config.url.is_none());
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "tickets");
        assert_eq!(config.max_size, 16);
    }

    #[test]
    fn test_statements_follow_schema() {
        let s = Statements::new();
        assert_eq!(
            s.list,
            "SELECT id, license_plate, driver_name, violation_type, fine_amount, date_issued, is_paid FROM tickets ORDER BY id"
        );
        assert!(s.get.ends_with("FROM tickets WHERE id = $1"));
        assert!(s.insert.starts_with(
            "INSERT INTO tickets (license_plate, driver_name, violation_type, fine_amount, date_issued, is_paid)"
        ));
        assert!(s.insert.contains("VALUES ($1, $2, $3, $4, COALESCE($5, (now() AT TIME ZONE 'utc')), $6)"));
        assert!(s.insert.contains("RETURNING id, license_plate"));
        assert!(s.update.contains(
            "SET license_plate = $2, driver_name = $3, violation_type = $4, fine_amount = $5, date_issued = $6, is_paid = $7"
        ));
        assert!(s.update.contains("WHERE id = $1 RETURNING"));
        assert_eq!(s.delete, "DELETE FROM tickets WHERE id = $1");
    }

    #[tokio::test]
    async fn test_create_pool_is_lazy() -> ApiResult<()> {
        // Pool creation does not connect; the first checkout does.
        let config = DbConfig {
            url: Some("postgres://postgres@127.0.0.1:1/tickets".to_string()),
            ..DbConfig::default()
        };
        let store = PgTicketStore::from_config(&config)?;
        assert_eq!(store.pool_size(), 0);
        Ok(())
    }
}
