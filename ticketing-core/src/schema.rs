//! Schema definition for the `tickets` table.
//!
//! The column list below is the single source of truth for the table shape:
//! the PostgreSQL store derives its DDL and column lists from it, request
//! validation reads its length limits and numeric scale from it, and the
//! in-memory store enforces the same column constraints the database would.

use rust_decimal::Decimal;

use crate::error::{StorageError, StorageResult};

/// Name of the relational table holding ticket records.
pub const TICKETS_TABLE: &str = "tickets";

/// Total significant digits allowed in `fine_amount`.
pub const FINE_AMOUNT_PRECISION: u32 = 10;

/// Fractional digits stored for `fine_amount`.
pub const FINE_AMOUNT_SCALE: u32 = 2;

// ============================================================================
// COLUMN TYPES
// ============================================================================

/// SQL type of a column, carrying the size parameters constraints need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing 32-bit integer
    Serial,
    /// Variable-length text with a maximum length in characters
    Varchar(usize),
    /// Fixed-point decimal
    Numeric { precision: u32, scale: u32 },
    /// Timestamp without time zone, holding UTC wall-clock time
    Timestamp,
    Boolean,
}

impl ColumnType {
    /// Render the PostgreSQL type name.
    pub fn sql(&self) -> String {
        match self {
            ColumnType::Serial => "SERIAL".to_string(),
            ColumnType::Varchar(len) => format!("VARCHAR({})", len),
            ColumnType::Numeric { precision, scale } => {
                format!("NUMERIC({}, {})", precision, scale)
            }
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
        }
    }
}

/// Definition of a single column in the `tickets` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name in the database (snake_case)
    pub name: &'static str,
    /// Field name in JSON payloads (camelCase)
    pub field: &'static str,
    pub column_type: ColumnType,
    pub primary_key: bool,
    pub not_null: bool,
    /// SQL default expression, if any
    pub default: Option<&'static str>,
}

impl ColumnDef {
    /// Maximum length in characters for text columns.
    pub const fn max_len(&self) -> Option<usize> {
        match self.column_type {
            ColumnType::Varchar(len) => Some(len),
            _ => None,
        }
    }

    /// Whether the column is written by clients (everything except the key).
    pub const fn is_writable(&self) -> bool {
        !self.primary_key
    }

    /// Render the column clause used inside `CREATE TABLE`.
    pub fn definition_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type.sql());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        sql
    }

    /// Enforce the length limit of a text column.
    ///
    /// Length is measured in characters, as `VARCHAR(n)` does.
    pub fn check_text(&self, value: &str) -> StorageResult<()> {
        if let Some(max) = self.max_len() {
            if value.chars().count() > max {
                return Err(StorageError::constraint(
                    self.name,
                    format!("value too long for type character varying({})", max),
                ));
            }
        }
        Ok(())
    }

    /// Enforce precision and scale of a numeric column.
    ///
    /// Values with more significant fractional digits than the scale are
    /// rejected instead of rounded. Trailing zeros do not count.
    pub fn check_numeric(&self, value: &Decimal) -> StorageResult<()> {
        if let ColumnType::Numeric { precision, scale } = self.column_type {
            if value.normalize().scale() > scale {
                return Err(StorageError::constraint(
                    self.name,
                    format!("more than {} fractional digits", scale),
                ));
            }
            if value.abs() >= integer_digit_limit(precision, scale) {
                return Err(StorageError::constraint(self.name, "numeric field overflow"));
            }
        }
        Ok(())
    }
}

/// Smallest magnitude that no longer fits `NUMERIC(precision, scale)`.
pub fn integer_digit_limit(precision: u32, scale: u32) -> Decimal {
    let digits = precision.saturating_sub(scale);
    let mut limit = Decimal::ONE;
    for _ in 0..digits {
        limit *= Decimal::TEN;
    }
    limit
}

// ============================================================================
// TICKETS TABLE
// ============================================================================

pub const ID: ColumnDef = ColumnDef {
    name: "id",
    field: "id",
    column_type: ColumnType::Serial,
    primary_key: true,
    not_null: true,
    default: None,
};

pub const LICENSE_PLATE: ColumnDef = ColumnDef {
    name: "license_plate",
    field: "licensePlate",
    column_type: ColumnType::Varchar(20),
    primary_key: false,
    not_null: true,
    default: None,
};

pub const DRIVER_NAME: ColumnDef = ColumnDef {
    name: "driver_name",
    field: "driverName",
    column_type: ColumnType::Varchar(100),
    primary_key: false,
    not_null: true,
    default: None,
};

pub const VIOLATION_TYPE: ColumnDef = ColumnDef {
    name: "violation_type",
    field: "violationType",
    column_type: ColumnType::Varchar(100),
    primary_key: false,
    not_null: true,
    default: None,
};

pub const FINE_AMOUNT: ColumnDef = ColumnDef {
    name: "fine_amount",
    field: "fineAmount",
    column_type: ColumnType::Numeric {
        precision: FINE_AMOUNT_PRECISION,
        scale: FINE_AMOUNT_SCALE,
    },
    primary_key: false,
    not_null: true,
    default: None,
};

pub const DATE_ISSUED: ColumnDef = ColumnDef {
    name: "date_issued",
    field: "dateIssued",
    column_type: ColumnType::Timestamp,
    primary_key: false,
    not_null: false,
    default: Some("(now() AT TIME ZONE 'utc')"),
};

pub const IS_PAID: ColumnDef = ColumnDef {
    name: "is_paid",
    field: "isPaid",
    column_type: ColumnType::Boolean,
    primary_key: false,
    not_null: true,
    default: Some("false"),
};

/// All columns of the `tickets` table in declaration order.
pub static COLUMNS: [ColumnDef; 7] = [
    ID,
    LICENSE_PLATE,
    DRIVER_NAME,
    VIOLATION_TYPE,
    FINE_AMOUNT,
    DATE_ISSUED,
    IS_PAID,
];

/// Columns written by insert and update, in declaration order.
pub fn writable_columns() -> impl Iterator<Item = &'static ColumnDef> {
    COLUMNS.iter().filter(|c| c.is_writable())
}

/// Comma-separated list of every column, for `SELECT` and `RETURNING`.
pub fn select_list() -> String {
    COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// DDL creating the `tickets` table if it does not exist yet.
pub fn create_table_sql() -> String {
    let columns = COLUMNS
        .iter()
        .map(|c| format!("    {}", c.definition_sql()))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n)", TICKETS_TABLE, columns)
}
