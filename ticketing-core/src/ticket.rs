//! Ticket entity and write payloads

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::schema;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// IDENTITY
// ============================================================================

/// Server-assigned ticket identifier (`SERIAL` primary key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct TicketId(i32);

impl TicketId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TicketId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Error returned when a path segment is not a usable ticket id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a positive 32-bit integer")]
pub struct ParseTicketIdError(pub String);

impl FromStr for TicketId {
    type Err = ParseTicketIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ParseTicketIdError(s.to_string())),
        }
    }
}

// ============================================================================
// TICKET
// ============================================================================

/// A single traffic/parking violation record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub license_plate: String,
    pub driver_name: String,
    pub violation_type: String,
    /// Fine amount, serialized as a decimal string with two fractional digits
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "150.00"))]
    pub fine_amount: Decimal,
    /// Issue time; `null` only for rows written without one
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub date_issued: Option<Timestamp>,
    pub is_paid: bool,
}

impl Ticket {
    /// Build the stored record for a freshly assigned id.
    ///
    /// Applies the column defaults the database would apply.
    pub fn from_new(id: TicketId, new: NewTicket, now: Timestamp) -> Self {
        Self {
            id,
            license_plate: new.license_plate,
            driver_name: new.driver_name,
            violation_type: new.violation_type,
            fine_amount: normalize_fine_amount(new.fine_amount),
            date_issued: Some(new.date_issued.unwrap_or(now)),
            is_paid: new.is_paid,
        }
    }

    /// Overwrite every writable field. The id never changes.
    pub fn apply(&mut self, update: TicketUpdate) {
        self.license_plate = update.license_plate;
        self.driver_name = update.driver_name;
        self.violation_type = update.violation_type;
        self.fine_amount = normalize_fine_amount(update.fine_amount);
        self.date_issued = Some(update.date_issued);
        self.is_paid = update.is_paid;
    }
}

/// Rescale a fine amount to the column scale.
///
/// Trailing zeros are dropped first, so `150.000` becomes `150.00`.
/// Callers must have rejected values that still exceed the scale; this
/// never rounds accepted input.
pub fn normalize_fine_amount(amount: Decimal) -> Decimal {
    let mut amount = amount.normalize();
    if amount.scale() <= schema::FINE_AMOUNT_SCALE {
        amount.rescale(schema::FINE_AMOUNT_SCALE);
    }
    amount
}

// ============================================================================
// WRITE PAYLOADS
// ============================================================================

/// Checked payload for inserting a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub license_plate: String,
    pub driver_name: String,
    pub violation_type: String,
    pub fine_amount: Decimal,
    /// Defaults to the current time when `None`
    pub date_issued: Option<Timestamp>,
    pub is_paid: bool,
}

impl NewTicket {
    /// Enforce the column constraints of the `tickets` table.
    pub fn check_constraints(&self) -> StorageResult<()> {
        check_row(
            &self.license_plate,
            &self.driver_name,
            &self.violation_type,
            &self.fine_amount,
        )
    }
}

/// Checked payload replacing every writable field of a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketUpdate {
    pub license_plate: String,
    pub driver_name: String,
    pub violation_type: String,
    pub fine_amount: Decimal,
    pub date_issued: Timestamp,
    pub is_paid: bool,
}

impl TicketUpdate {
    /// Enforce the column constraints of the `tickets` table.
    pub fn check_constraints(&self) -> StorageResult<()> {
        check_row(
            &self.license_plate,
            &self.driver_name,
            &self.violation_type,
            &self.fine_amount,
        )
    }
}

fn check_row(
    license_plate: &str,
    driver_name: &str,
    violation_type: &str,
    fine_amount: &Decimal,
) -> StorageResult<()> {
    schema::LICENSE_PLATE.check_text(license_plate)?;
    schema::DRIVER_NAME.check_text(driver_name)?;
    schema::VIOLATION_TYPE.check_text(violation_type)?;
    schema::FINE_AMOUNT.check_numeric(fine_amount)
}
