//! Ticketing Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for ticket payloads
//! - Fixtures for common scenarios
//! - A store double that always fails

// Re-export the in-memory store from its source crate
pub use ticketing_storage::{InMemoryTicketStore, TicketStore};

// Re-export core types for convenience
pub use ticketing_core::{
    NewTicket, StorageError, StorageResult, Ticket, TicketId, TicketPayload, TicketUpdate,
    Timestamp,
};

use async_trait::async_trait;

// ============================================================================
// FAILING STORE
// ============================================================================

/// Store whose every operation fails as if the database were down.
///
/// Drives the 500/503 paths of the API without a real database.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new() -> Self {
        Self::with_reason("connection refused")
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Detail carried by every error; must never reach an HTTP client.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn fail<T>(&self) -> StorageResult<T> {
        Err(StorageError::unavailable(self.reason.clone()))
    }
}

impl Default for UnavailableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for UnavailableStore {
    async fn list(&self) -> StorageResult<Vec<Ticket>> {
        self.fail()
    }

    async fn get(&self, _id: TicketId) -> StorageResult<Option<Ticket>> {
        self.fail()
    }

    async fn insert(&self, _ticket: &NewTicket) -> StorageResult<Ticket> {
        self.fail()
    }

    async fn update(&self, _id: TicketId, _update: &TicketUpdate) -> StorageResult<Option<Ticket>> {
        self.fail()
    }

    async fn delete(&self, _id: TicketId) -> StorageResult<bool> {
        self.fail()
    }

    async fn ping(&self) -> StorageResult<()> {
        self.fail()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for valid ticket input.

    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    /// License plate within the 20-character column.
    pub fn arb_license_plate() -> impl Strategy<Value = String> {
        "[A-Z0-9]{1,8}(-[A-Z0-9]{1,4})?"
    }

    /// Driver name within the 100-character column.
    pub fn arb_driver_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,20} [A-Z][a-z]{1,30}"
    }

    pub fn arb_violation_type() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Speeding".to_string()),
            Just("Parking".to_string()),
            Just("Red Light".to_string()),
            "[A-Z][a-z ]{2,60}[a-z]",
        ]
    }

    /// Fine amount with exactly two decimal places, fitting NUMERIC(10,2).
    pub fn arb_fine_amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    /// Timestamp between 2000 and 2100, second precision.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (946_684_800i64..4_102_444_800i64)
            .prop_filter_map("representable timestamp", |secs| {
                Utc.timestamp_opt(secs, 0).single()
            })
    }

    /// Valid create payload; `dateIssued` and `isPaid` are sometimes omitted.
    pub fn arb_ticket_payload() -> impl Strategy<Value = TicketPayload> {
        (
            arb_license_plate(),
            arb_driver_name(),
            arb_violation_type(),
            arb_fine_amount(),
            proptest::option::of(arb_timestamp()),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(
                |(license_plate, driver_name, violation_type, fine_amount, date_issued, is_paid)| {
                    TicketPayload {
                        license_plate: Some(license_plate),
                        driver_name: Some(driver_name),
                        violation_type: Some(violation_type),
                        fine_amount: Some(fine_amount),
                        date_issued,
                        is_paid,
                    }
                },
            )
    }

    /// Valid full-replacement payload with every field present.
    pub fn arb_update_payload() -> impl Strategy<Value = TicketPayload> {
        (arb_ticket_payload(), arb_timestamp(), any::<bool>()).prop_map(
            |(mut payload, date_issued, is_paid)| {
                payload.date_issued = Some(date_issued);
                payload.is_paid = Some(is_paid);
                payload
            },
        )
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made payloads for common scenarios.

    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    /// The Jane Doe speeding ticket; `dateIssued` omitted so it defaults.
    pub fn sample_payload() -> TicketPayload {
        TicketPayload {
            license_plate: Some("ABC123".to_string()),
            driver_name: Some("Jane Doe".to_string()),
            violation_type: Some("Speeding".to_string()),
            fine_amount: Some(Decimal::new(15000, 2)),
            date_issued: None,
            is_paid: Some(false),
        }
    }

    /// Full replacement for [`sample_payload`] raising the fine to 200.00.
    pub fn sample_update() -> TicketPayload {
        TicketPayload {
            license_plate: Some("XYZ789".to_string()),
            driver_name: Some("Jane Doe".to_string()),
            violation_type: Some("Parking".to_string()),
            fine_amount: Some(Decimal::new(20000, 2)),
            date_issued: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single(),
            is_paid: Some(true),
        }
    }

    /// `sample_payload` already validated for direct store calls.
    pub fn sample_new_ticket() -> NewTicket {
        NewTicket {
            license_plate: "ABC123".to_string(),
            driver_name: "Jane Doe".to_string(),
            violation_type: "Speeding".to_string(),
            fine_amount: Decimal::new(15000, 2),
            date_issued: None,
            is_paid: false,
        }
    }
}
