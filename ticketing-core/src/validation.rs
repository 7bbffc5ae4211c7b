//! Request payload validation
//!
//! Incoming JSON is deserialized into [`TicketPayload`], where every field is
//! optional, and then checked against the schema. All violations are
//! collected so a client sees every problem with a payload at once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schema::{self, ColumnDef};
use crate::ticket::{normalize_fine_amount, NewTicket, TicketUpdate, Timestamp};

/// Raw ticket fields as submitted by a client.
///
/// Create requires the text fields and `fineAmount`; `dateIssued` and
/// `isPaid` default. Update requires every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TicketPayload {
    #[cfg_attr(feature = "openapi", schema(example = "ABC123"))]
    pub license_plate: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Jane Doe"))]
    pub driver_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Speeding"))]
    pub violation_type: Option<String>,
    /// Decimal string or number with at most two fractional digits
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "150.00"))]
    pub fine_amount: Option<Decimal>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub date_issued: Option<Timestamp>,
    pub is_paid: Option<bool>,
}

impl TicketPayload {
    /// Validate as a create request.
    pub fn into_new_ticket(self) -> Result<NewTicket, Vec<ValidationError>> {
        let mut v = Validator::default();
        let license_plate = v.text(&schema::LICENSE_PLATE, self.license_plate);
        let driver_name = v.text(&schema::DRIVER_NAME, self.driver_name);
        let violation_type = v.text(&schema::VIOLATION_TYPE, self.violation_type);
        let fine_amount = v.fine_amount(self.fine_amount);
        v.finish()?;

        match (license_plate, driver_name, violation_type, fine_amount) {
            (Some(license_plate), Some(driver_name), Some(violation_type), Some(fine_amount)) => {
                Ok(NewTicket {
                    license_plate,
                    driver_name,
                    violation_type,
                    fine_amount,
                    date_issued: self.date_issued,
                    is_paid: self.is_paid.unwrap_or(false),
                })
            }
            _ => Err(vec![ValidationError::InvalidValue {
                field: "body".to_string(),
                reason: "incomplete ticket".to_string(),
            }]),
        }
    }

    /// Validate as a full-replacement update request.
    pub fn into_update(self) -> Result<TicketUpdate, Vec<ValidationError>> {
        let mut v = Validator::default();
        let license_plate = v.text(&schema::LICENSE_PLATE, self.license_plate);
        let driver_name = v.text(&schema::DRIVER_NAME, self.driver_name);
        let violation_type = v.text(&schema::VIOLATION_TYPE, self.violation_type);
        let fine_amount = v.fine_amount(self.fine_amount);
        let date_issued = v.required(&schema::DATE_ISSUED, self.date_issued);
        let is_paid = v.required(&schema::IS_PAID, self.is_paid);
        v.finish()?;

        match (
            license_plate,
            driver_name,
            violation_type,
            fine_amount,
            date_issued,
            is_paid,
        ) {
            (
                Some(license_plate),
                Some(driver_name),
                Some(violation_type),
                Some(fine_amount),
                Some(date_issued),
                Some(is_paid),
            ) => Ok(TicketUpdate {
                license_plate,
                driver_name,
                violation_type,
                fine_amount,
                date_issued,
                is_paid,
            }),
            _ => Err(vec![ValidationError::InvalidValue {
                field: "body".to_string(),
                reason: "incomplete ticket".to_string(),
            }]),
        }
    }
}

/// Collects violations while checking individual fields.
#[derive(Debug, Default)]
struct Validator {
    errors: Vec<ValidationError>,
}

impl Validator {
    fn required<T>(&mut self, column: &ColumnDef, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.push(ValidationError::RequiredFieldMissing {
                field: column.field.to_string(),
            });
        }
        value
    }

    fn text(&mut self, column: &ColumnDef, value: Option<String>) -> Option<String> {
        let value = self.required(column, value)?;
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Blank {
                field: column.field.to_string(),
            });
            return None;
        }
        if let Some(max) = column.max_len() {
            let actual = value.chars().count();
            if actual > max {
                self.errors.push(ValidationError::TooLong {
                    field: column.field.to_string(),
                    max,
                    actual,
                });
                return None;
            }
        }
        Some(value)
    }

    fn fine_amount(&mut self, value: Option<Decimal>) -> Option<Decimal> {
        let column = &schema::FINE_AMOUNT;
        let value = self.required(column, value)?;
        let reason = if value.is_sign_negative() && !value.is_zero() {
            Some("must not be negative".to_string())
        } else if value.normalize().scale() > schema::FINE_AMOUNT_SCALE {
            Some(format!(
                "must have at most {} fractional digits",
                schema::FINE_AMOUNT_SCALE
            ))
        } else if value.abs()
            >= schema::integer_digit_limit(schema::FINE_AMOUNT_PRECISION, schema::FINE_AMOUNT_SCALE)
        {
            Some(format!(
                "must have at most {} integer digits",
                schema::FINE_AMOUNT_PRECISION - schema::FINE_AMOUNT_SCALE
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => {
                self.errors.push(ValidationError::InvalidValue {
                    field: column.field.to_string(),
                    reason,
                });
                None
            }
            None => Some(normalize_fine_amount(value)),
        }
    }

    fn finish(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
