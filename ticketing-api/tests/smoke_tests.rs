//! End-to-end smoke tests against a live PostgreSQL database.
//!
//! Run with `--features db-tests` and `DATABASE_URL` (or the discrete
//! `TICKETING_DB_*` variables) pointing at a disposable database.

#![cfg(feature = "db-tests")]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use ticketing_api::{ApiError, ApiResult, DbConfig, PgTicketStore};
use ticketing_core::NewTicket;
use ticketing_test_utils::fixtures::{sample_new_ticket, sample_update};
use ticketing_test_utils::{TicketId, TicketStore};

async fn test_store() -> ApiResult<PgTicketStore> {
    let store = PgTicketStore::from_config(&DbConfig::from_env())?;
    store.ensure_schema().await?;
    Ok(store)
}

#[tokio::test]
async fn smoke_test_full_crud_chain() -> ApiResult<()> {
    let store = test_store().await?;
    store.ping().await?;

    let created = store.insert(&sample_new_ticket()).await?;
    assert_eq!(created.license_plate, "ABC123");
    assert_eq!(created.fine_amount, Decimal::new(15000, 2));
    assert!(created.date_issued.is_some());
    assert!(!created.is_paid);

    let fetched = store.get(created.id).await?;
    assert_eq!(fetched.as_ref(), Some(&created));

    let update = sample_update()
        .into_update()
        .map_err(|errors| ticketing_api::ApiError::validation_failed(&errors))?;
    let updated = store.update(created.id, &update).await?;
    let updated = updated.ok_or_else(ticketing_api::ApiError::ticket_not_found)?;
    assert_eq!(updated.fine_amount.to_string(), "200.00");
    assert!(updated.is_paid);

    assert!(store.list().await?.iter().any(|t| t.id == created.id));

    assert!(store.delete(created.id).await?);
    assert!(!store.delete(created.id).await?);
    assert!(store.get(created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn smoke_test_update_missing_row() -> ApiResult<()> {
    let store = test_store().await?;
    let update = sample_update()
        .into_update()
        .map_err(|errors| ticketing_api::ApiError::validation_failed(&errors))?;

    let result = store.update(TicketId::new(i32::MAX), &update).await?;
    assert!(result.is_none());
    Ok(())
}

#[tokio::test]
async fn smoke_test_date_issued_stored_as_utc_wall_clock() -> ApiResult<()> {
    let store = test_store().await?;
    let issued = Utc
        .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
        .single()
        .ok_or_else(|| ApiError::invalid_input("bad test timestamp"))?;
    let created = store
        .insert(&NewTicket {
            date_issued: Some(issued),
            ..sample_new_ticket()
        })
        .await?;
    assert_eq!(created.date_issued, Some(issued));

    let conn = store.get_conn().await?;
    let db_err = |e: tokio_postgres::Error| ApiError::database_error(e.to_string());
    let row = conn
        .query_one(
            "SELECT data_type FROM information_schema.columns \
             WHERE table_name = 'tickets' AND column_name = 'date_issued'",
            &[],
        )
        .await
        .map_err(db_err)?;
    assert_eq!(row.get::<_, String>(0), "timestamp without time zone");

    let row = conn
        .query_one(
            "SELECT date_issued::text FROM tickets WHERE id = $1",
            &[&created.id.get()],
        )
        .await
        .map_err(db_err)?;
    assert_eq!(row.get::<_, String>(0), "2024-01-15 10:30:00");

    assert_eq!(store.get(created.id).await?, Some(created.clone()));
    assert!(store.delete(created.id).await?);
    Ok(())
}
