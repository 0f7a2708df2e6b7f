//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the two SQLite databases (trip plans and packing list) using `sqlx`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Row, SqlitePool};
use tracing::info;
use trip_planner_core::domain::{NewPackingItem, NewTrip, PackingItem, Trip};
use trip_planner_core::ports::{DatabaseService, PortError, PortResult};
use trip_planner_core::search::SavedTripQuery;

const TRIP_COLUMNS: &str =
    "rowid AS id, location, purpose, start_date, end_date, itinerary, COALESCE(saved, 0) AS saved";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    trips: SqlitePool,
    packing: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter` over the trip-plan and packing-list pools.
    pub fn new(trips: SqlitePool, packing: SqlitePool) -> Self {
        Self { trips, packing }
    }

    /// Creates both tables if they are missing and heals any schema drift.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        self.ensure_trip_schema().await?;
        self.ensure_packing_schema().await?;
        Ok(())
    }

    async fn ensure_trip_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS trip_plans
             (location TEXT, purpose TEXT, start_date DATE, end_date DATE, itinerary TEXT)",
        )
        .execute(&self.trips)
        .await?;

        // Tables written by older versions lack the `saved` flag.
        let columns = sqlx::query("PRAGMA table_info(trip_plans)")
            .fetch_all(&self.trips)
            .await?;
        let has_saved = columns
            .iter()
            .any(|row| row.try_get::<String, _>("name").map(|n| n == "saved").unwrap_or(false));
        if !has_saved {
            info!("Adding missing 'saved' column to trip_plans");
            sqlx::query("ALTER TABLE trip_plans ADD COLUMN saved BOOLEAN DEFAULT 0")
                .execute(&self.trips)
                .await?;
        }
        Ok(())
    }

    async fn ensure_packing_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS packing_items (
                id INTEGER PRIMARY KEY,
                item TEXT,
                category TEXT,
                quantity INTEGER,
                packed INTEGER
            )",
        )
        .execute(&self.packing)
        .await?;
        Ok(())
    }

    async fn fetch_packing_item(&self, item_id: i64) -> PortResult<PackingItem> {
        let record = sqlx::query_as::<_, PackingItemRecord>(
            "SELECT id, item, category, quantity, packed FROM packing_items WHERE id = ?",
        )
        .bind(item_id)
        .fetch_one(&self.packing)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Packing item {} not found", item_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        record.to_domain()
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct TripRecord {
    id: i64,
    location: String,
    purpose: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    itinerary: String,
    saved: i64,
}
impl TripRecord {
    fn to_domain(self) -> PortResult<Trip> {
        Ok(Trip {
            id: self.id,
            location: self.location,
            purpose: self
                .purpose
                .parse()
                .map_err(|e: PortError| PortError::Unexpected(e.to_string()))?,
            start_date: self.start_date,
            end_date: self.end_date,
            itinerary_text: self.itinerary,
            saved: self.saved != 0,
        })
    }
}

#[derive(FromRow)]
struct PackingItemRecord {
    id: i64,
    item: String,
    category: String,
    quantity: i64,
    packed: i64,
}
impl PackingItemRecord {
    fn to_domain(self) -> PortResult<PackingItem> {
        Ok(PackingItem {
            id: self.id,
            item: self.item,
            category: self
                .category
                .parse()
                .map_err(|e: PortError| PortError::Unexpected(e.to_string()))?,
            quantity: u32::try_from(self.quantity).map_err(|_| {
                PortError::Unexpected(format!(
                    "Packing item {} has invalid quantity {}",
                    self.id, self.quantity
                ))
            })?,
            packed: self.packed != 0,
        })
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn insert_trip(&self, trip: &NewTrip) -> PortResult<Trip> {
        self.ensure_trip_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let request = &trip.request;
        let result = sqlx::query(
            "INSERT INTO trip_plans (location, purpose, start_date, end_date, itinerary, saved)
             VALUES (?, ?, ?, ?, ?, 0)",
        )
        .bind(&request.location)
        .bind(request.purpose.as_str())
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&trip.itinerary_text)
        .execute(&self.trips)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        self.get_trip(result.last_insert_rowid()).await
    }

    async fn latest_trip(&self) -> PortResult<Option<Trip>> {
        self.ensure_trip_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let record = sqlx::query_as::<_, TripRecord>(&format!(
            "SELECT {} FROM trip_plans ORDER BY rowid DESC LIMIT 1",
            TRIP_COLUMNS
        ))
        .fetch_optional(&self.trips)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        record.map(TripRecord::to_domain).transpose()
    }

    async fn get_trip(&self, trip_id: i64) -> PortResult<Trip> {
        self.ensure_trip_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let record = sqlx::query_as::<_, TripRecord>(&format!(
            "SELECT {} FROM trip_plans WHERE rowid = ?",
            TRIP_COLUMNS
        ))
        .bind(trip_id)
        .fetch_one(&self.trips)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Trip {} not found", trip_id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        record.to_domain()
    }

    async fn mark_trip_saved(&self, trip_id: i64) -> PortResult<()> {
        self.ensure_trip_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = sqlx::query("UPDATE trip_plans SET saved = 1 WHERE rowid = ?")
            .bind(trip_id)
            .execute(&self.trips)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Trip {} not found", trip_id)));
        }
        Ok(())
    }

    async fn search_saved_trips(&self, query: &SavedTripQuery) -> PortResult<Vec<Trip>> {
        self.ensure_trip_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let records = match query.search_text() {
            Some(text) => {
                // The column comes from a closed enum; only the pattern is user text.
                let sql = format!(
                    "SELECT {} FROM trip_plans WHERE saved = 1 AND {} LIKE ? ORDER BY rowid",
                    TRIP_COLUMNS,
                    query.filter.column()
                );
                sqlx::query_as::<_, TripRecord>(&sql)
                    .bind(format!("%{}%", text))
                    .fetch_all(&self.trips)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM trip_plans WHERE saved = 1 ORDER BY rowid",
                    TRIP_COLUMNS
                );
                sqlx::query_as::<_, TripRecord>(&sql)
                    .fetch_all(&self.trips)
                    .await
            }
        }
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(TripRecord::to_domain).collect()
    }

    async fn add_packing_item(&self, item: &NewPackingItem) -> PortResult<PackingItem> {
        self.ensure_packing_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO packing_items (item, category, quantity, packed) VALUES (?, ?, ?, 0)",
        )
        .bind(&item.item)
        .bind(item.category.as_str())
        .bind(i64::from(item.quantity))
        .execute(&self.packing)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        info!("New packing item added: {}", item.item);
        self.fetch_packing_item(result.last_insert_rowid()).await
    }

    async fn list_packing_items(&self) -> PortResult<Vec<PackingItem>> {
        self.ensure_packing_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let records = sqlx::query_as::<_, PackingItemRecord>(
            "SELECT id, item, category, quantity, packed FROM packing_items ORDER BY id",
        )
        .fetch_all(&self.packing)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(PackingItemRecord::to_domain).collect()
    }

    async fn set_item_packed(&self, item_id: i64, packed: bool) -> PortResult<PackingItem> {
        self.ensure_packing_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = sqlx::query("UPDATE packing_items SET packed = ? WHERE id = ?")
            .bind(i64::from(packed))
            .bind(item_id)
            .execute(&self.packing)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Packing item {} not found",
                item_id
            )));
        }
        self.fetch_packing_item(item_id).await
    }

    async fn delete_packing_item(&self, item_id: i64) -> PortResult<()> {
        self.ensure_packing_schema()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = sqlx::query("DELETE FROM packing_items WHERE id = ?")
            .bind(item_id)
            .execute(&self.packing)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Packing item {} not found",
                item_id
            )));
        }
        info!("Packing item {} deleted", item_id);
        Ok(())
    }
}
