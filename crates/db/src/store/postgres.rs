//! Postgres-backed store.
//!
//! The two reservation views are plain tables (`locker_reservations`,
//! `shipment_reservations`) with the owning id as the leading primary-key
//! column, mirroring a wide-column layout. All reservation writes are
//! unconditional `INSERT ... ON CONFLICT ... DO UPDATE` upserts; nothing
//! pairs the two view writes into a transaction.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use lockbox_core::error::StoreError;
use lockbox_core::types::{BoxSize, EntityId, Timestamp};

use crate::models::{Locker, Reservation, ReservationStatus, ReservationView, Shipment};
use crate::store::Store;

/// Column list for reservation queries, identical in both views.
const RESERVATION_COLUMNS: &str = "locker_id, shipment_id, box_index, added_at, status";

/// Store implementation backed by a Postgres pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

/// Raw reservation row; status is stored as TEXT and decoded afterwards.
#[derive(FromRow)]
struct ReservationRow {
    locker_id: EntityId,
    shipment_id: EntityId,
    box_index: i32,
    added_at: Timestamp,
    status: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        Ok(Reservation {
            locker_id: row.locker_id,
            shipment_id: row.shipment_id,
            box_index: row.box_index,
            added_at: row.added_at,
            status: row.status.parse()?,
        })
    }
}

fn store_err(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn decode_rows(rows: Vec<ReservationRow>) -> Result<Vec<Reservation>, StoreError> {
    rows.into_iter().map(Reservation::try_from).collect()
}

#[async_trait]
impl Store for PgStore {
    async fn create_locker(&self, name: &str, boxes: &[BoxSize]) -> Result<EntityId, StoreError> {
        let id = EntityId::new_v4();
        sqlx::query("INSERT INTO lockers (id, name, boxes) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(boxes.to_vec())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        tracing::info!(locker_id = %id, name, "Locker created");
        Ok(id)
    }

    async fn get_locker(&self, id: EntityId) -> Result<Option<Locker>, StoreError> {
        sqlx::query_as::<_, Locker>("SELECT id, name, boxes FROM lockers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn list_lockers(&self) -> Result<Vec<Locker>, StoreError> {
        sqlx::query_as::<_, Locker>("SELECT id, name, boxes FROM lockers")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn create_shipment(&self, name: &str, size: BoxSize) -> Result<EntityId, StoreError> {
        let id = EntityId::new_v4();
        sqlx::query("INSERT INTO shipments (id, name, size) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(size)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        tracing::info!(shipment_id = %id, name, size, "Shipment created");
        Ok(id)
    }

    async fn get_shipment(&self, id: EntityId) -> Result<Option<Shipment>, StoreError> {
        sqlx::query_as::<_, Shipment>("SELECT id, name, size FROM shipments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn list_shipments(&self) -> Result<Vec<Shipment>, StoreError> {
        sqlx::query_as::<_, Shipment>("SELECT id, name, size FROM shipments")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn put_reservation(
        &self,
        view: ReservationView,
        locker_id: EntityId,
        shipment_id: EntityId,
        box_index: i32,
        added_at: Timestamp,
        status: ReservationStatus,
    ) -> Result<(), StoreError> {
        let sql = match view {
            ReservationView::ByLocker => {
                "INSERT INTO locker_reservations (locker_id, shipment_id, box_index, added_at, status) \
                 VALUES ($1, $2, $3, $4, $5) \
                 ON CONFLICT (locker_id, shipment_id) DO UPDATE SET \
                     box_index = EXCLUDED.box_index, \
                     added_at = EXCLUDED.added_at, \
                     status = EXCLUDED.status"
            }
            ReservationView::ByShipment => {
                "INSERT INTO shipment_reservations (shipment_id, locker_id, box_index, added_at, status) \
                 VALUES ($2, $1, $3, $4, $5) \
                 ON CONFLICT (shipment_id, locker_id) DO UPDATE SET \
                     box_index = EXCLUDED.box_index, \
                     added_at = EXCLUDED.added_at, \
                     status = EXCLUDED.status"
            }
        };
        sqlx::query(sql)
            .bind(locker_id)
            .bind(shipment_id)
            .bind(box_index)
            .bind(added_at)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn get_reservation(
        &self,
        view: ReservationView,
        locker_id: EntityId,
        shipment_id: EntityId,
    ) -> Result<Option<Reservation>, StoreError> {
        let sql = match view {
            ReservationView::ByLocker => format!(
                "SELECT {RESERVATION_COLUMNS} FROM locker_reservations \
                 WHERE locker_id = $1 AND shipment_id = $2"
            ),
            ReservationView::ByShipment => format!(
                "SELECT {RESERVATION_COLUMNS} FROM shipment_reservations \
                 WHERE shipment_id = $2 AND locker_id = $1"
            ),
        };
        let row = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(locker_id)
            .bind(shipment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.map(Reservation::try_from).transpose()
    }

    async fn list_reservations_by_locker(
        &self,
        locker_id: EntityId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM locker_reservations WHERE locker_id = $1"
        );
        let rows = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(locker_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        decode_rows(rows)
    }

    async fn list_reservations_by_shipment(
        &self,
        shipment_id: EntityId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM shipment_reservations WHERE shipment_id = $1"
        );
        let rows = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(shipment_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        decode_rows(rows)
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        sqlx::query("TRUNCATE lockers, shipments, locker_reservations, shipment_reservations")
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        tracing::info!("All collections truncated");
        Ok(())
    }
}
