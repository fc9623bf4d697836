//! Reservation storage.
//!
//! Updates carry the version the caller read. A write against a newer
//! stored version fails with `StoreError::Conflict` instead of
//! overwriting.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use crate::domain::{
    PaymentMethod, Reservation, ReservationId, ReservationStatus, RouteId, StoreError, UserId,
    VehicleId,
};

/// A reservation before the store has assigned its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub user: UserId,
    pub route: RouteId,
    pub vehicle: VehicleId,
    pub departure: NaiveDateTime,
    pub round_trip: bool,
    pub return_at: Option<NaiveDateTime>,
    pub price: f64,
    pub paid: bool,
    pub payment_method: PaymentMethod,
    pub status: ReservationStatus,
    pub created_at: NaiveDateTime,
}

impl NewReservation {
    fn into_reservation(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            user: self.user,
            route: self.route,
            vehicle: self.vehicle,
            departure: self.departure,
            round_trip: self.round_trip,
            return_at: self.return_at,
            price: self.price,
            paid: self.paid,
            payment_method: self.payment_method,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.created_at,
            version: 1,
        }
    }
}

/// Create/read/update access to reservations. Nothing is ever deleted.
pub trait ReservationStore: Send + Sync {
    /// Store a new reservation, assigning its id. The stored record starts
    /// at version 1.
    fn insert(
        &self,
        reservation: NewReservation,
    ) -> impl Future<Output = Result<Reservation, StoreError>> + Send;

    fn get(
        &self,
        id: ReservationId,
    ) -> impl Future<Output = Result<Option<Reservation>, StoreError>> + Send;

    /// Replace a stored reservation.
    ///
    /// `reservation.version` must equal the stored version; the stored
    /// copy is returned with the version incremented.
    fn update(
        &self,
        reservation: Reservation,
    ) -> impl Future<Output = Result<Reservation, StoreError>> + Send;

    /// Reservations belonging to a user, oldest first.
    fn list_for_user(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<Vec<Reservation>, StoreError>> + Send;
}

#[derive(Debug, Default)]
struct Records {
    last_id: u64,
    by_id: BTreeMap<ReservationId, Reservation>,
}

/// In-memory reservation store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReservationStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl ReservationStore for InMemoryReservationStore {
    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, StoreError> {
        let mut records = self.records.write().await;
        records.last_id += 1;
        let id = ReservationId(records.last_id);
        let stored = reservation.into_reservation(id);
        records.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        Ok(self.records.read().await.by_id.get(&id).cloned())
    }

    async fn update(&self, mut reservation: Reservation) -> Result<Reservation, StoreError> {
        let mut records = self.records.write().await;
        let current = records
            .by_id
            .get_mut(&reservation.id)
            .ok_or(StoreError::Missing(reservation.id))?;

        if current.version != reservation.version {
            return Err(StoreError::Conflict {
                id: reservation.id,
                expected: reservation.version,
                found: current.version,
            });
        }

        reservation.version += 1;
        *current = reservation.clone();
        Ok(reservation)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Reservation>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .by_id
            .values()
            .filter(|r| &r.user == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::*;

    pub fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    pub fn draft(user: &str) -> NewReservation {
        NewReservation {
            user: UserId::new(user).unwrap(),
            route: RouteId(1),
            vehicle: VehicleId(1),
            departure: at(10, 8),
            round_trip: false,
            return_at: None,
            price: 58.3,
            paid: false,
            payment_method: PaymentMethod::Card,
            status: ReservationStatus::Pending,
            created_at: at(1, 12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::draft;
    use super::*;

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryReservationStore::new();
        let a = store.insert(draft("amira")).await.unwrap();
        let b = store.insert(draft("amira")).await.unwrap();
        assert_eq!(a.id, ReservationId(1));
        assert_eq!(b.id, ReservationId(2));
        assert_eq!(a.version, 1);
        assert_eq!(a.updated_at, a.created_at);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let store = InMemoryReservationStore::new();
        let mut r = store.insert(draft("amira")).await.unwrap();
        r.price = 60.0;
        let updated = store.update(r).await.unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(store.get(updated.id).await.unwrap().unwrap().price, 60.0);
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let store = InMemoryReservationStore::new();
        let original = store.insert(draft("amira")).await.unwrap();

        let mut first = original.clone();
        first.status = ReservationStatus::Cancelled;
        store.update(first).await.unwrap();

        let mut stale = original.clone();
        stale.paid = true;
        let err = store.update(stale).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Conflict {
                id: original.id,
                expected: 1,
                found: 2
            }
        );

        let stored = store.get(original.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
        assert!(!stored.paid);
    }

    #[tokio::test]
    async fn update_of_unknown_reservation() {
        let store = InMemoryReservationStore::new();
        let mut r = store.insert(draft("amira")).await.unwrap();
        r.id = ReservationId(99);
        assert_eq!(
            store.update(r).await.unwrap_err(),
            StoreError::Missing(ReservationId(99))
        );
    }

    #[tokio::test]
    async fn list_filters_by_user() {
        let store = InMemoryReservationStore::new();
        store.insert(draft("amira")).await.unwrap();
        store.insert(draft("sami")).await.unwrap();
        store.insert(draft("amira")).await.unwrap();

        let amira = UserId::new("amira").unwrap();
        let ids: Vec<_> = store
            .list_for_user(&amira)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![ReservationId(1), ReservationId(3)]);
    }
}
