//! Application state for the web layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::cache::CachedRouteStore;
use crate::catalog::{InMemoryRouteStore, ResolverConfig, RouteCatalogResolver};
use crate::domain::ReservationId;
use crate::fare::FareEstimator;
use crate::geo::GeoIndex;
use crate::notify::ChannelNotifier;
use crate::reservation::{
    InMemoryReservationStore, PaymentConfig, PaymentHandle, ReservationLifecycle,
};

/// Route catalog as served to requests.
pub type CatalogStore = CachedRouteStore<InMemoryRouteStore>;

/// Lifecycle wired to the server's stores.
pub type Lifecycle = ReservationLifecycle<CatalogStore, InMemoryReservationStore, ChannelNotifier>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Location index
    pub geo: Arc<GeoIndex>,

    /// Fare formulas
    pub fares: Arc<FareEstimator>,

    /// Route search configuration
    pub resolver: Arc<ResolverConfig>,

    /// Cached route catalog
    pub routes: Arc<CatalogStore>,

    /// Booking operations
    pub lifecycle: Lifecycle,

    /// Payment settings, reported to clients
    pub payment: PaymentConfig,

    /// In-flight payments by reservation
    pub payments: Arc<Mutex<HashMap<ReservationId, PaymentHandle>>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        geo: GeoIndex,
        fares: FareEstimator,
        resolver: ResolverConfig,
        routes: CatalogStore,
        reservations: InMemoryReservationStore,
        notifier: ChannelNotifier,
        payment: PaymentConfig,
    ) -> Self {
        let fares = Arc::new(fares);
        let routes = Arc::new(routes);
        let lifecycle = ReservationLifecycle::new(
            routes.clone(),
            Arc::new(reservations),
            fares.clone(),
            Arc::new(notifier),
            payment.clone(),
        );

        Self {
            geo: Arc::new(geo),
            fares,
            resolver: Arc::new(resolver),
            routes,
            lifecycle,
            payment,
            payments: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A resolver borrowing this state's catalog and configuration.
    pub fn resolver(&self) -> RouteCatalogResolver<'_, CatalogStore> {
        RouteCatalogResolver::new(&self.routes, &self.geo, &self.fares, &self.resolver)
    }

    /// Lock the payment table, recovering it if a holder panicked.
    fn lock_payments(&self) -> MutexGuard<'_, HashMap<ReservationId, PaymentHandle>> {
        self.payments.lock().unwrap_or_else(|poisoned| {
            warn!("Payment table lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Track a payment, aborting any earlier one for the same reservation.
    pub fn track_payment(&self, handle: PaymentHandle) {
        let mut payments = self.lock_payments();
        payments.retain(|_, h| !h.is_finished());
        if let Some(previous) = payments.insert(handle.reservation(), handle) {
            previous.abort();
        }
    }

    /// Abort the in-flight payment for a reservation, if any.
    pub fn abort_payment(&self, id: ReservationId) -> bool {
        match self.lock_payments().remove(&id) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::CacheConfig;
    use crate::domain::CoreError;

    fn state() -> AppState {
        let (notifier, _rx) = ChannelNotifier::new();
        AppState::new(
            GeoIndex::tunisia(),
            FareEstimator::default(),
            ResolverConfig::default(),
            CachedRouteStore::new(InMemoryRouteStore::empty(), &CacheConfig::default()),
            InMemoryReservationStore::new(),
            notifier,
            PaymentConfig::default(),
        )
    }

    fn pending_payment(id: u64) -> PaymentHandle {
        let id = ReservationId(id);
        PaymentHandle::spawn(id, Duration::from_secs(2), async move {
            Err(CoreError::ReservationNotFound(id))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn tracked_payment_can_be_aborted_once() {
        let state = state();
        state.track_payment(pending_payment(1));

        assert!(state.abort_payment(ReservationId(1)));
        assert!(!state.abort_payment(ReservationId(1)));
        assert!(!state.abort_payment(ReservationId(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn payments_survive_a_poisoned_lock() {
        let state = state();
        let payments = state.payments.clone();
        let _ = std::thread::spawn(move || {
            let _held = payments.lock().unwrap();
            panic!("panic while holding the payment table");
        })
        .join();
        assert!(state.payments.is_poisoned());

        state.track_payment(pending_payment(5));
        assert!(state.abort_payment(ReservationId(5)));
    }
}
