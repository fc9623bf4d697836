//! Duration and fare estimation.
//!
//! Every price in the system comes from here: search summaries,
//! synthesized routes, and the price charged when a reservation is
//! created or edited. Money is rounded to one decimal (DT).

use serde::Serialize;

use crate::domain::{TransportMode, round1};

/// Constants behind the fare formulas.
#[derive(Debug, Clone)]
pub struct FareConfig {
    /// Baseline cruising speed (km/h) used for travel time.
    pub speed_kmh: f64,

    /// Baseline price per kilometre (DT).
    pub price_per_km: f64,

    /// Multiplier applied to a one-way price for a round trip.
    pub round_trip_factor: f64,

    /// Multiplier applied at booking when the vehicle is a plane.
    pub premium_factor: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 80.0,
            price_per_km: 0.5,
            round_trip_factor: 1.8, // 10% off a literal doubling
            premium_factor: 1.1,
        }
    }
}

/// Estimated travel time and price for one trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareEstimate {
    pub duration_minutes: u32,
    pub price: f64,
}

/// Computes durations and prices from distance and mode.
#[derive(Debug, Clone, Default)]
pub struct FareEstimator {
    config: FareConfig,
}

impl FareEstimator {
    pub fn new(config: FareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FareConfig {
        &self.config
    }

    /// Travel time and search-time price for a trip.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::TransportMode;
    /// use trip_planner::fare::FareEstimator;
    ///
    /// let fares = FareEstimator::default();
    /// let one_way = fares.estimate(100.0, TransportMode::Bus, false);
    /// assert_eq!(one_way.duration_minutes, 75);
    /// assert_eq!(one_way.price, 50.0);
    ///
    /// let round_trip = fares.estimate(100.0, TransportMode::Bus, true);
    /// assert_eq!(round_trip.price, 90.0);
    /// ```
    pub fn estimate(&self, distance_km: f64, mode: TransportMode, round_trip: bool) -> FareEstimate {
        let duration_minutes = self.duration_minutes(distance_km, mode);
        let price = self.trip_price(self.one_way_price(distance_km, mode), round_trip);
        FareEstimate {
            duration_minutes,
            price,
        }
    }

    /// Price fixed at booking time.
    ///
    /// Same as [`estimate`](Self::estimate), plus the premium surcharge on
    /// the one-way price when the booked vehicle is a plane.
    pub fn estimate_booking(
        &self,
        distance_km: f64,
        mode: TransportMode,
        round_trip: bool,
        vehicle: TransportMode,
    ) -> FareEstimate {
        let duration_minutes = self.duration_minutes(distance_km, mode);
        let mut one_way = self.one_way_price(distance_km, mode);
        if vehicle == TransportMode::Plane {
            one_way = round1(one_way * self.config.premium_factor);
        }
        FareEstimate {
            duration_minutes,
            price: self.trip_price(one_way, round_trip),
        }
    }

    /// Travel time in whole minutes, rounded up.
    pub fn duration_minutes(&self, distance_km: f64, mode: TransportMode) -> u32 {
        let factors = mode.factors();
        let hours = distance_km.max(0.0) * factors.distance / self.config.speed_kmh;
        let minutes = hours * 60.0 * factors.duration;
        // Drop float noise before ceil so 96.00000000000001 stays 96.
        ((minutes * 1e6).round() / 1e6).ceil() as u32
    }

    /// One-way price, rounded to one decimal.
    pub fn one_way_price(&self, distance_km: f64, mode: TransportMode) -> f64 {
        let factors = mode.factors();
        round1(distance_km.max(0.0) * factors.distance * self.config.price_per_km * factors.price)
    }

    /// Apply the round-trip rule to a one-way price.
    pub fn trip_price(&self, one_way: f64, round_trip: bool) -> f64 {
        if round_trip {
            round1(one_way * self.config.round_trip_factor)
        } else {
            one_way
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FareConfig::default();
        assert_eq!(config.speed_kmh, 80.0);
        assert_eq!(config.price_per_km, 0.5);
        assert_eq!(config.round_trip_factor, 1.8);
        assert_eq!(config.premium_factor, 1.1);
    }

    #[test]
    fn bus_tunis_sousse() {
        let fares = FareEstimator::default();
        let est = fares.estimate(116.5, TransportMode::Bus, false);
        assert!((87..=88).contains(&est.duration_minutes));
        assert!((58.0..=58.5).contains(&est.price));

        let rt = fares.estimate(116.5, TransportMode::Bus, true);
        assert!((104.0..=105.5).contains(&rt.price));
        assert_eq!(rt.duration_minutes, est.duration_minutes);
    }

    #[test]
    fn bus_116_km_matches_worked_example() {
        let fares = FareEstimator::default();
        let est = fares.estimate(116.0, TransportMode::Bus, false);
        assert_eq!(est.duration_minutes, 87);
        assert_eq!(est.price, 58.0);
        assert_eq!(fares.estimate(116.0, TransportMode::Bus, true).price, 104.4);
    }

    #[test]
    fn mode_multipliers() {
        let fares = FareEstimator::default();
        // 160 km: bus baseline 120 min, 80 DT
        assert_eq!(fares.estimate(160.0, TransportMode::Plane, false).duration_minutes, 36);
        assert_eq!(fares.estimate(160.0, TransportMode::Plane, false).price, 400.0);
        assert_eq!(fares.estimate(160.0, TransportMode::Ferry, false).duration_minutes, 240);
        assert_eq!(fares.estimate(160.0, TransportMode::Ferry, false).price, 160.0);
        assert_eq!(fares.estimate(160.0, TransportMode::Train, false).duration_minutes, 96);
        assert_eq!(fares.estimate(160.0, TransportMode::Train, false).price, 72.0);
        assert_eq!(fares.estimate(160.0, TransportMode::Taxi, false).duration_minutes, 84);
        assert_eq!(fares.estimate(160.0, TransportMode::Taxi, false).price, 200.0);
        assert_eq!(fares.estimate(160.0, TransportMode::Other, false).price, 80.0);
    }

    #[test]
    fn metro_shortens_distance() {
        let fares = FareEstimator::default();
        // 20 km → 18 km effective: 18/80*60*0.7 = 9.45 min, 18*0.5*0.3 = 2.7 DT
        let est = fares.estimate(20.0, TransportMode::Metro, false);
        assert_eq!(est.duration_minutes, 10);
        assert_eq!(est.price, 2.7);
        assert_eq!(fares.estimate(20.0, TransportMode::Tgm, false), est);
    }

    #[test]
    fn premium_surcharge_only_for_planes() {
        let fares = FareEstimator::default();
        let search = fares.estimate(600.0, TransportMode::Plane, false);
        let booked = fares.estimate_booking(600.0, TransportMode::Plane, false, TransportMode::Plane);
        assert_eq!(search.price, 1500.0);
        assert_eq!(booked.price, 1650.0);

        let bus = fares.estimate_booking(600.0, TransportMode::Bus, false, TransportMode::Bus);
        assert_eq!(bus, fares.estimate(600.0, TransportMode::Bus, false));
    }

    #[test]
    fn premium_then_round_trip() {
        let fares = FareEstimator::default();
        let booked = fares.estimate_booking(600.0, TransportMode::Plane, true, TransportMode::Plane);
        assert_eq!(booked.price, 2970.0);
    }

    #[test]
    fn zero_distance_is_free_and_instant() {
        let fares = FareEstimator::default();
        let est = fares.estimate(0.0, TransportMode::Taxi, true);
        assert_eq!(est.duration_minutes, 0);
        assert_eq!(est.price, 0.0);
    }
}
