//! Search configuration for the route resolver.

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Number of routes synthesized when the catalog has no match.
    /// With "all modes" the count is spread over the eligible modes,
    /// with at least one route per mode.
    pub synthesized_count: usize,

    /// Relative jitter applied to synthesized distances (0.1 = ±10%).
    pub distance_jitter: f64,

    /// Relative jitter applied to synthesized prices (0.2 = ±20%).
    pub price_jitter: f64,

    /// Maximum passengers accepted in one search.
    pub max_passengers: u32,

    /// Fixed seed for synthesis. `None` seeds from the OS per search.
    pub seed: Option<u64>,
}

impl ResolverConfig {
    /// Same configuration with a fixed synthesis seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            synthesized_count: 3,
            distance_jitter: 0.10,
            price_jitter: 0.20,
            max_passengers: 9,
            seed: None,
        }
    }
}
