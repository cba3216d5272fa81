//! Simulated advertisement service.
//!
//! Stands in for a mobile ad SDK: each placement waits a fixed latency and
//! then resolves. Rewarded ads yield a random coin amount. Nothing is fetched.

use crate::config::AdConfig;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;
use thiserror::Error;

/// Coins granted by one completed rewarded ad.
pub const REWARD_RANGE: RangeInclusive<u64> = 5..=14;

/// An interstitial follows every this-many articles read.
pub const INTERSTITIAL_EVERY: u64 = 3;

/// True when the article count just reached a positive multiple of three.
pub fn should_show_interstitial(articles_read: u64) -> bool {
    articles_read > 0 && articles_read % INTERSTITIAL_EVERY == 0
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdError {
    #[error("No ad unit id configured for {0} placement")]
    MissingUnitId(Placement),
    #[error("Ad playback aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Banner,
    Interstitial,
    Rewarded,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Banner => "banner",
            Self::Interstitial => "interstitial",
            Self::Rewarded => "rewarded",
        })
    }
}

/// Latency of each placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdTimings {
    pub banner: Duration,
    pub interstitial: Duration,
    pub rewarded: Duration,
}

impl Default for AdTimings {
    fn default() -> Self {
        Self {
            banner: Duration::from_millis(100),
            interstitial: Duration::from_millis(2000),
            rewarded: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdService {
    units: AdConfig,
    timings: AdTimings,
}

impl AdService {
    pub fn new(units: AdConfig) -> Self {
        Self::with_timings(units, AdTimings::default())
    }

    pub fn with_timings(units: AdConfig, timings: AdTimings) -> Self {
        Self { units, timings }
    }

    pub fn units(&self) -> &AdConfig {
        &self.units
    }

    /// Startup hook mirroring the SDK initialization call.
    pub fn initialize(&self) {
        tracing::info!(app_id = %self.units.app_id, "Ad service initialized");
    }

    pub async fn show_banner(&self) -> Result<(), AdError> {
        let unit = unit_id(&self.units.banner_id, Placement::Banner)?;
        tracing::debug!(unit_id = unit, "Showing banner ad");
        tokio::time::sleep(self.timings.banner).await;
        Ok(())
    }

    pub async fn show_interstitial(&self) -> Result<(), AdError> {
        let unit = unit_id(&self.units.interstitial_id, Placement::Interstitial)?;
        tracing::info!(unit_id = unit, "Showing interstitial ad");
        tokio::time::sleep(self.timings.interstitial).await;
        Ok(())
    }

    /// Plays a rewarded ad and returns the coins it earned.
    pub async fn show_rewarded(&self) -> Result<u64, AdError> {
        let unit = unit_id(&self.units.rewarded_id, Placement::Rewarded)?;
        tracing::info!(unit_id = unit, "Showing rewarded ad");
        tokio::time::sleep(self.timings.rewarded).await;
        let coins = rand::thread_rng().gen_range(REWARD_RANGE);
        tracing::info!(coins, "Rewarded ad completed");
        Ok(coins)
    }
}

fn unit_id(id: &str, placement: Placement) -> Result<&str, AdError> {
    let id = id.trim();
    if id.is_empty() {
        tracing::warn!(%placement, "Ad placement has no unit id");
        return Err(AdError::MissingUnitId(placement));
    }
    Ok(id)
}
