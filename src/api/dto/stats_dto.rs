//! Aggregate statistics DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::aggregates::{ActivityBucket, KpiStats, WalletVolume};

/// Response body for `GET /stats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Events observed in the window.
    pub total_events: u64,
    /// Distinct source addresses in the window.
    pub active_wallets: u64,
    /// Events meeting their token's whale threshold.
    pub whale_events: u64,
    /// Sum of parsed event amounts, saturating.
    pub total_volume: u64,
}

impl From<KpiStats> for StatsResponse {
    fn from(stats: KpiStats) -> Self {
        Self {
            total_events: stats.total_events,
            active_wallets: stats.active_wallets,
            whale_events: stats.whale_events,
            total_volume: stats.total_volume,
        }
    }
}

/// One 2-hour activity bucket.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityBucketDto {
    /// Inclusive bucket start, epoch milliseconds.
    pub bucket_start: i64,
    /// Exclusive bucket end, epoch milliseconds.
    pub bucket_end: i64,
    /// Bid-order events in the bucket.
    pub bids: u64,
    /// Ask-order events in the bucket.
    pub asks: u64,
    /// Share-transfer events in the bucket.
    pub transfers: u64,
    /// Asset-issue events in the bucket.
    pub issues: u64,
    /// Order-removal events in the bucket.
    pub cancels: u64,
    /// All events in the bucket, categorized or not.
    pub total: u64,
    /// Sum of parsed amounts in the bucket, saturating.
    pub volume: u64,
}

impl From<ActivityBucket> for ActivityBucketDto {
    fn from(bucket: ActivityBucket) -> Self {
        Self {
            bucket_start: bucket.bucket_start,
            bucket_end: bucket.bucket_end,
            bids: bucket.bids,
            asks: bucket.asks,
            transfers: bucket.transfers,
            issues: bucket.issues,
            cancels: bucket.cancels,
            total: bucket.total,
            volume: bucket.volume,
        }
    }
}

/// Response body for `GET /stats/activity`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityResponse {
    /// Oldest-first bucket series covering the last 24 hours.
    pub buckets: Vec<ActivityBucketDto>,
}

/// One leaderboard entry for `GET /stats/top-wallets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletVolumeDto {
    /// Source wallet address.
    pub address: String,
    /// Summed parsed amounts, saturating.
    pub volume: u64,
    /// Events the wallet originated in the window.
    pub event_count: u64,
}

impl From<WalletVolume> for WalletVolumeDto {
    fn from(entry: WalletVolume) -> Self {
        Self {
            address: entry.address,
            volume: entry.volume,
            event_count: entry.event_count,
        }
    }
}

/// Response body for `GET /stats/top-wallets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TopWalletsResponse {
    /// Leaderboard, highest volume first.
    pub wallets: Vec<WalletVolumeDto>,
}
