//! Per-listener revenue ledger
//!
//! Listens are bucketed by subscription state. When money arrives (an ad
//! finishes, a subscription changes, the run ends) the pending revenue is split
//! across the songs of the active bucket in proportion to their listens.

use crate::types::SongId;
use std::collections::BTreeMap;

/// Listen shares accumulated since the last payout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShareBucket {
    shares: BTreeMap<SongId, i64>,
    total: i64,
}

impl ShareBucket {
    fn record(&mut self, song: SongId, listens: i64) {
        *self.shares.entry(song).or_insert(0) += listens;
        self.total += listens;
    }

    pub fn share(&self, song: SongId) -> i64 {
        self.shares.get(&song).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    fn drain(&mut self, revenue: f64) -> Vec<(SongId, f64)> {
        let total = std::mem::take(&mut self.total);
        let shares = std::mem::take(&mut self.shares);
        if total <= 0 {
            return Vec::new();
        }
        shares
            .into_iter()
            .filter(|&(_, share)| share > 0)
            .map(|(song, share)| (song, revenue * share as f64 / total as f64))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueLedger {
    pending_revenue: f64,
    premium: ShareBucket,
    ad_supported: ShareBucket,
}

impl RevenueLedger {
    /// Record `listens` of `song` in the bucket matching the subscription state
    pub fn record(&mut self, premium: bool, song: SongId, listens: i64) {
        self.bucket_mut(premium).record(song, listens);
    }

    pub fn bucket(&self, premium: bool) -> &ShareBucket {
        if premium {
            &self.premium
        } else {
            &self.ad_supported
        }
    }

    fn bucket_mut(&mut self, premium: bool) -> &mut ShareBucket {
        if premium {
            &mut self.premium
        } else {
            &mut self.ad_supported
        }
    }

    pub fn pending_revenue(&self) -> f64 {
        self.pending_revenue
    }

    pub fn set_pending_revenue(&mut self, amount: f64) {
        self.pending_revenue = amount;
    }

    /// Split the pending revenue over the active bucket, then empty it
    ///
    /// Returns the amount owed per song. A bucket without positive listens pays
    /// nothing. Pending revenue is zeroed either way.
    pub fn drain(&mut self, premium: bool) -> Vec<(SongId, f64)> {
        let revenue = std::mem::take(&mut self.pending_revenue);
        self.bucket_mut(premium).drain(revenue)
    }
}
