//! Quota arithmetic for the external quota gate.
//!
//! The oracle itself never consults this; callers check `may_consult`
//! before a reading and store the decremented ledger after it.

use serde::{Deserialize, Serialize};

use crate::config::QuotaConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    Free,
    Premium,
}

impl MembershipTier {
    pub fn allowance(self, config: &QuotaConfig) -> u32 {
        match self {
            MembershipTier::Free => config.free_plan_quota,
            MembershipTier::Premium => config.premium_plan_quota,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLedger {
    pub tier: MembershipTier,
    pub remaining: u32,
}

impl QuotaLedger {
    pub fn fresh(tier: MembershipTier, config: &QuotaConfig) -> Self {
        Self {
            tier,
            remaining: tier.allowance(config),
        }
    }

    pub fn may_consult(&self) -> bool {
        self.remaining > 0
    }

    /// One reading spent. Stays at zero once exhausted.
    #[must_use]
    pub fn decrement(self) -> Self {
        Self {
            remaining: self.remaining.saturating_sub(1),
            ..self
        }
    }

    /// Only free members are warned about running low.
    pub fn is_low(&self, config: &QuotaConfig) -> bool {
        self.tier == MembershipTier::Free && self.remaining <= config.low_quota_threshold
    }

    /// Switch tier and reset the allowance to the new tier's quota.
    #[must_use]
    pub fn upgrade(self, tier: MembershipTier, config: &QuotaConfig) -> Self {
        Self::fresh(tier, config)
    }
}
