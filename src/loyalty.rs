//! Loyalty accounts and reward discounts.

use serde::{Deserialize, Serialize};

use crate::Amount;

/// A customer's loyalty standing as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    #[serde(alias = "pointsBalance", alias = "points")]
    pub points_balance: u32,
    #[serde(alias = "rewardsAvailable")]
    pub rewards_available: u32,
    #[serde(alias = "rewardValue")]
    pub reward_value: Amount,
    #[serde(default, alias = "pointsToNextReward")]
    pub points_to_next_reward: u32,
}

/// Discount from redeemed rewards, applied to the current order only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Discount {
    pub applied: Amount,
    pub rewards_used: u32,
}

impl Discount {
    pub fn is_empty(&self) -> bool {
        self.rewards_used == 0 && self.applied == Amount::ZERO
    }
}

/// Clamp a requested redemption to `[1, available]`. `None` when nothing can be redeemed.
pub fn clamp_redeem_count(requested: u32, available: u32) -> Option<u32> {
    if available == 0 {
        return None;
    }
    Some(requested.clamp(1, available))
}
