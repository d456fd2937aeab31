//! In-process backend serving a fixed menu.
//!
//! Every drink is in stock, orders get sequential ids, and loyalty calls
//! report the service as unavailable.

use std::sync::atomic::{AtomicI64, Ordering};

use super::wire::{EarnReply, OrderConfirmation, OrderRequest, RedeemReply, RedeemRequest, StockReply};
use super::{ApiError, KioskApi};
use crate::Amount;
use crate::loyalty::LoyaltyAccount;
use crate::model::{ItemId, MenuItem};

/// Stand-in backend serving a fixed menu.
///
/// Every item is in stock and orders are numbered sequentially from 1. There
/// is no loyalty ledger, so loyalty calls fail as unavailable.
#[derive(Debug)]
pub struct OfflineApi {
    menu: Vec<MenuItem>,
    next_order: AtomicI64,
}

impl OfflineApi {
    pub fn new(menu: Vec<MenuItem>) -> Self {
        Self {
            menu,
            next_order: AtomicI64::new(1),
        }
    }
}

impl KioskApi for OfflineApi {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        Ok(self.menu.clone())
    }

    async fn check_stock(&self, _item: &ItemId, _qty: u32) -> Result<StockReply, ApiError> {
        Ok(StockReply::in_stock())
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, ApiError> {
        Ok(OrderConfirmation {
            order_id: self.next_order.fetch_add(1, Ordering::Relaxed),
            subtotal: Some(order.subtotal),
            tax: Some(order.tax),
            total: Some(order.total),
        })
    }

    async fn fetch_loyalty_account(&self, _customer: &str) -> Result<LoyaltyAccount, ApiError> {
        Err(ApiError::Unavailable("loyalty service"))
    }

    async fn earn_loyalty_points(&self, _customer: &str, _amount: Amount) -> Result<EarnReply, ApiError> {
        Err(ApiError::Unavailable("loyalty service"))
    }

    async fn redeem_loyalty_points(&self, _request: &RedeemRequest<'_>) -> Result<RedeemReply, ApiError> {
        Err(ApiError::Unavailable("loyalty service"))
    }
}
