//! Error types for the kiosk flow.

use thiserror::Error;

use super::Phase;
use crate::api::ApiError;
use crate::cart::CartError;
use crate::model::ItemId;

/// Error returned by [`Kiosk`](super::Kiosk) actions. Kiosk state is unchanged
/// whenever one is returned.
#[derive(Debug, Error)]
pub enum KioskError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error("cart is empty")]
    EmptyCart,

    #[error("no customer identified")]
    NoCustomer,

    #[error("customer {0} has no rewards available")]
    NoRewards(String),

    #[error("item {0} is not on the menu")]
    UnknownItem(ItemId),

    #[error("item {0} is not a drink")]
    NotADrink(ItemId),

    #[error("item {0} is not a topping")]
    NotATopping(ItemId),

    #[error("no cart line at position {0}")]
    UnknownLine(usize),

    #[error("{item} is out of stock: {ingredient} needs {needed}, {available} available")]
    OutOfStock {
        item: String,
        ingredient: String,
        needed: f64,
        available: f64,
    },

    #[error("translator is not ready")]
    TranslatorNotReady,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
