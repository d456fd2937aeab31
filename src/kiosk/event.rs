//! Events that drive the kiosk.

use crate::model::{IceLevel, ItemId, SugarLevel};
use crate::translate::Language;

/// A customer or operator action, the input of [`Kiosk::apply`](super::Kiosk::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum KioskEvent {
    /// (Re)load the menu from the backend.
    LoadMenu,
    SelectCategory(String),
    /// Open the customizer for a drink.
    Customize(ItemId),
    ToggleTopping(ItemId),
    SetIce(IceLevel),
    SetSugar(SugarLevel),
    CancelCustomization,
    AddToCart,
    /// Change the quantity of the cart line at `index` (0-based).
    UpdateLine { index: usize, delta: i64 },
    ClearCart,
    Checkout,
    KeepBrowsing,
    /// Attach a customer (email) to the order, or detach with an empty string.
    IdentifyCustomer(String),
    OpenRewards,
    Redeem(u32),
    CancelRewards,
    PlaceOrder,
    StartNewOrder,
    SetLanguage(Language),
}

impl KioskEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            KioskEvent::LoadMenu => "load menu",
            KioskEvent::SelectCategory(_) => "select category",
            KioskEvent::Customize(_) => "customize",
            KioskEvent::ToggleTopping(_) => "toggle topping",
            KioskEvent::SetIce(_) => "set ice",
            KioskEvent::SetSugar(_) => "set sugar",
            KioskEvent::CancelCustomization => "cancel customization",
            KioskEvent::AddToCart => "add to cart",
            KioskEvent::UpdateLine { .. } => "update line",
            KioskEvent::ClearCart => "clear cart",
            KioskEvent::Checkout => "checkout",
            KioskEvent::KeepBrowsing => "keep browsing",
            KioskEvent::IdentifyCustomer(_) => "identify customer",
            KioskEvent::OpenRewards => "open rewards",
            KioskEvent::Redeem(_) => "redeem",
            KioskEvent::CancelRewards => "cancel rewards",
            KioskEvent::PlaceOrder => "place order",
            KioskEvent::StartNewOrder => "start new order",
            KioskEvent::SetLanguage(_) => "set language",
        }
    }
}
