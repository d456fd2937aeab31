pub mod amount;
pub mod api;
pub mod cart;
pub mod config;
pub mod csv;
pub mod customize;
pub mod kiosk;
pub mod loyalty;
pub mod menu;
pub mod model;
pub mod pricing;
pub mod translate;

pub use amount::Amount;
pub use cart::Cart;
pub use config::KioskConfig;
pub use kiosk::{Kiosk, KioskError, KioskEvent, Phase, Receipt};
pub use menu::Menu;
pub use model::{ItemId, LineKey, MenuItem, OrderLine, Selection};
pub use pricing::{Pricing, Totals};
