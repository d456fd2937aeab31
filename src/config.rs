//! Kiosk configuration.

use crate::api::DEFAULT_API_URL;
use crate::pricing::{Pricing, RoundingPolicy, TAX_RATE, TaxRate};

#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// Base url of the backend, e.g. `https://abra-backend.vercel.app/api`.
    pub api_url: String,
    pub tax_rate: TaxRate,
    pub rounding: RoundingPolicy,
    /// Ask the backend for stock before a customized drink enters the cart.
    pub stock_check: bool,
}

impl KioskConfig {
    /// Settings of the staff-operated register, which floors every amount to the cent.
    pub fn employee() -> Self {
        Self {
            rounding: RoundingPolicy::FloorToCent,
            ..Self::default()
        }
    }

    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.tax_rate, self.rounding)
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            tax_rate: TAX_RATE,
            rounding: RoundingPolicy::Exact,
            stock_check: false,
        }
    }
}
