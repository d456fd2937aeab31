//! Kiosk screens.

use std::fmt;

/// Screen the kiosk is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Browsing,
    Customizing,
    Checkout,
    Rewards,
    Confirmed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Browsing => "browsing",
            Phase::Customizing => "customizing",
            Phase::Checkout => "checkout",
            Phase::Rewards => "rewards",
            Phase::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}
