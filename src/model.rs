//! Core domain types for the kiosk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::Amount;

/// Identifier of a menu item.
///
/// The backend hands out numeric ids for drinks and sometimes string ids for
/// toppings (`"t1"`), so both are kept as text. Ids that look numeric go back
/// on the wire as numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ItemId::from(n),
            Raw::Text(s) => ItemId(s),
        })
    }
}

/// A sellable item: either a drink or a topping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    pub price: Amount,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_topping: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl MenuItem {
    pub fn drink(id: impl Into<ItemId>, name: &str, price: Amount, category: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            price,
            category: Some(category.to_string()),
            is_topping: false,
            description: None,
        }
    }

    pub fn topping(id: impl Into<ItemId>, name: &str, price: Amount) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            price,
            category: Some("Toppings".to_string()),
            is_topping: true,
            description: None,
        }
    }
}

/// Highest unit price a menu source may set.
pub const MAX_PRICE: Amount = Amount::from_cents(1_000_000);

/// Error for a menu price that cannot be sold at.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    #[error("price {0} is not a representable amount")]
    NotFinite(f64),
    #[error("price {0} is negative")]
    Negative(f64),
    #[error("price {0} is above the maximum of {max}", max = MAX_PRICE)]
    TooLarge(f64),
}

/// Validate a unit price read from the backend or a menu file.
pub fn menu_price(value: f64) -> Result<Amount, PriceError> {
    let price = Amount::try_from_float(value).ok_or(PriceError::NotFinite(value))?;
    if price.is_negative() {
        return Err(PriceError::Negative(value));
    }
    if price > MAX_PRICE {
        return Err(PriceError::TooLarge(value));
    }
    Ok(price)
}

/// Error for ice or sugar labels that match no known level.
#[derive(Debug, Error)]
#[error("unknown {kind} level '{value}'")]
pub struct LevelParseError {
    kind: &'static str,
    value: String,
}

/// Ice level of a drink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum IceLevel {
    #[serde(rename = "No Ice")]
    None,
    #[serde(rename = "Light Ice")]
    Light,
    #[default]
    #[serde(rename = "Regular Ice")]
    Regular,
    #[serde(rename = "Extra Ice")]
    Extra,
}

impl IceLevel {
    pub const ALL: [IceLevel; 4] = [Self::None, Self::Light, Self::Regular, Self::Extra];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "No Ice",
            Self::Light => "Light Ice",
            Self::Regular => "Regular Ice",
            Self::Extra => "Extra Ice",
        }
    }
}

impl fmt::Display for IceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IceLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| {
                let label = level.label();
                label.eq_ignore_ascii_case(wanted)
                    || label
                        .split_whitespace()
                        .next()
                        .is_some_and(|word| word.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| LevelParseError {
                kind: "ice",
                value: s.to_string(),
            })
    }
}

/// Sugar level of a drink, as a percentage of the standard recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum SugarLevel {
    #[serde(rename = "0%")]
    Zero,
    #[serde(rename = "25%")]
    Quarter,
    #[serde(rename = "50%")]
    Half,
    #[serde(rename = "75%")]
    ThreeQuarters,
    #[default]
    #[serde(rename = "100%")]
    Full,
}

impl SugarLevel {
    pub const ALL: [SugarLevel; 5] = [
        Self::Zero,
        Self::Quarter,
        Self::Half,
        Self::ThreeQuarters,
        Self::Full,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Zero => "0%",
            Self::Quarter => "25%",
            Self::Half => "50%",
            Self::ThreeQuarters => "75%",
            Self::Full => "100%",
        }
    }
}

impl fmt::Display for SugarLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SugarLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_end_matches('%');
        Self::ALL
            .into_iter()
            .find(|level| level.label().trim_end_matches('%') == wanted)
            .ok_or_else(|| LevelParseError {
                kind: "sugar",
                value: s.to_string(),
            })
    }
}

/// Structural identity of a cart line.
///
/// Two selections with the same drink, the same set of toppings (in any order)
/// and the same ice and sugar levels share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub item: ItemId,
    pub toppings: Vec<ItemId>,
    pub ice: IceLevel,
    pub sugar: SugarLevel,
}

/// A fully customized drink, ready to be added to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub item: MenuItem,
    /// Toppings in the order they were picked.
    pub toppings: Vec<MenuItem>,
    pub ice: IceLevel,
    pub sugar: SugarLevel,
}

impl Selection {
    /// A drink with no toppings and default ice and sugar.
    pub fn plain(item: MenuItem) -> Self {
        Self {
            item,
            toppings: Vec::new(),
            ice: IceLevel::default(),
            sugar: SugarLevel::default(),
        }
    }

    pub fn with_toppings(mut self, toppings: impl IntoIterator<Item = MenuItem>) -> Self {
        self.toppings = toppings.into_iter().collect();
        self
    }

    pub fn with_ice(mut self, ice: IceLevel) -> Self {
        self.ice = ice;
        self
    }

    pub fn with_sugar(mut self, sugar: SugarLevel) -> Self {
        self.sugar = sugar;
        self
    }

    pub fn key(&self) -> LineKey {
        let mut toppings: Vec<ItemId> = self.toppings.iter().map(|t| t.id.clone()).collect();
        toppings.sort();
        toppings.dedup();
        LineKey {
            item: self.item.id.clone(),
            toppings,
            ice: self.ice,
            sugar: self.sugar,
        }
    }
}

/// One distinct cart entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub key: LineKey,
    pub item: MenuItem,
    pub toppings: Vec<MenuItem>,
    pub ice: IceLevel,
    pub sugar: SugarLevel,
    pub qty: u32,
}

impl OrderLine {
    pub fn new(selection: Selection, qty: u32) -> Self {
        let key = selection.key();
        Self {
            key,
            item: selection.item,
            toppings: selection.toppings,
            ice: selection.ice,
            sugar: selection.sugar,
            qty,
        }
    }

    /// Human readable customization summary, e.g. `Honey Boba; Light Ice; 50%`.
    pub fn options(&self) -> String {
        let mut parts: Vec<&str> = self.toppings.iter().map(|t| t.name.as_str()).collect();
        parts.push(self.ice.label());
        parts.push(self.sugar.label());
        parts.join("; ")
    }
}
