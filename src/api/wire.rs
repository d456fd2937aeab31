//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::Amount;
use crate::model::{IceLevel, ItemId, MenuItem, OrderLine, SugarLevel, menu_price};
use crate::pricing::Totals;

/// Turn a raw `/menu` payload into menu items.
///
/// The backend has gone through several schemas, so each field is looked up
/// under every name it has been sent as. Anything that is not an array yields
/// an empty menu. Entries that are not objects, or whose price is negative or
/// out of range, are dropped.
pub fn coerce_menu(payload: Value) -> Vec<MenuItem> {
    let Value::Array(entries) = payload else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(fields) => coerce_item(&fields),
            _ => None,
        })
        .collect()
}

fn coerce_item(fields: &Map<String, Value>) -> Option<MenuItem> {
    let name = first_string(fields, &["name", "title"]).unwrap_or_else(|| "Item".to_string());
    let id = first_present(fields, &["id", "item_id", "uuid"])
        .and_then(id_from_value)
        .unwrap_or_else(|| ItemId::new(name.as_str()));
    let price = match first_present(fields, &["price", "cost"]).and_then(number_from_value) {
        Some(value) => match menu_price(value) {
            Ok(price) => price,
            Err(e) => {
                warn!(item = %id, reason = %e, "dropping menu item");
                return None;
            }
        },
        None => Amount::ZERO,
    };
    let is_topping = first_present(fields, &["is_topping", "isTopping"])
        .map(truthy)
        .unwrap_or(false);

    Some(MenuItem {
        id,
        name,
        price,
        category: first_string(fields, &["category", "type"]),
        is_topping,
        description: first_string(fields, &["description"]),
    })
}

fn first_present<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find(|value| !value.is_null())
}

fn first_string(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    first_present(fields, names).and_then(|v| v.as_str().map(str::to_string))
}

fn id_from_value(value: &Value) -> Option<ItemId> {
    match value {
        Value::Number(n) => Some(ItemId::new(n.to_string())),
        Value::String(s) if !s.is_empty() => Some(ItemId::new(s.as_str())),
        _ => None,
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "t" | "1" | "yes"),
        _ => false,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockRequest<'a> {
    #[serde(rename = "itemId")]
    pub item_id: &'a ItemId,
    pub qty: u32,
}

/// Reply to a stock check. When `ok` is false the other fields name the
/// ingredient that ran short.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockReply {
    pub ok: bool,
    #[serde(default)]
    pub ingredient: Option<String>,
    #[serde(default)]
    pub needed: Option<f64>,
    #[serde(default)]
    pub available: Option<f64>,
}

impl StockReply {
    pub fn in_stock() -> Self {
        Self {
            ok: true,
            ingredient: None,
            needed: None,
            available: None,
        }
    }
}

/// One submitted order line. Toppings are sent as their own lines carrying the
/// quantity of the drink they belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemPayload {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Amount,
    pub is_topping: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ice: Option<IceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugar: Option<SugarLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItemPayload>,
    pub subtotal: Amount,
    pub discount: Amount,
    pub tax: Amount,
    pub total: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

impl OrderRequest {
    pub fn new(lines: &[OrderLine], totals: &Totals, customer: Option<&str>) -> Self {
        let items = lines
            .iter()
            .flat_map(|line| {
                let drink = OrderItemPayload {
                    item_id: line.item.id.clone(),
                    name: line.item.name.clone(),
                    quantity: line.qty,
                    unit_price: line.item.price,
                    is_topping: false,
                    ice: Some(line.ice),
                    sugar: Some(line.sugar),
                };
                let toppings = line.toppings.iter().map(move |t| OrderItemPayload {
                    item_id: t.id.clone(),
                    name: t.name.clone(),
                    quantity: line.qty,
                    unit_price: t.price,
                    is_topping: true,
                    ice: None,
                    sugar: None,
                });
                std::iter::once(drink).chain(toppings)
            })
            .collect();

        Self {
            items,
            subtotal: totals.subtotal,
            discount: totals.discount,
            tax: totals.tax,
            total: totals.total,
            customer: customer.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderConfirmation {
    #[serde(alias = "orderId", alias = "id")]
    pub order_id: i64,
    #[serde(default)]
    pub subtotal: Option<Amount>,
    #[serde(default)]
    pub tax: Option<Amount>,
    #[serde(default)]
    pub total: Option<Amount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedeemRequest<'a> {
    pub customer: &'a str,
    pub count: u32,
    pub subtotal: Amount,
    pub reason: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RedeemReply {
    #[serde(alias = "discountAmount", alias = "discount_amount")]
    pub discount: Amount,
    #[serde(alias = "rewardsUsed")]
    pub rewards_used: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EarnRequest<'a> {
    pub customer: &'a str,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EarnReply {
    #[serde(default, alias = "pointsEarned")]
    pub points_earned: u32,
}
