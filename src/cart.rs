//! In-memory cart of order lines.

use thiserror::Error;

use crate::model::{ItemId, LineKey, OrderLine, Selection};

/// Errors raised by cart validation. The cart is left untouched when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("topping {0} cannot be ordered on its own")]
    ToppingAsBase(ItemId),
}

/// Ordered list of order lines, in first-add order.
///
/// No two lines share a [`LineKey`] and every line has a quantity of at least 1.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<OrderLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of drinks in the cart, counting quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.qty)).sum()
    }

    pub fn get(&self, key: &LineKey) -> Option<&OrderLine> {
        self.lines.iter().find(|l| &l.key == key)
    }

    /// Add one unit of a selection, merging into an existing line with the same key.
    pub fn add(&mut self, selection: Selection) -> LineKey {
        self.merge(selection, 1)
    }

    /// Add `qty` units of a selection at once.
    pub fn add_quantity(&mut self, selection: Selection, qty: u32) -> Result<LineKey, CartError> {
        if qty == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if selection.item.is_topping {
            return Err(CartError::ToppingAsBase(selection.item.id));
        }
        Ok(self.merge(selection, qty))
    }

    /// Change a line's quantity by `delta`. Lines that drop to zero are removed;
    /// unknown keys are ignored.
    pub fn update_qty(&mut self, key: &LineKey, delta: i64) {
        let Some(pos) = self.position(key) else {
            return;
        };

        let next = i64::from(self.lines[pos].qty).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].qty = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    /// Remove a line entirely. Returns the removed line, if any.
    pub fn remove(&mut self, key: &LineKey) -> Option<OrderLine> {
        let pos = self.position(key)?;
        Some(self.lines.remove(pos))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Empty the cart and hand back its lines.
    pub fn take(&mut self) -> Vec<OrderLine> {
        std::mem::take(&mut self.lines)
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|l| &l.key == key)
    }

    fn merge(&mut self, selection: Selection, qty: u32) -> LineKey {
        let key = selection.key();
        match self.position(&key) {
            Some(pos) => {
                let line = &mut self.lines[pos];
                line.qty = line.qty.saturating_add(qty);
            }
            None => self.lines.push(OrderLine::new(selection, qty)),
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;
    use crate::model::{IceLevel, MenuItem};

    fn classic() -> MenuItem {
        MenuItem::drink("1", "Classic Milk Tea", Amount::from_cents(450), "Milk Tea")
    }

    fn taro() -> MenuItem {
        MenuItem::drink("2", "Taro Milk Tea", Amount::from_cents(500), "Milk Tea")
    }

    fn honey() -> MenuItem {
        MenuItem::topping("t1", "Honey Boba", Amount::from_cents(75))
    }

    fn jelly() -> MenuItem {
        MenuItem::topping("t2", "Crystal Jelly", Amount::from_cents(65))
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn same_selection_merges_into_one_line() {
        let mut cart = Cart::new();
        cart.add(Selection::plain(classic()).with_toppings([honey(), jelly()]));
        cart.add(Selection::plain(classic()).with_toppings([jelly(), honey()]));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].qty, 2);
        // first-picked order is kept for display
        assert_eq!(cart.lines()[0].toppings[0].name, "Honey Boba");
    }

    #[test]
    fn different_customizations_get_separate_lines() {
        let mut cart = Cart::new();
        cart.add(Selection::plain(classic()));
        cart.add(Selection::plain(classic()).with_toppings([honey()]));
        cart.add(Selection::plain(classic()).with_ice(IceLevel::Light));

        assert_eq!(cart.lines().len(), 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn lines_keep_first_add_order() {
        let mut cart = Cart::new();
        cart.add(Selection::plain(taro()));
        cart.add(Selection::plain(classic()));
        cart.add(Selection::plain(taro()));

        let names: Vec<_> = cart.lines().iter().map(|l| l.item.name.as_str()).collect();
        assert_eq!(names, ["Taro Milk Tea", "Classic Milk Tea"]);
    }

    #[test]
    fn update_qty_adjusts_quantity() {
        let mut cart = Cart::new();
        let key = cart.add(Selection::plain(classic()));
        cart.update_qty(&key, 2);
        assert_eq!(cart.get(&key).unwrap().qty, 3);
        cart.update_qty(&key, -1);
        assert_eq!(cart.get(&key).unwrap().qty, 2);
    }

    #[test]
    fn update_qty_to_zero_removes_line() {
        let mut cart = Cart::new();
        let key = cart.add(Selection::plain(classic()));
        cart.add(Selection::plain(classic()));
        cart.update_qty(&key, -2);
        assert!(cart.is_empty());
    }

    #[test]
    fn update_qty_below_zero_removes_line() {
        let mut cart = Cart::new();
        let key = cart.add(Selection::plain(classic()));
        cart.update_qty(&key, -10);
        assert!(cart.get(&key).is_none());
    }

    #[test]
    fn update_qty_unknown_key_is_noop() {
        let mut cart = Cart::new();
        cart.add(Selection::plain(classic()));
        let missing = Selection::plain(taro()).key();
        cart.update_qty(&missing, -1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn update_qty_extreme_deltas_clamp() {
        let mut cart = Cart::new();
        let key = cart.add(Selection::plain(classic()));

        cart.update_qty(&key, i64::MAX);
        assert_eq!(cart.get(&key).unwrap().qty, u32::MAX);
        cart.update_qty(&key, i64::MAX);
        assert_eq!(cart.get(&key).unwrap().qty, u32::MAX);

        cart.update_qty(&key, i64::MIN);
        assert!(cart.get(&key).is_none());
    }

    #[test]
    fn item_count_does_not_wrap_past_u32() {
        let mut cart = Cart::new();
        let classic_key = cart.add(Selection::plain(classic()));
        let taro_key = cart.add(Selection::plain(taro()));
        cart.update_qty(&classic_key, i64::from(u32::MAX));
        cart.update_qty(&taro_key, i64::from(u32::MAX));

        assert_eq!(cart.item_count(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn add_quantity_rejects_zero() {
        let mut cart = Cart::new();
        let result = cart.add_quantity(Selection::plain(classic()), 0);
        assert_eq!(result, Err(CartError::ZeroQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_quantity_rejects_topping_as_base() {
        let mut cart = Cart::new();
        let result = cart.add_quantity(Selection::plain(honey()), 1);
        assert_eq!(result, Err(CartError::ToppingAsBase(ItemId::new("t1"))));
    }

    #[test]
    fn add_quantity_merges() {
        let mut cart = Cart::new();
        let key = cart.add_quantity(Selection::plain(classic()), 3).unwrap();
        cart.add(Selection::plain(classic()));
        assert_eq!(cart.get(&key).unwrap().qty, 4);
    }

    #[test]
    fn remove_and_take() {
        let mut cart = Cart::new();
        let key = cart.add(Selection::plain(classic()));
        cart.add(Selection::plain(taro()));

        let removed = cart.remove(&key).unwrap();
        assert_eq!(removed.item.name, "Classic Milk Tea");
        assert!(cart.remove(&key).is_none());

        let rest = cart.take();
        assert_eq!(rest.len(), 1);
        assert!(cart.is_empty());
    }
}
