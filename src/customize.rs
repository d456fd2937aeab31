//! Drink customization state held while the customer picks add-ons.

use crate::model::{IceLevel, MenuItem, Selection, SugarLevel};

/// Topping, ice and sugar choices for the drink being customized.
///
/// Every field goes back to its default on [`Customizer::reset`] and
/// [`Customizer::finish`], so nothing leaks into the next drink.
#[derive(Debug, Clone, Default)]
pub struct Customizer {
    drink: Option<MenuItem>,
    toppings: Vec<MenuItem>,
    ice: IceLevel,
    sugar: SugarLevel,
}

impl Customizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start customizing `drink` from a clean slate.
    pub fn begin(&mut self, drink: MenuItem) {
        self.reset();
        self.drink = Some(drink);
    }

    pub fn drink(&self) -> Option<&MenuItem> {
        self.drink.as_ref()
    }

    pub fn toppings(&self) -> &[MenuItem] {
        &self.toppings
    }

    pub fn ice(&self) -> IceLevel {
        self.ice
    }

    pub fn sugar(&self) -> SugarLevel {
        self.sugar
    }

    pub fn is_selected(&self, topping: &MenuItem) -> bool {
        self.toppings.iter().any(|t| t.id == topping.id)
    }

    /// Add the topping if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, topping: MenuItem) -> bool {
        if let Some(pos) = self.toppings.iter().position(|t| t.id == topping.id) {
            self.toppings.remove(pos);
            false
        } else {
            self.toppings.push(topping);
            true
        }
    }

    pub fn set_ice(&mut self, ice: IceLevel) {
        self.ice = ice;
    }

    pub fn set_sugar(&mut self, sugar: SugarLevel) {
        self.sugar = sugar;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the selection for the cart and reset. `None` when no drink was picked.
    pub fn finish(&mut self) -> Option<Selection> {
        let state = std::mem::take(self);
        let drink = state.drink?;
        Some(
            Selection::plain(drink)
                .with_toppings(state.toppings)
                .with_ice(state.ice)
                .with_sugar(state.sugar),
        )
    }
}
