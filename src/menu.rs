//! Menu browsing: drink/topping partition and category filtering.

use std::fmt;

use crate::Amount;
use crate::model::{ItemId, MenuItem};

/// Category sentinel shown before every real category.
pub const ALL_CATEGORIES: &str = "All";

/// Category selection. Comparison is case-insensitive on the whole name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Category::All
        } else {
            Category::Named(name.to_string())
        }
    }

    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Category::All => true,
            Category::Named(wanted) => item
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == wanted.to_lowercase()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str(ALL_CATEGORIES),
            Category::Named(name) => f.write_str(name),
        }
    }
}

/// The item list fetched from the backend. Everything else is derived from it.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Sample menu shown when the live menu cannot be loaded.
    pub fn fallback() -> Self {
        Self::new(vec![
            MenuItem::drink("1", "Classic Milk Tea", Amount::from_cents(450), "Milk Tea"),
            MenuItem::drink("2", "Taro Milk Tea", Amount::from_cents(500), "Milk Tea"),
            MenuItem::drink("3", "Brown Sugar Boba", Amount::from_cents(550), "Specialty"),
            MenuItem::drink("4", "Matcha Latte", Amount::from_cents(525), "Latte"),
            MenuItem::topping("t1", "Honey Boba", Amount::from_cents(75)),
            MenuItem::topping("t2", "Crystal Jelly", Amount::from_cents(65)),
        ])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|it| &it.id == id)
    }

    pub fn drinks(&self) -> impl Iterator<Item = &MenuItem> + '_ {
        self.items.iter().filter(|it| !it.is_topping)
    }

    pub fn toppings(&self) -> impl Iterator<Item = &MenuItem> + '_ {
        self.items.iter().filter(|it| it.is_topping)
    }

    /// `All` followed by each distinct drink category, in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for category in self.drinks().filter_map(|it| it.category.as_deref()) {
            if !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
        categories
    }

    pub fn filter<'a>(&'a self, category: &'a Category) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.drinks().filter(move |it| category.matches(it))
    }
}
