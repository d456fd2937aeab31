//! Kiosk ordering flow.
//!
//! The kiosk owns the menu, cart, customizer and loyalty cache, and moves
//! between phases (browsing, customizing, checkout, rewards, confirmed) in
//! response to events. Backend calls go through a [`KioskApi`]; a failed call
//! leaves the kiosk exactly as it was before the action.

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::api::KioskApi;
use crate::api::wire::{OrderRequest, RedeemRequest};
use crate::cart::Cart;
use crate::config::KioskConfig;
use crate::customize::Customizer;
use crate::loyalty::{Discount, LoyaltyAccount, clamp_redeem_count};
use crate::menu::{Category, Menu};
use crate::model::{IceLevel, ItemId, LineKey, MenuItem, OrderLine, SugarLevel};
use crate::pricing::{Pricing, Totals};
use crate::translate::{Language, NoopTranslator, Translator};

mod error;
pub use error::KioskError;

mod event;
pub use event::KioskEvent;

mod phase;
pub use phase::Phase;

/// Shown when the live menu could not be fetched.
pub const FALLBACK_NOTICE: &str = "Unable to load live menu. Showing sample items.";

/// Attached to a receipt when the order went through but loyalty did not.
pub const LOYALTY_WARNING: &str = "Order placed, but loyalty points could not be updated.";

const REDEEM_REASON: &str = "Kiosk reward redemption";

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub order_id: i64,
    pub customer: Option<String>,
    pub lines: Vec<OrderLine>,
    pub totals: Totals,
    pub warning: Option<String>,
}

/// The kiosk state machine.
pub struct Kiosk<A> {
    api: A,
    config: KioskConfig,
    pricing: Pricing,
    menu: Menu,
    category: Category,
    cart: Cart,
    customizer: Customizer,
    phase: Phase,
    customer: Option<String>,
    /// Read-through cache of the customer's account, refreshed after each mutation
    loyalty: Option<LoyaltyAccount>,
    discount: Discount,
    language: Language,
    translator: Box<dyn Translator>,
    notice: Option<String>,
    receipts: Vec<Receipt>,
}

/// Public API
impl<A: KioskApi> Kiosk<A> {
    pub fn new(api: A, config: KioskConfig) -> Self {
        Self {
            api,
            pricing: config.pricing(),
            config,
            menu: Menu::default(),
            category: Category::All,
            cart: Cart::new(),
            customizer: Customizer::new(),
            phase: Phase::Browsing,
            customer: None,
            loyalty: None,
            discount: Discount::default(),
            language: Language::default(),
            translator: Box::new(NoopTranslator),
            notice: None,
            receipts: Vec::new(),
        }
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Run the kiosk over a stream of events.
    pub async fn run(&mut self, mut stream: impl Stream<Item = KioskEvent> + Unpin) {
        while let Some(event) = stream.next().await {
            // a rejected action must not stop the kiosk, the result is already logged
            let _ = self.apply(event).await;
        }
    }

    /// Apply a single event on top of the current kiosk state.
    pub async fn apply(&mut self, event: KioskEvent) -> Result<(), KioskError> {
        let action = event.name();
        let result = self.dispatch(event).await;
        self.log_result(action, &result);
        result
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Drinks of the selected category.
    pub fn visible_drinks(&self) -> Vec<&MenuItem> {
        self.menu.filter(&self.category).collect()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn customizer(&self) -> &Customizer {
        &self.customizer
    }

    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    pub fn loyalty(&self) -> Option<&LoyaltyAccount> {
        self.loyalty.as_ref()
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Message about degraded operation, such as running on the sample menu.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Orders placed so far, oldest first.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn totals(&self) -> Totals {
        self.pricing.cart_totals(&self.cart, self.discount.applied)
    }

    /// Fetch the menu, falling back to the sample menu if the backend fails.
    pub async fn load_menu(&mut self) {
        match self.api.fetch_menu().await {
            Ok(items) => {
                info!(items = items.len(), "menu loaded");
                self.menu = Menu::new(items);
                self.notice = None;
            }
            Err(e) => {
                warn!(reason = %e, "falling back to sample menu");
                self.menu = Menu::fallback();
                self.notice = Some(FALLBACK_NOTICE.to_string());
            }
        }
    }

    pub fn select_category(&mut self, name: &str) {
        self.category = Category::parse(name);
    }

    /// Browsing -> Customizing for a drink on the menu.
    pub fn customize(&mut self, item: &ItemId) -> Result<(), KioskError> {
        self.require(&[Phase::Browsing], "customize")?;
        let drink = self.menu_item(item)?;
        if drink.is_topping {
            return Err(KioskError::NotADrink(item.clone()));
        }
        self.customizer.begin(drink.clone());
        self.phase = Phase::Customizing;
        Ok(())
    }

    /// Returns whether the topping is selected afterwards.
    pub fn toggle_topping(&mut self, item: &ItemId) -> Result<bool, KioskError> {
        self.require(&[Phase::Customizing], "toggle topping")?;
        let topping = self.menu_item(item)?;
        if !topping.is_topping {
            return Err(KioskError::NotATopping(item.clone()));
        }
        Ok(self.customizer.toggle(topping.clone()))
    }

    pub fn set_ice(&mut self, ice: IceLevel) -> Result<(), KioskError> {
        self.require(&[Phase::Customizing], "set ice")?;
        self.customizer.set_ice(ice);
        Ok(())
    }

    pub fn set_sugar(&mut self, sugar: SugarLevel) -> Result<(), KioskError> {
        self.require(&[Phase::Customizing], "set sugar")?;
        self.customizer.set_sugar(sugar);
        Ok(())
    }

    /// Customizing -> Browsing, discarding the customization.
    pub fn cancel_customization(&mut self) -> Result<(), KioskError> {
        self.require(&[Phase::Customizing], "cancel customization")?;
        self.customizer.reset();
        self.phase = Phase::Browsing;
        Ok(())
    }

    /// Customizing -> Browsing, committing the customized drink to the cart.
    ///
    /// With stock checks enabled the backend must confirm the drink can be made
    /// in the total quantity the cart would then hold.
    pub async fn add_to_cart(&mut self) -> Result<LineKey, KioskError> {
        self.require(&[Phase::Customizing], "add to cart")?;
        let drink = self
            .customizer
            .drink()
            .cloned()
            .ok_or(KioskError::InvalidTransition {
                action: "add to cart",
                phase: self.phase,
            })?;

        if self.config.stock_check {
            let in_cart: u64 = self
                .cart
                .lines()
                .iter()
                .filter(|l| l.item.id == drink.id)
                .map(|l| u64::from(l.qty))
                .sum();
            let wanted = u32::try_from(in_cart + 1).unwrap_or(u32::MAX);
            let reply = self.api.check_stock(&drink.id, wanted).await?;
            if !reply.ok {
                return Err(KioskError::OutOfStock {
                    item: drink.name,
                    ingredient: reply.ingredient.unwrap_or_default(),
                    needed: reply.needed.unwrap_or_default(),
                    available: reply.available.unwrap_or_default(),
                });
            }
        }

        let selection = self
            .customizer
            .finish()
            .ok_or(KioskError::InvalidTransition {
                action: "add to cart",
                phase: self.phase,
            })?;
        let key = self.cart.add(selection);
        self.phase = Phase::Browsing;
        Ok(key)
    }

    /// Change a line's quantity; lines reaching zero disappear.
    pub fn update_qty(&mut self, key: &LineKey, delta: i64) -> Result<(), KioskError> {
        self.require(&[Phase::Browsing, Phase::Checkout], "update quantity")?;
        self.cart.update_qty(key, delta);
        if self.cart.is_empty() {
            self.discount = Discount::default();
        }
        Ok(())
    }

    /// Empty the cart and drop any discount, returning to browsing.
    pub fn clear_cart(&mut self) -> Result<(), KioskError> {
        self.require(&[Phase::Browsing, Phase::Checkout], "clear cart")?;
        self.cart.clear();
        self.discount = Discount::default();
        self.phase = Phase::Browsing;
        Ok(())
    }

    pub fn checkout(&mut self) -> Result<(), KioskError> {
        self.require(&[Phase::Browsing], "checkout")?;
        if self.cart.is_empty() {
            return Err(KioskError::EmptyCart);
        }
        self.phase = Phase::Checkout;
        Ok(())
    }

    pub fn keep_browsing(&mut self) -> Result<(), KioskError> {
        self.require(&[Phase::Checkout], "keep browsing")?;
        self.phase = Phase::Browsing;
        Ok(())
    }

    /// Attach a customer to the order and load their loyalty account.
    ///
    /// An empty identity detaches the customer. Switching customers drops any
    /// discount redeemed by the previous one. A loyalty lookup failure is only
    /// logged; rewards will retry it.
    pub async fn identify_customer(&mut self, customer: &str) -> Result<(), KioskError> {
        self.require(&[Phase::Browsing, Phase::Checkout], "identify customer")?;
        let customer = customer.trim();
        if self.customer.as_deref() != Some(customer) {
            self.discount = Discount::default();
        }
        if customer.is_empty() {
            self.customer = None;
            self.loyalty = None;
            return Ok(());
        }

        self.customer = Some(customer.to_string());
        self.loyalty = match self.api.fetch_loyalty_account(customer).await {
            Ok(account) => Some(account),
            Err(e) => {
                warn!(customer, reason = %e, "loyalty account unavailable");
                None
            }
        };
        Ok(())
    }

    /// Re-read the customer's loyalty account.
    pub async fn refresh_loyalty(&mut self) -> Result<&LoyaltyAccount, KioskError> {
        let customer = self.customer.clone().ok_or(KioskError::NoCustomer)?;
        let account = self.api.fetch_loyalty_account(&customer).await?;
        Ok(self.loyalty.insert(account))
    }

    pub fn open_rewards(&mut self) -> Result<(), KioskError> {
        self.require(&[Phase::Checkout], "open rewards")?;
        if self.cart.is_empty() {
            return Err(KioskError::EmptyCart);
        }
        if self.customer.is_none() {
            return Err(KioskError::NoCustomer);
        }
        self.phase = Phase::Rewards;
        Ok(())
    }

    pub fn cancel_rewards(&mut self) -> Result<(), KioskError> {
        self.require(&[Phase::Rewards], "cancel rewards")?;
        self.phase = Phase::Checkout;
        Ok(())
    }

    /// Redeem up to `requested` reward blocks against the discounted subtotal and
    /// return to checkout with the discount applied.
    ///
    /// The count is clamped to `[1, rewards available]`. Redeeming again adds
    /// to the discount already applied.
    pub async fn redeem(&mut self, requested: u32) -> Result<Discount, KioskError> {
        self.require(&[Phase::Rewards], "redeem")?;
        let customer = self.customer.clone().ok_or(KioskError::NoCustomer)?;

        let available = match self.loyalty.as_ref().map(|a| a.rewards_available) {
            Some(available) => available,
            None => self.refresh_loyalty().await?.rewards_available,
        };
        let count = clamp_redeem_count(requested, available)
            .ok_or_else(|| KioskError::NoRewards(customer.clone()))?;

        let request = RedeemRequest {
            customer: &customer,
            count,
            subtotal: self.totals().discounted_subtotal,
            reason: REDEEM_REASON,
        };
        let reply = self.api.redeem_loyalty_points(&request).await?;

        self.discount.applied += reply.discount;
        self.discount.rewards_used += reply.rewards_used;
        self.phase = Phase::Checkout;
        info!(
            customer = %customer,
            rewards = reply.rewards_used,
            discount = %reply.discount,
            "rewards redeemed"
        );

        if let Err(e) = self.refresh_loyalty().await {
            warn!(customer = %customer, reason = %e, "loyalty refresh after redeem failed");
        }
        Ok(self.discount)
    }

    /// Submit the cart as an order and credit loyalty points.
    ///
    /// Loyalty failures after a successful submission do not fail the order;
    /// the receipt carries a warning instead.
    pub async fn place_order(&mut self) -> Result<Receipt, KioskError> {
        self.require(&[Phase::Checkout], "place order")?;
        if self.cart.is_empty() {
            return Err(KioskError::EmptyCart);
        }

        let totals = self.totals();
        let request = OrderRequest::new(self.cart.lines(), &totals, self.customer.as_deref());
        let confirmation = self.api.submit_order(&request).await?;
        info!(
            order = confirmation.order_id,
            total = %totals.total,
            "order submitted"
        );

        let mut warning = None;
        if let Some(customer) = self.customer.clone() {
            match self
                .api
                .earn_loyalty_points(&customer, totals.discounted_subtotal)
                .await
            {
                Ok(reply) => {
                    info!(customer = %customer, points = reply.points_earned, "loyalty points earned");
                    if let Err(e) = self.refresh_loyalty().await {
                        warn!(customer = %customer, reason = %e, "loyalty refresh after order failed");
                    }
                }
                Err(e) => {
                    warn!(customer = %customer, reason = %e, "loyalty points not credited");
                    warning = Some(LOYALTY_WARNING.to_string());
                }
            }
        }

        let receipt = Receipt {
            order_id: confirmation.order_id,
            customer: self.customer.clone(),
            lines: self.cart.take(),
            totals,
            warning,
        };
        self.discount = Discount::default();
        self.phase = Phase::Confirmed;
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }

    /// Confirmed -> Browsing for the next customer.
    pub fn start_new_order(&mut self) -> Result<(), KioskError> {
        self.require(&[Phase::Confirmed], "start new order")?;
        self.customer = None;
        self.loyalty = None;
        self.customizer.reset();
        self.phase = Phase::Browsing;
        Ok(())
    }

    /// Switch the display language. Switching to the active language is a no-op.
    pub fn set_language(&mut self, language: Language) -> Result<(), KioskError> {
        if !self.translator.is_ready() {
            return Err(KioskError::TranslatorNotReady);
        }
        if self.language != language {
            self.translator.set_language(language);
            self.language = language;
        }
        Ok(())
    }
}

/// Private API
impl<A: KioskApi> Kiosk<A> {
    async fn dispatch(&mut self, event: KioskEvent) -> Result<(), KioskError> {
        match event {
            KioskEvent::LoadMenu => {
                self.load_menu().await;
                Ok(())
            }
            KioskEvent::SelectCategory(name) => {
                self.select_category(&name);
                Ok(())
            }
            KioskEvent::Customize(item) => self.customize(&item),
            KioskEvent::ToggleTopping(item) => self.toggle_topping(&item).map(|_| ()),
            KioskEvent::SetIce(ice) => self.set_ice(ice),
            KioskEvent::SetSugar(sugar) => self.set_sugar(sugar),
            KioskEvent::CancelCustomization => self.cancel_customization(),
            KioskEvent::AddToCart => self.add_to_cart().await.map(|_| ()),
            KioskEvent::UpdateLine { index, delta } => {
                let key = self
                    .cart
                    .lines()
                    .get(index)
                    .map(|l| l.key.clone())
                    .ok_or(KioskError::UnknownLine(index))?;
                self.update_qty(&key, delta)
            }
            KioskEvent::ClearCart => self.clear_cart(),
            KioskEvent::Checkout => self.checkout(),
            KioskEvent::KeepBrowsing => self.keep_browsing(),
            KioskEvent::IdentifyCustomer(customer) => self.identify_customer(&customer).await,
            KioskEvent::OpenRewards => self.open_rewards(),
            KioskEvent::Redeem(count) => self.redeem(count).await.map(|_| ()),
            KioskEvent::CancelRewards => self.cancel_rewards(),
            KioskEvent::PlaceOrder => self.place_order().await.map(|_| ()),
            KioskEvent::StartNewOrder => self.start_new_order(),
            KioskEvent::SetLanguage(language) => self.set_language(language),
        }
    }

    /// Small helper to log `apply` results
    fn log_result(&self, action: &str, result: &Result<(), KioskError>) {
        match result {
            Ok(()) => {
                info!(
                    phase = %self.phase,
                    items = self.cart.item_count(),
                    "{action} applied"
                );
            }
            Err(e) => {
                info!(
                    phase = %self.phase,
                    reason = %e,
                    "{action} skipped"
                );
            }
        }
    }

    fn require(&self, allowed: &[Phase], action: &'static str) -> Result<(), KioskError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(KioskError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    fn menu_item(&self, item: &ItemId) -> Result<&MenuItem, KioskError> {
        self.menu
            .get(item)
            .ok_or_else(|| KioskError::UnknownItem(item.clone()))
    }
}
