use boba_kiosk::api::OfflineApi;
use boba_kiosk::model::{IceLevel, SugarLevel};
use boba_kiosk::{Amount, Cart, Kiosk, KioskConfig, KioskEvent, Menu, MenuItem, Pricing, Selection};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Generates customized drinks over the sample menu.
///
/// Choices cycle independently (drink, topping subset, ice, sugar), so the
/// number of distinct cart lines is bounded and repeats merge into them.
pub struct SelectionGenerator {
    drinks: Vec<MenuItem>,
    toppings: Vec<MenuItem>,
    remaining: u32,
    step: usize,
}

impl SelectionGenerator {
    pub fn new(count: u32) -> Self {
        let menu = Menu::fallback();
        Self {
            drinks: menu.drinks().cloned().collect(),
            toppings: menu.toppings().cloned().collect(),
            remaining: count,
            step: 0,
        }
    }
}

impl Iterator for SelectionGenerator {
    type Item = Selection;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let step = self.step;
        self.step += 1;

        let drink = self.drinks[step % self.drinks.len()].clone();
        // topping subset from the low bits: none, first, second, both
        let mask = (step / self.drinks.len()) % (1 << self.toppings.len());
        let toppings = self
            .toppings
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, t)| t.clone());

        Some(
            Selection::plain(drink)
                .with_toppings(toppings)
                .with_ice(IceLevel::ALL[step % IceLevel::ALL.len()])
                .with_sugar(SugarLevel::ALL[step % SugarLevel::ALL.len()]),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for SelectionGenerator {}

fn bench_cart_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart_add");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut cart = Cart::new();
                for selection in SelectionGenerator::new(count) {
                    black_box(cart.add(selection));
                }
                cart
            });
        });
    }

    group.finish();
}

fn bench_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("totals");

    let mut cart = Cart::new();
    for selection in SelectionGenerator::new(10_000) {
        cart.add(selection);
    }

    for (label, config) in [("exact", KioskConfig::default()), ("floor", KioskConfig::employee())] {
        let pricing: Pricing = config.pricing();
        group.bench_function(label, |b| {
            b.iter(|| black_box(pricing.cart_totals(black_box(&cart), Amount::from_cents(200))));
        });
    }

    group.finish();
}

fn bench_kiosk_orders(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("kiosk_orders");

    for orders in [100u32, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(orders), &orders, |b, &orders| {
            b.iter(|| {
                runtime.block_on(async {
                    let api = OfflineApi::new(Menu::fallback().items().to_vec());
                    let mut kiosk = Kiosk::new(api, KioskConfig::default());
                    kiosk.load_menu().await;
                    for _ in 0..orders {
                        for event in [
                            KioskEvent::Customize("1".into()),
                            KioskEvent::ToggleTopping("t1".into()),
                            KioskEvent::AddToCart,
                            KioskEvent::Checkout,
                            KioskEvent::PlaceOrder,
                            KioskEvent::StartNewOrder,
                        ] {
                            let _ = black_box(kiosk.apply(event).await);
                        }
                    }
                    kiosk.receipts().len()
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cart_add, bench_totals, bench_kiosk_orders);
criterion_main!(benches);
