use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::kiosk::{KioskEvent, Receipt};
use crate::model::{ItemId, MenuItem, PriceError, menu_price};
use crate::pricing::Pricing;

/// Errors that can occur when reading or writing csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: {source}")]
    InvalidPrice { line: usize, source: PriceError },

    #[error("line {line}: unrecognized action '{action}'")]
    UnrecognizedAction { line: usize, action: String },

    #[error("line {line}: {action} missing {field}")]
    MissingField {
        line: usize,
        action: String,
        field: &'static str,
    },

    #[error("line {line}: {action} has invalid value '{value}'")]
    InvalidValue {
        line: usize,
        action: String,
        value: String,
    },

    #[error("failed to write csv row: {0}")]
    Write(csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct MenuRow {
    id: String,
    name: String,
    price: f64,
    category: Option<String>,
    is_topping: Option<bool>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    action: String,
    target: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReceiptRow<'a> {
    order: i64,
    entry: &'a str,
    detail: &'a str,
    qty: Option<u32>,
    amount: String,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Read a menu from a csv file with columns `id,name,price,category,is_topping,description`
pub fn read_menu(path: impl AsRef<Path>) -> Result<Vec<MenuItem>, CsvError> {
    let reader = open(path.as_ref())?;

    reader
        .into_deserialize::<MenuRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let price =
                menu_price(row.price).map_err(|source| CsvError::InvalidPrice { line, source })?;
            Ok(MenuItem {
                id: ItemId::new(row.id),
                name: row.name,
                price,
                category: row.category.filter(|c| !c.is_empty()),
                is_topping: row.is_topping.unwrap_or(false),
                description: row.description.filter(|d| !d.is_empty()),
            })
        })
        .collect()
}

/// Read kiosk events from a csv file with columns `action,target,value`
///
/// Cart lines are numbered from 1 in the file.
pub fn read_session(
    path: &Path,
) -> Result<impl Iterator<Item = Result<KioskEvent, CsvError>> + use<>, CsvError> {
    let reader = open(path)?;

    Ok(reader
        .into_deserialize::<SessionRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_event(line, row)
        }))
}

fn parse_event(line: usize, row: SessionRow) -> Result<KioskEvent, CsvError> {
    let action = row.action.to_ascii_lowercase();
    let target = row.target.filter(|t| !t.is_empty());
    let value = row.value.filter(|v| !v.is_empty());

    let required = |field: Option<String>, name: &'static str| {
        field.ok_or_else(|| CsvError::MissingField {
            line,
            action: action.clone(),
            field: name,
        })
    };
    let invalid = |value: String| CsvError::InvalidValue {
        line,
        action: action.clone(),
        value,
    };

    let event = match action.as_str() {
        "load" => KioskEvent::LoadMenu,
        "category" => KioskEvent::SelectCategory(target.unwrap_or_default()),
        "select" => KioskEvent::Customize(ItemId::new(required(target, "item")?)),
        "topping" => KioskEvent::ToggleTopping(ItemId::new(required(target, "item")?)),
        "ice" => {
            let level = required(target, "level")?;
            KioskEvent::SetIce(level.parse().map_err(|_| invalid(level))?)
        }
        "sugar" => {
            let level = required(target, "level")?;
            KioskEvent::SetSugar(level.parse().map_err(|_| invalid(level))?)
        }
        "confirm" => KioskEvent::AddToCart,
        "cancel" => KioskEvent::CancelCustomization,
        "qty" => {
            let position = required(target, "line")?;
            let delta = required(value, "delta")?;
            let index = match position.parse::<usize>() {
                Ok(n) if n >= 1 => n - 1,
                _ => return Err(invalid(position)),
            };
            let delta = delta.parse::<i64>().map_err(|_| invalid(delta))?;
            KioskEvent::UpdateLine { index, delta }
        }
        "clear" => KioskEvent::ClearCart,
        "checkout" => KioskEvent::Checkout,
        "browse" => KioskEvent::KeepBrowsing,
        "customer" => KioskEvent::IdentifyCustomer(target.unwrap_or_default()),
        "rewards" => KioskEvent::OpenRewards,
        "redeem" => {
            let count = target.unwrap_or_else(|| "1".to_string());
            KioskEvent::Redeem(count.parse().map_err(|_| invalid(count))?)
        }
        "cancel_rewards" => KioskEvent::CancelRewards,
        "place" => KioskEvent::PlaceOrder,
        "finish" => KioskEvent::StartNewOrder,
        "language" => {
            let code = required(target, "language")?;
            KioskEvent::SetLanguage(code.parse().map_err(|_| invalid(code))?)
        }
        other => {
            return Err(CsvError::UnrecognizedAction {
                line,
                action: other.to_string(),
            });
        }
    };
    Ok(event)
}

/// Write receipts in csv format: one row per cart line, then the order totals
pub fn write_receipts<'a>(
    receipts: impl IntoIterator<Item = &'a Receipt>,
    pricing: &Pricing,
    out: impl io::Write,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(out);

    for receipt in receipts {
        let order = receipt.order_id;
        for line in &receipt.lines {
            let options = line.options();
            writer
                .serialize(ReceiptRow {
                    order,
                    entry: &line.item.name,
                    detail: &options,
                    qty: Some(line.qty),
                    amount: pricing.line_extension(line).to_string(),
                })
                .map_err(CsvError::Write)?;
        }

        let totals = &receipt.totals;
        for (entry, amount) in [
            ("subtotal", totals.subtotal),
            ("discount", totals.discount),
            ("tax", totals.tax),
            ("total", totals.total),
        ] {
            writer
                .serialize(ReceiptRow {
                    order,
                    entry,
                    detail: receipt.customer.as_deref().unwrap_or_default(),
                    qty: None,
                    amount: amount.to_string(),
                })
                .map_err(CsvError::Write)?;
        }

        if let Some(warning) = &receipt.warning {
            writer
                .serialize(ReceiptRow {
                    order,
                    entry: "warning",
                    detail: warning,
                    qty: None,
                    amount: String::new(),
                })
                .map_err(CsvError::Write)?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Amount;
    use super::*;
    use crate::model::{IceLevel, OrderLine, Selection, SugarLevel};
    use crate::pricing::Totals;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn session(content: &str) -> Vec<Result<KioskEvent, CsvError>> {
        let file = write_csv(content);
        read_session(file.path()).unwrap().collect()
    }

    #[test]
    fn read_menu_rows() {
        let file = write_csv(
            "id,name,price,category,is_topping,description\n\
             1,Classic Milk Tea,4.50,Milk Tea,false,Black tea with milk\n\
             t1,Honey Boba,0.75,,true,\n",
        );
        let items = read_menu(file.path()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::new("1"));
        assert_eq!(items[0].price, Amount::from_cents(450));
        assert_eq!(items[0].category.as_deref(), Some("Milk Tea"));
        assert_eq!(items[0].description.as_deref(), Some("Black tea with milk"));
        assert!(items[1].is_topping);
        assert_eq!(items[1].category, None);
        assert_eq!(items[1].description, None);
    }

    #[test]
    fn read_menu_reports_bad_price() {
        let file = write_csv("id,name,price,category,is_topping,description\n1,Tea,cheap,,,\n");
        let err = read_menu(file.path()).unwrap_err();
        assert!(matches!(err, CsvError::Parse { line: 2, .. }));
    }

    #[test]
    fn read_menu_rejects_negative_and_infinite_prices() {
        let file = write_csv(
            "id,name,price,category,is_topping,description\n\
             1,Classic Milk Tea,-4.50,Milk Tea,false,\n",
        );
        let err = read_menu(file.path()).unwrap_err();
        assert!(matches!(
            err,
            CsvError::InvalidPrice { line: 2, source: PriceError::Negative(_) }
        ));

        let file = write_csv(
            "id,name,price,category,is_topping,description\n\
             1,Classic Milk Tea,4.50,Milk Tea,false,\n\
             2,Taro Milk Tea,inf,Milk Tea,false,\n",
        );
        let err = read_menu(file.path()).unwrap_err();
        assert!(matches!(
            err,
            CsvError::InvalidPrice { line: 3, source: PriceError::NotFinite(_) }
        ));
    }

    #[test]
    fn read_menu_missing_file() {
        let err = read_menu("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, CsvError::Open { .. }));
    }

    #[test]
    fn read_session_events() {
        let events = session(
            "action,target,value\n\
             select,1,\n\
             topping,t1,\n\
             ice,light,\n\
             sugar,50,\n\
             confirm,,\n\
             qty,1,-1\n\
             customer,ana@example.com,\n\
             redeem,,\n\
             language,es,\n",
        );
        let events: Vec<_> = events.into_iter().map(Result::unwrap).collect();

        assert_eq!(
            events,
            [
                KioskEvent::Customize(ItemId::new("1")),
                KioskEvent::ToggleTopping(ItemId::new("t1")),
                KioskEvent::SetIce(IceLevel::Light),
                KioskEvent::SetSugar(SugarLevel::Half),
                KioskEvent::AddToCart,
                KioskEvent::UpdateLine { index: 0, delta: -1 },
                KioskEvent::IdentifyCustomer("ana@example.com".to_string()),
                KioskEvent::Redeem(1),
                KioskEvent::SetLanguage(crate::translate::Language::Es),
            ]
        );
    }

    #[test]
    fn read_session_with_whitespace() {
        let events = session("action, target, value\n select , 1 ,\n");
        assert_eq!(events.len(), 1);
        assert!(events[0].is_ok());
    }

    #[test]
    fn read_session_returns_error_for_unknown_action() {
        let events = session("action,target,value\ndance,,\n");
        let err = events[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedAction { line: 2, .. }));
    }

    #[test]
    fn read_session_returns_error_for_missing_item() {
        let events = session("action,target,value\nselect,,\n");
        let err = events[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::MissingField { line: 2, field: "item", .. }));
    }

    #[test]
    fn read_session_rejects_line_zero() {
        let events = session("action,target,value\nqty,0,1\nice,lots,\n");
        assert!(matches!(events[0], Err(CsvError::InvalidValue { line: 2, .. })));
        assert!(matches!(events[1], Err(CsvError::InvalidValue { line: 3, .. })));
    }

    #[test]
    fn write_receipt_rows() {
        let classic = MenuItem::drink("1", "Classic Milk Tea", Amount::from_cents(450), "Milk Tea");
        let honey = MenuItem::topping("t1", "Honey Boba", Amount::from_cents(75));
        let pricing = Pricing::default();
        let receipt = Receipt {
            order_id: 7,
            customer: None,
            lines: vec![OrderLine::new(Selection::plain(classic).with_toppings([honey]), 2)],
            totals: pricing.totals(Amount::from_cents(1050), Amount::ZERO),
            warning: None,
        };

        let mut out = Vec::new();
        write_receipts([&receipt], &pricing, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "order,entry,detail,qty,amount");
        assert_eq!(lines[1], "7,Classic Milk Tea,Honey Boba; Regular Ice; 100%,2,10.50");
        assert_eq!(lines[2], "7,subtotal,,,10.50");
        assert_eq!(lines[3], "7,discount,,,0.00");
        assert_eq!(lines[4], "7,tax,,,0.87");
        assert_eq!(lines[5], "7,total,,,11.37");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn write_receipt_warning_row() {
        let receipt = Receipt {
            order_id: 1,
            customer: Some("ana@example.com".to_string()),
            lines: Vec::new(),
            totals: Totals::default(),
            warning: Some("points not updated".to_string()),
        };

        let mut out = Vec::new();
        write_receipts([&receipt], &Pricing::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("1,total,ana@example.com,,0.00"));
        assert!(text.ends_with("1,warning,points not updated,,\n"));
    }
}
