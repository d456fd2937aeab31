//! Staff endpoints: orders, inventory, employees, menu management, reports
//! and session.
//!
//! Report and history payloads are whatever the backend computes, so they are
//! handed back as raw JSON. Obvious mistakes are rejected before any request
//! goes out.

use chrono::NaiveDate;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ApiError, HttpClient};
use crate::Amount;
use crate::model::ItemId;

/// Stock threshold the manager screen starts with.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(alias = "id")]
    pub ingredient_id: i64,
    pub name: String,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestockItem {
    pub ingredient_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(alias = "id")]
    pub employee_id: i64,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub manager_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEmployee {
    pub name: String,
    pub salary: Option<f64>,
    pub manager_id: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
}

/// The signed-in staff member, as reported by the session endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn range_query(range: Option<(NaiveDate, NaiveDate)>) -> Vec<(&'static str, String)> {
    match range {
        Some((start, end)) => vec![("start_date", date_param(start)), ("end_date", date_param(end))],
        None => Vec::new(),
    }
}

fn require_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    Ok(trimmed)
}

fn require_stock(stock: i64) -> Result<i64, ApiError> {
    if stock < 0 {
        return Err(ApiError::Validation(format!("stock must not be negative, got {stock}")));
    }
    Ok(stock)
}

/// Orders and sales history
impl HttpClient {
    pub async fn orders(&self, range: Option<(NaiveDate, NaiveDate)>) -> Result<Value, ApiError> {
        self.get("/orders", &range_query(range), "Failed to load orders")
            .await
    }

    pub async fn order_items(&self, order_id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/orders/{order_id}/items"), &[], "Failed to load order items")
            .await
    }

    pub async fn order_trends(&self, start: NaiveDate, end: NaiveDate) -> Result<Value, ApiError> {
        let query = range_query(Some((start, end)));
        self.get("/orders/trends", &query, "Failed to load order trends")
            .await
    }
}

/// Inventory
impl HttpClient {
    pub async fn inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.get("/inventory", &[], "Failed to load inventory").await
    }

    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<InventoryItem>, ApiError> {
        let query = [("threshold", threshold.to_string())];
        self.get("/inventory/low-stock", &query, "Failed to load low stock items")
            .await
    }

    pub async fn restock(&self, items: &[RestockItem]) -> Result<Value, ApiError> {
        if items.is_empty() {
            return Err(ApiError::Validation("nothing to restock".to_string()));
        }
        if let Some(bad) = items.iter().find(|it| it.quantity <= 0) {
            return Err(ApiError::Validation(format!(
                "restock quantity for ingredient {} must be positive",
                bad.ingredient_id
            )));
        }
        let body = json!({ "items": items });
        self.send(Method::POST, "/inventory/restock", &body, "Failed to restock inventory")
            .await
    }

    pub async fn update_inventory_item(&self, ingredient_id: i64, stock: i64) -> Result<Value, ApiError> {
        let body = json!({ "stock": require_stock(stock)? });
        let path = format!("/inventory/{ingredient_id}");
        self.send(Method::PUT, &path, &body, "Failed to update inventory item")
            .await
    }

    pub async fn add_inventory_item(&self, name: &str, stock: i64) -> Result<Value, ApiError> {
        let body = json!({ "name": require_name(name)?, "stock": require_stock(stock)? });
        self.send(Method::POST, "/inventory", &body, "Failed to add inventory item")
            .await
    }

    pub async fn delete_inventory_item(&self, ingredient_id: i64) -> Result<Value, ApiError> {
        self.delete(&format!("/inventory/{ingredient_id}"), "Failed to delete inventory item")
            .await
    }
}

/// Employees
impl HttpClient {
    pub async fn employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.get("/employees", &[], "Failed to load employees").await
    }

    pub async fn employee(&self, employee_id: i64) -> Result<Employee, ApiError> {
        self.get(&format!("/employees/{employee_id}"), &[], "Failed to load employee")
            .await
    }

    pub async fn add_employee(&self, employee: &NewEmployee) -> Result<Value, ApiError> {
        require_name(&employee.name)?;
        self.send(Method::POST, "/employees", employee, "Failed to add employee")
            .await
    }

    pub async fn update_employee(&self, employee_id: i64, update: &EmployeeUpdate) -> Result<Value, ApiError> {
        if let Some(name) = &update.name {
            require_name(name)?;
        }
        let path = format!("/employees/{employee_id}");
        self.send(Method::PUT, &path, update, "Failed to update employee")
            .await
    }

    pub async fn delete_employee(&self, employee_id: i64) -> Result<Value, ApiError> {
        self.delete(&format!("/employees/{employee_id}"), "Failed to delete employee")
            .await
    }

    pub async fn employee_performance(
        &self,
        employee_id: i64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Value, ApiError> {
        let path = format!("/employees/{employee_id}/performance");
        self.get(&path, &range_query(range), "Failed to load employee performance")
            .await
    }
}

/// Menu management
impl HttpClient {
    pub async fn add_menu_item(&self, name: &str, price: Amount, is_topping: bool) -> Result<Value, ApiError> {
        if price.is_negative() {
            return Err(ApiError::Validation(format!("price must not be negative, got {price}")));
        }
        let body = json!({ "name": require_name(name)?, "price": price, "is_topping": is_topping });
        self.send(Method::POST, "/menu", &body, "Failed to add menu item")
            .await
    }

    pub async fn update_menu_item(&self, item: &ItemId, changes: &Value) -> Result<Value, ApiError> {
        let path = format!("/menu/{item}");
        self.send(Method::PUT, &path, changes, "Failed to update menu item")
            .await
    }

    pub async fn delete_menu_item(&self, item: &ItemId) -> Result<Value, ApiError> {
        self.delete(&format!("/menu/{item}"), "Failed to delete menu item")
            .await
    }
}

/// Reports
impl HttpClient {
    /// Hourly sales for the current day.
    pub async fn x_report(&self) -> Result<Value, ApiError> {
        self.get("/reports/x-report", &[], "Failed to load x-report").await
    }

    /// End of day totals.
    pub async fn z_report(&self, date: NaiveDate) -> Result<Value, ApiError> {
        let query = [("date", date_param(date))];
        self.get("/reports/z-report", &query, "Failed to load z-report")
            .await
    }

    pub async fn weekly_sales(&self) -> Result<Value, ApiError> {
        self.get("/reports/weekly-sales", &[], "Failed to load weekly sales")
            .await
    }

    pub async fn hourly_sales(&self, date: NaiveDate) -> Result<Value, ApiError> {
        let query = [("date", date_param(date))];
        self.get("/reports/hourly-sales", &query, "Failed to load hourly sales")
            .await
    }

    pub async fn peak_sales_days(&self) -> Result<Value, ApiError> {
        self.get("/reports/peak-sales", &[], "Failed to load peak sales days")
            .await
    }

    pub async fn product_usage(&self, start: NaiveDate, end: NaiveDate) -> Result<Value, ApiError> {
        if end < start {
            return Err(ApiError::Validation(format!("report range ends before it starts ({start} > {end})")));
        }
        let query = range_query(Some((start, end)));
        self.get("/reports/product-usage", &query, "Failed to load product usage")
            .await
    }

    /// Run a free-form query on the backend's reporting database.
    pub async fn custom_report(&self, query: &str) -> Result<Value, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::Validation("query must not be empty".to_string()));
        }
        let body = json!({ "query": query });
        self.send(Method::POST, "/reports/custom", &body, "Failed to execute custom report")
            .await
    }
}

/// Session
impl HttpClient {
    /// The signed-in user, or `None` when the session is anonymous.
    pub async fn current_user(&self) -> Result<Option<SessionUser>, ApiError> {
        match self.get("/user", &[], "Failed to load session").await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_status(StatusCode::UNAUTHORIZED) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn logout(&self) -> Result<Value, ApiError> {
        self.send(Method::POST, "/logout", &json!({}), "Failed to log out")
            .await
    }
}
