//! Request payload validation
//!
//! Each schema turns a JSON payload (or query map) into a typed value, or an
//! ordered list of field errors. Callers surface only the first error, with
//! its message unchanged.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{StockbookError, StockbookResult};
use crate::export::{ExportFormat, ExportScope};
use crate::models::{CategoryId, ItemId, Money, MoneyParseError, TransactionKind};
use crate::services::{
    ItemChanges, ItemFilter, NewItem, NewTransaction, TransactionFilter,
    DEFAULT_TRANSACTION_LIMIT,
};

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// A typed value that can be read from a JSON payload
pub trait Schema: Sized {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>>;
}

/// Validate `payload` against `S`, failing with the first field error
pub fn validate<S: Schema>(payload: &Value) -> StockbookResult<S> {
    S::from_payload(payload).map_err(|errors| {
        let message = errors
            .into_iter()
            .next()
            .map(|e| e.message)
            .unwrap_or_else(|| "Invalid request".to_string());
        StockbookError::Validation(message)
    })
}

/// Validate query-string parameters. Values arrive as strings.
pub fn validate_query<S: Schema>(params: &HashMap<String, String>) -> StockbookResult<S> {
    let payload: Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    validate(&Value::Object(payload))
}

/// Collects field errors in declaration order
struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Value) -> Self {
        let mut fields = Self {
            object: payload.as_object(),
            errors: Vec::new(),
        };
        if fields.object.is_none() {
            fields.fail("body", "Request body must be a JSON object");
        }
        fields
    }

    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// The field, treating `null` as absent
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.object
            .and_then(|o| o.get(field))
            .filter(|v| !v.is_null())
    }

    fn required_string(&mut self, field: &'static str, message: &str) -> Option<String> {
        match self.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::String(_)) | None => {
                self.fail(field, message);
                None
            }
            Some(_) => {
                self.fail(field, format!("{} must be a string", field));
                None
            }
        }
    }

    fn optional_string(&mut self, field: &'static str, empty_message: &str) -> Option<String> {
        self.get(field)?;
        self.required_string(field, empty_message)
    }

    fn optional_text(&mut self, field: &'static str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.fail(field, format!("{} must be a string", field));
                None
            }
        }
    }

    /// A number, accepting numeric strings from query parameters
    fn number(&mut self, field: &'static str) -> Option<f64> {
        let n = match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        if n.is_none() {
            self.fail(field, format!("{} must be a number", field));
        }
        n
    }

    fn non_negative_integer(&mut self, field: &'static str, message: &str) -> Option<u32> {
        let n = self.number(field)?;
        if n.fract() != 0.0 {
            self.fail(field, format!("{} must be an integer", field));
            return None;
        }
        if n < 0.0 {
            self.fail(field, message);
            return None;
        }
        if n > u32::MAX as f64 {
            self.fail(field, format!("{} is too large", field));
            return None;
        }
        Some(n as u32)
    }

    fn non_negative_money(&mut self, field: &'static str, message: &str) -> Option<Money> {
        let n = self.number(field)?;
        if n < 0.0 {
            self.fail(field, message);
            return None;
        }
        match Money::from_decimal(n) {
            Ok(money) => Some(money),
            Err(MoneyParseError::OutOfRange) => {
                self.fail(
                    field,
                    format!("{} must not exceed {}", field, Money::MAX.to_plain_string()),
                );
                None
            }
            Err(e) => {
                self.fail(field, e.to_string());
                None
            }
        }
    }

    fn boolean(&mut self, field: &'static str) -> Option<bool> {
        match self.get(field)? {
            Value::Bool(b) => Some(*b),
            _ => {
                self.fail(field, format!("{} must be a boolean", field));
                None
            }
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Vec<FieldError>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        value().ok_or_else(|| {
            vec![FieldError {
                field: "body",
                message: "Invalid request".into(),
            }]
        })
    }
}

fn invalid_category_id() -> Vec<FieldError> {
    vec![FieldError {
        field: "categoryId",
        message: "Invalid category id".into(),
    }]
}

fn parse_category_id(raw: Option<String>) -> Result<Option<CategoryId>, Vec<FieldError>> {
    raw.map(|s| s.parse::<CategoryId>())
        .transpose()
        .map_err(|_| invalid_category_id())
}

/// `{name}` for category create and rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPayload {
    pub name: String,
}

impl Schema for CategoryPayload {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let name = fields.required_string("name", "Category name is required");
        fields.finish(|| Some(Self { name: name? }))
    }
}

impl Schema for NewItem {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let name = fields.required_string("name", "Item name is required");
        let category_id = fields.required_string("categoryId", "Category is required");
        let quantity = match fields.get("quantity") {
            Some(_) => fields.non_negative_integer("quantity", "Quantity must be non-negative"),
            None => {
                fields.fail("quantity", "Quantity is required");
                None
            }
        };
        let price = match fields.get("price") {
            Some(_) => fields.non_negative_money("price", "Price must be non-negative"),
            None => {
                fields.fail("price", "Price is required");
                None
            }
        };
        let (name, category_id, quantity, price) =
            fields.finish(|| Some((name?, category_id?, quantity?, price?)))?;

        Ok(Self {
            name,
            category_id: category_id
                .parse()
                .map_err(|_| invalid_category_id())?,
            quantity,
            price,
        })
    }
}

impl Schema for ItemChanges {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let name = fields.optional_string("name", "Item name is required");
        let category_id = fields.optional_string("categoryId", "Category is required");
        let quantity = fields.non_negative_integer("quantity", "Quantity must be non-negative");
        let price = fields.non_negative_money("price", "Price must be non-negative");
        fields.finish(|| Some(()))?;

        Ok(Self {
            name,
            category_id: parse_category_id(category_id)?,
            quantity,
            price,
        })
    }
}

impl Schema for NewTransaction {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let kind = match fields.get("type") {
            Some(Value::String(s)) => match s.parse::<TransactionKind>() {
                Ok(kind) => Some(kind),
                Err(_) => {
                    fields.fail("type", "Type must be 'income' or 'expense'");
                    None
                }
            },
            _ => {
                fields.fail("type", "Type must be 'income' or 'expense'");
                None
            }
        };
        let amount = match fields.get("amount") {
            Some(_) => fields.non_negative_money("amount", "Amount must be non-negative"),
            None => {
                fields.fail("amount", "Amount is required");
                None
            }
        };
        let description = fields.optional_text("description");
        let item_id = fields.optional_text("itemId");

        let (kind, amount) = fields.finish(|| Some((kind?, amount?)))?;

        let item_id = match item_id.filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(raw.parse::<ItemId>().map_err(|_| {
                vec![FieldError {
                    field: "itemId",
                    message: "Invalid item id".into(),
                }]
            })?),
            None => None,
        };

        Ok(Self {
            kind,
            amount,
            description,
            item_id,
        })
    }
}

/// `{key, value, financialTrackingEnabled?}` for the settings upsert
#[derive(Debug, Clone, PartialEq)]
pub struct SettingPayload {
    pub key: String,
    pub value: Value,
    pub financial_tracking_enabled: Option<bool>,
}

impl Schema for SettingPayload {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let key = fields.required_string("key", "Setting key is required");
        let value = fields.get("value").cloned();
        if value.is_none() {
            fields.fail("value", "Setting value is required");
        }
        let financial_tracking_enabled = fields.boolean("financialTrackingEnabled");
        fields.finish(|| {
            Some(Self {
                key: key?,
                value: value?,
                financial_tracking_enabled,
            })
        })
    }
}

/// `{name}` for the profile update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePayload {
    pub name: String,
}

impl Schema for ProfilePayload {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let name = fields.required_string("name", "Name is required");
        fields.finish(|| Some(Self { name: name? }))
    }
}

/// `?format=&type=` for exports, defaulting to JSON over everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportQuery {
    pub format: ExportFormat,
    pub scope: ExportScope,
}

impl Schema for ExportQuery {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let format = match fields.optional_text("format") {
            Some(raw) => raw.parse::<ExportFormat>().map_err(|e| {
                fields.fail("format", e.public_message().unwrap_or_default());
            }),
            None => Ok(ExportFormat::default()),
        };
        let scope = match fields.optional_text("type") {
            Some(raw) => raw.parse::<ExportScope>().map_err(|e| {
                fields.fail("type", e.public_message().unwrap_or_default());
            }),
            None => Ok(ExportScope::default()),
        };
        fields.finish(|| {
            Some(Self {
                format: format.ok()?,
                scope: scope.ok()?,
            })
        })
    }
}

impl Schema for ItemFilter {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        let search = fields
            .optional_text("search")
            .filter(|s| !s.trim().is_empty());
        let category_id = fields
            .optional_text("categoryId")
            .filter(|s| !s.trim().is_empty());
        fields.finish(|| Some(()))?;

        Ok(Self {
            search,
            category_id: parse_category_id(category_id)?,
        })
    }
}

impl Schema for TransactionFilter {
    fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(payload);
        // An unrecognised type filter lists everything
        let kind = fields
            .optional_text("type")
            .and_then(|raw| raw.parse::<TransactionKind>().ok());
        let limit = fields.non_negative_integer("limit", "limit must be non-negative");
        fields.finish(|| Some(()))?;

        Ok(Self {
            kind,
            limit: limit
                .map(|l| l as usize)
                .unwrap_or(DEFAULT_TRANSACTION_LIMIT),
        })
    }
}
