//! Declarative field tables used to normalize create and update bodies.
//!
//! Each listing category declares its fields once; both create and update
//! bodies go through the same table so type checks and defaults never drift
//! between the two paths.
//!
//! - **create**: absent or null fields take their default. A required field that
//!   is still absent, null or blank is rejected.
//! - **update**: only present, non-null fields are checked and returned, so the
//!   caller overlays them onto the stored record.
//!
//! Numeric strings such as `"12.5"` are coerced and negatives are rejected.
//! A field may also be read under one alias (`countInStock` for
//! `count_in_stock`). Unknown fields are dropped.

use serde_json::{Map, Number, Value};

use crate::error::{MarketplaceError, MarketplaceResult};
use crate::ownership::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative float
    Number,
    /// Non-negative integer
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    None,
    Text(&'static str),
    Number(f64),
    Integer(i64),
    /// Display name of the creating user
    ActorName,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: FieldDefault,
    /// Alternate body key, read when `name` is absent or null
    pub alias: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: FieldDefault::None,
            alias: None,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: FieldDefault::None,
            alias: None,
        }
    }

    pub const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// The body value under `name`, else under the alias. Null counts as absent.
    fn lookup<'a>(&self, body: &'a Map<String, Value>) -> Option<&'a Value> {
        let present = |key: &str| body.get(key).filter(|v| !v.is_null());
        present(self.name).or_else(|| self.alias.and_then(present))
    }

    fn default_value(&self, actor: &Actor) -> Option<Value> {
        match self.default {
            FieldDefault::None => None,
            FieldDefault::Text(text) => Some(Value::String(text.to_string())),
            FieldDefault::Number(n) => Number::from_f64(n).map(Value::Number),
            FieldDefault::Integer(n) => Some(Value::from(n)),
            FieldDefault::ActorName => Some(Value::String(actor.name.clone())),
        }
    }

    /// Type-checks and coerces a present, non-null value.
    fn coerce(&self, value: &Value) -> MarketplaceResult<Value> {
        match self.kind {
            FieldKind::Text => match value {
                Value::String(s) => Ok(Value::String(s.clone())),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                _ => Err(self.invalid("a string")),
            },
            FieldKind::Number => {
                let n = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .filter(|n| n.is_finite() && *n >= 0.0)
                .ok_or_else(|| self.invalid("a non-negative number"))?;

                Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| self.invalid("a non-negative number"))
            }
            FieldKind::Integer => {
                let n = match value {
                    Value::Number(n) => n
                        .as_i64()
                        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                }
                .filter(|n| *n >= 0)
                .ok_or_else(|| self.invalid("a non-negative integer"))?;

                Ok(Value::from(n))
            }
        }
    }

    fn invalid(&self, expected: &str) -> MarketplaceError {
        MarketplaceError::Validation(format!("{} must be {}", self.name, expected))
    }
}

/// Blank means null, or a string with nothing but whitespace.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListingSchema {
    pub fields: &'static [FieldSpec],
}

impl ListingSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Full field set for a new record, with defaults filled in.
    pub fn normalize_create(
        &self,
        body: &Value,
        actor: &Actor,
    ) -> MarketplaceResult<Map<String, Value>> {
        let body = as_object(body)?;
        let mut out = Map::new();

        for spec in self.fields {
            let value = match spec.lookup(body).filter(|v| !is_blank(v)) {
                Some(value) => Some(spec.coerce(value)?),
                None => spec.default_value(actor),
            };

            match value {
                Some(value) => {
                    out.insert(spec.name.to_string(), value);
                }
                None if spec.required => {
                    return Err(MarketplaceError::Validation(format!(
                        "Missing required field: {}",
                        spec.name
                    )));
                }
                None => {}
            }
        }

        Ok(out)
    }

    /// Only the fields present in `body`, checked and coerced.
    pub fn normalize_update(&self, body: &Value) -> MarketplaceResult<Map<String, Value>> {
        let body = as_object(body)?;
        let mut out = Map::new();

        for spec in self.fields {
            let Some(value) = spec.lookup(body) else {
                continue;
            };

            if spec.required && is_blank(value) {
                return Err(MarketplaceError::Validation(format!(
                    "{} cannot be empty",
                    spec.name
                )));
            }

            out.insert(spec.name.to_string(), spec.coerce(value)?);
        }

        Ok(out)
    }
}

fn as_object(body: &Value) -> MarketplaceResult<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| MarketplaceError::Validation("Request body must be a JSON object".into()))
}
