//! Request body validation and sanitization.
//!
//! Each rule-table field is trimmed, HTML-escaped and checked. `name` and
//! `imgUrl` are decoded back to display form before storage. `apiRoute` and
//! `type` bypass the table and are only shape-checked when the product is
//! built.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::error::{FieldError, ProductError, ProductResult};
use crate::models::ProductFields;

static NUMERIC: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$"));

/// Check applied to the escaped value of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// At least one character after trimming
    NonEmpty,
    /// Decimal number with optional sign and fraction
    Numeric,
    /// `true`, `false`, `1` or `0`
    Boolean,
    /// The raw JSON value must already be a string
    RawString,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub check: Check,
    /// Decode HTML entities after the check
    pub decode: bool,
    pub message: &'static str,
}

pub const RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        required: true,
        check: Check::NonEmpty,
        decode: true,
        message: "name must be specified",
    },
    FieldRule {
        field: "apiUrl",
        required: false,
        check: Check::RawString,
        decode: false,
        message: "apiUrl must be a string value and at least 1 character long",
    },
    FieldRule {
        field: "price",
        required: true,
        check: Check::Numeric,
        decode: false,
        message: "price must be specified",
    },
    FieldRule {
        field: "imgUrl",
        required: true,
        check: Check::NonEmpty,
        decode: true,
        message: "imgUrl must be specified",
    },
    FieldRule {
        field: "outOfStock",
        required: false,
        check: Check::Boolean,
        decode: false,
        message: "outOfStock must be a boolean value",
    },
    FieldRule {
        field: "flavours",
        required: false,
        check: Check::Numeric,
        decode: false,
        message: "Flavours must be a valid number",
    },
    FieldRule {
        field: "description",
        required: false,
        check: Check::None,
        decode: false,
        message: "Invalid value",
    },
];

/// Body that passed the rule table; stored values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedBody {
    values: Map<String, Value>,
    api_route: Option<Value>,
    product_type: Option<Value>,
}

impl ValidatedBody {
    /// Build the product attributes, rejecting non-scalar `apiRoute` or `type`.
    ///
    /// A required field missing here is reported as that field's validation
    /// error rather than stored as a default.
    pub fn into_fields(self) -> ProductResult<ProductFields> {
        let text = |key: &str| self.values.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| self.values.get(key).and_then(Value::as_f64);

        Ok(ProductFields {
            name: text("name").ok_or_else(|| missing("name"))?,
            price: number("price").ok_or_else(|| missing("price"))?,
            img_url: text("imgUrl").ok_or_else(|| missing("imgUrl"))?,
            api_url: text("apiUrl"),
            out_of_stock: self.values.get("outOfStock").and_then(Value::as_bool),
            flavours: number("flavours"),
            description: text("description"),
            api_route: passthrough("apiRoute", self.api_route)?,
            product_type: passthrough("type", self.product_type)?,
        })
    }
}

fn missing(field: &str) -> ProductError {
    let message = RULES
        .iter()
        .find(|rule| rule.field == field)
        .map_or("Invalid value", |rule| rule.message);
    ProductError::Validation(vec![FieldError::new(field, message)])
}

/// Validate and sanitize a request body, collecting every field error.
///
/// A non-object body is treated as empty. `null` counts as absent.
pub fn validate(body: &Value) -> Result<ValidatedBody, Vec<FieldError>> {
    let empty = Map::new();
    let object = body.as_object().unwrap_or(&empty);
    let present = |key: &str| object.get(key).filter(|v| !v.is_null());

    let mut validated = ValidatedBody {
        api_route: present("apiRoute").cloned(),
        product_type: present("type").cloned(),
        ..Default::default()
    };
    let mut errors = Vec::new();

    for rule in RULES {
        let Some(raw) = present(rule.field) else {
            if rule.required {
                errors.push(FieldError::new(rule.field, rule.message));
            }
            continue;
        };

        match apply(rule, raw) {
            Some(value) => {
                validated.values.insert(rule.field.to_string(), value);
            }
            None => errors.push(FieldError::new(rule.field, rule.message)),
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        tracing::debug!(rejected = errors.len(), "Request body rejected");
        Err(errors)
    }
}

/// Run one rule; `None` means the value failed its check.
fn apply(rule: &FieldRule, raw: &Value) -> Option<Value> {
    if rule.check == Check::RawString && !raw.is_string() {
        return None;
    }

    let escaped = escape(scalar_text(raw)?.trim());

    let value = match rule.check {
        Check::NonEmpty if escaped.is_empty() => return None,
        Check::Numeric => {
            if !is_numeric(&escaped) {
                return None;
            }
            let n = escaped.parse::<f64>().ok().filter(|n| n.is_finite())?;
            Value::from(n)
        }
        Check::Boolean => match escaped.as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => return None,
        },
        _ if rule.decode => Value::String(decode(&escaped)),
        _ => Value::String(escaped),
    };

    Some(value)
}

/// String form of a scalar; arrays and objects have none
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_numeric(value: &str) -> bool {
    match NUMERIC.as_ref() {
        Ok(re) => re.is_match(value),
        Err(e) => {
            tracing::error!("Numeric pattern failed to compile: {}", e);
            false
        }
    }
}

/// Store a scalar `apiRoute` or `type` as text; anything else violates the schema
fn passthrough(field: &str, value: Option<Value>) -> ProductResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(ProductError::SchemaViolation(format!(
            "Cast to string failed for value {other} at path \"{field}\""
        ))),
    }
}

/// HTML-escape `& " ' < > / \` and the backtick
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode HTML entities in a single left-to-right pass.
///
/// Named entities cover what [`escape`] emits plus `&apos;` and `&nbsp;`;
/// decimal and hex numeric references are decoded generally. Anything
/// unrecognized is kept verbatim.
pub fn decode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        match rest.find(';').and_then(|end| {
            entity(&rest[1..end]).map(|c| (c, end))
        }) {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
