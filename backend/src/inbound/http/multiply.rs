//! `GET /multiply`: multiply two query operands with JavaScript number
//! coercion and report the product as JSON.
//!
//! A key given more than once arrives as a list, which never coerces to a
//! number, so the product is `NaN`.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;

/// Largest magnitude at which every integer is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// One operand as it appeared in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryValue<'a> {
    /// The key is absent.
    Missing,
    /// The key appears exactly once.
    Single(&'a str),
    /// The key appears more than once.
    Repeated,
}

impl<'a> QueryValue<'a> {
    /// Look `key` up in decoded query pairs.
    #[must_use]
    pub fn from_pairs(pairs: &'a [(String, String)], key: &str) -> Self {
        let mut values = pairs.iter().filter(|(name, _)| name == key);
        match (values.next(), values.next()) {
            (None, _) => Self::Missing,
            (Some((_, value)), None) => Self::Single(value),
            (Some(_), Some(_)) => Self::Repeated,
        }
    }
}

impl<'a> From<Option<&'a str>> for QueryValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Single)
    }
}

/// JSON form of a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Product {
    /// Whole product within the safe-integer range.
    Integer(i64),
    /// Any other finite product.
    Float(f64),
    /// `"NaN"` or `"null"` for non-finite products.
    Text(&'static str),
}

impl From<f64> for Product {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "only whole values inside the safe-integer range are cast"
    )]
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Self::Text("NaN")
        } else if value.is_infinite() {
            Self::Text("null")
        } else if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
            Self::Integer(value as i64)
        } else {
            Self::Float(value)
        }
    }
}

#[derive(Debug, Serialize)]
struct MultiplyResponse {
    result: Product,
}

/// Convert an optional query value the way JavaScript's `Number()` does.
///
/// A missing operand is `undefined` and therefore NaN; an empty or
/// whitespace-only one is zero.
#[must_use]
pub fn coerce_number(raw: QueryValue<'_>) -> f64 {
    let QueryValue::Single(raw) = raw else {
        return f64::NAN;
    };
    let text = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = parse_prefixed(text) {
        return value;
    }
    if text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return text.parse::<f64>().unwrap_or(f64::NAN);
    }
    f64::NAN
}

/// Unsigned `0x`, `0o` and `0b` literals. `None` when `text` has no prefix.
#[expect(clippy::float_arithmetic, reason = "digits accumulate into an f64")]
fn parse_prefixed(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = text.get(2..)?;
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            return Some(f64::NAN);
        };
        value = value * f64::from(radix) + f64::from(digit);
    }
    Some(value)
}

/// Multiply the coerced operands.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "products follow IEEE 754 semantics")]
pub fn multiply(first: QueryValue<'_>, second: QueryValue<'_>) -> Product {
    Product::from(coerce_number(first) * coerce_number(second))
}

/// Respond with `{"result": first * second}`.
#[get("/multiply")]
pub async fn multiply_handler(query: web::Query<Vec<(String, String)>>) -> HttpResponse {
    let pairs = query.into_inner();
    let result = multiply(
        QueryValue::from_pairs(&pairs, "first"),
        QueryValue::from_pairs(&pairs, "second"),
    );
    HttpResponse::Ok().json(MultiplyResponse { result })
}
