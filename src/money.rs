//! Cart line normalization.
//!
//! Storefront builds have shipped prices as integer cents (4990), decimal
//! reais (49.9), and formatted strings ("R$ 49,90", "1.234,56"). Everything
//! is collapsed here into integer minor units (centavos) before any amount
//! math happens. Lines carrying an explicit `unit` tag are converted
//! deterministically; untagged input goes through the legacy
//! large-integer-means-cents heuristic, kept only as a migration shim.

use serde::{Deserialize, Serialize};

/// Price as it arrives from the client, representation unknown.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

/// Quantity fields show up both as numbers and as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
}

/// Explicit unit tag for a line's price. When present, no guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    /// Already integer minor units (centavos).
    Minor,
    /// Decimal major units (reais).
    Major,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCartLine {
    #[serde(default)]
    pub id: Option<String>,
    /// Older storefront builds send `title` instead of `name`.
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub unit: Option<PriceUnit>,
    #[serde(default)]
    pub quantity: Option<RawQuantity>,
}

/// A cart line with its price pinned to integer minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

pub fn normalize_cart(items: &[RawCartLine]) -> Vec<CartLine> {
    items.iter().map(normalize_line).collect()
}

pub fn normalize_line(raw: &RawCartLine) -> CartLine {
    let price = raw
        .price
        .as_ref()
        .map(|p| to_cents(p, raw.unit))
        .unwrap_or(0);

    CartLine {
        id: raw.id.clone().unwrap_or_else(|| "item".to_string()),
        name: raw.name.clone().unwrap_or_else(|| "Item".to_string()),
        unit_price_cents: price,
        quantity: normalize_quantity(raw.quantity.as_ref()),
    }
}

/// Coerces a quantity to an integer >= 1; anything unparsable becomes 1.
pub fn normalize_quantity(raw: Option<&RawQuantity>) -> i64 {
    let parsed = match raw {
        Some(RawQuantity::Number(n)) if n.is_finite() => Some(n.trunc() as i64),
        Some(RawQuantity::Text(s)) => s.trim().parse::<f64>().ok().map(|n| n.trunc() as i64),
        _ => None,
    };
    parsed.filter(|q| *q >= 1).unwrap_or(1)
}

/// Converts a raw price to minor units.
///
/// Tagged input is exact. Untagged input falls back to the heuristic the
/// old storefronts relied on: an integer >= 1000 with no decimal separator
/// is taken as already-cents, everything else as a decimal major-unit
/// amount. Unparsable input collapses to 0; callers decide whether a
/// zero-cent line is acceptable.
pub fn to_cents(price: &RawPrice, unit: Option<PriceUnit>) -> i64 {
    match unit {
        Some(PriceUnit::Minor) => match price {
            RawPrice::Number(n) if n.is_finite() => n.round() as i64,
            RawPrice::Number(_) => 0,
            RawPrice::Text(s) => parse_decimal(s).map(|n| n.round() as i64).unwrap_or(0),
        },
        Some(PriceUnit::Major) => match price {
            RawPrice::Number(n) if n.is_finite() => (n * 100.0).round() as i64,
            RawPrice::Number(_) => 0,
            RawPrice::Text(s) => parse_decimal(s)
                .map(|n| (n * 100.0).round() as i64)
                .unwrap_or(0),
        },
        None => match price {
            RawPrice::Number(n) if n.is_finite() => {
                if n.fract() == 0.0 && n.abs() >= 1000.0 {
                    *n as i64
                } else {
                    (n * 100.0).round() as i64
                }
            }
            RawPrice::Number(_) => 0,
            RawPrice::Text(s) => {
                let Some((n, had_separator)) = parse_decimal_parts(s) else {
                    return 0;
                };
                if !had_separator && n.fract() == 0.0 && n.abs() >= 1000.0 {
                    n as i64
                } else {
                    (n * 100.0).round() as i64
                }
            }
        },
    }
}

/// Parses a Brazilian- or US-formatted decimal string, ignoring currency
/// symbols and whitespace. "R$ 1.234,56" and "1234.56" both parse.
fn parse_decimal(raw: &str) -> Option<f64> {
    parse_decimal_parts(raw).map(|(n, _)| n)
}

/// Like [`parse_decimal`], also reporting whether the RAW input carried
/// any decimal separator at all. "1.234" parses to 1234 but DID carry a
/// separator, so it is a formatted major-unit amount and the cents
/// heuristic must not apply.
fn parse_decimal_parts(raw: &str) -> Option<(f64, bool)> {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if filtered.is_empty() {
        return None;
    }
    let had_separator = filtered.contains('.') || filtered.contains(',');

    let candidate = if let Some(pos) = filtered.rfind(',') {
        // Comma decimal: dots (and earlier commas) are thousands separators.
        let (head, tail) = filtered.split_at(pos);
        let head: String = head.chars().filter(|c| *c != '.' && *c != ',').collect();
        format!("{}.{}", head, &tail[1..])
    } else {
        strip_thousands_dots(&filtered)
    };

    candidate
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| (n, had_separator))
}

/// Removes dots acting as thousands separators ("1.234.567" -> "1234567")
/// while keeping decimal dots ("49.90" stays).
fn strip_thousands_dots(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c == '.' {
            let trailing_digits = s[i + 1..].chars().take_while(char::is_ascii_digit).count();
            if trailing_digits == 3 {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Strips everything but ASCII digits. Used for phone, CPF/CNPJ and
/// postal-code fields before they reach the gateway.
pub fn only_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn untagged(price: RawPrice) -> i64 {
        to_cents(&price, None)
    }

    #[test]
    fn equivalent_representations_agree() {
        assert_eq!(untagged(RawPrice::Text("49.90".into())), 4990);
        assert_eq!(untagged(RawPrice::Text("49,90".into())), 4990);
        assert_eq!(untagged(RawPrice::Text("R$ 49,90".into())), 4990);
        assert_eq!(untagged(RawPrice::Number(49.9)), 4990);
        assert_eq!(untagged(RawPrice::Number(4990.0)), 4990);
        assert_eq!(untagged(RawPrice::Text("4990".into())), 4990);
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(untagged(RawPrice::Text("1.234,56".into())), 123456);
        assert_eq!(untagged(RawPrice::Text("R$ 1.234,56".into())), 123456);
    }

    #[test]
    fn formatted_string_with_separator_is_major_units() {
        // A dotted-thousands string carries a separator, so it is a
        // formatted decimal amount even though it parses to an integer:
        // "1.500" is R$ 1.500,00, not 1500 centavos.
        assert_eq!(untagged(RawPrice::Text("1.500".into())), 150_000);
        assert_eq!(untagged(RawPrice::Text("1.234".into())), 123_400);
        assert_eq!(untagged(RawPrice::Text("R$ 2.000".into())), 200_000);
        // A bare digit string has no separator; the cents heuristic holds.
        assert_eq!(untagged(RawPrice::Text("1500".into())), 1500);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = untagged(RawPrice::Number(49.9));
        let twice = untagged(RawPrice::Number(once as f64));
        assert_eq!(once, twice);

        // Tagged minor input is always a no-op regardless of magnitude.
        let small = to_cents(&RawPrice::Number(500.0), Some(PriceUnit::Minor));
        assert_eq!(small, 500);
        assert_eq!(to_cents(&RawPrice::Number(small as f64), Some(PriceUnit::Minor)), 500);
    }

    #[test]
    fn explicit_unit_tag_disables_heuristic() {
        // 1000 is ambiguous untagged; the tag resolves it both ways.
        assert_eq!(to_cents(&RawPrice::Number(1000.0), Some(PriceUnit::Minor)), 1000);
        assert_eq!(to_cents(&RawPrice::Number(1000.0), Some(PriceUnit::Major)), 100_000);
    }

    #[test]
    fn malformed_price_becomes_zero() {
        assert_eq!(untagged(RawPrice::Text("grátis".into())), 0);
        assert_eq!(untagged(RawPrice::Text("".into())), 0);
        assert_eq!(untagged(RawPrice::Number(f64::NAN)), 0);
    }

    #[test]
    fn quantity_coercion() {
        assert_eq!(normalize_quantity(Some(&RawQuantity::Number(3.0))), 3);
        assert_eq!(normalize_quantity(Some(&RawQuantity::Text("2".into()))), 2);
        assert_eq!(normalize_quantity(Some(&RawQuantity::Text("nope".into()))), 1);
        assert_eq!(normalize_quantity(Some(&RawQuantity::Number(0.0))), 1);
        assert_eq!(normalize_quantity(Some(&RawQuantity::Number(-2.0))), 1);
        assert_eq!(normalize_quantity(None), 1);
    }

    #[test]
    fn line_defaults() {
        let line = normalize_line(&RawCartLine {
            id: None,
            name: None,
            price: Some(RawPrice::Text("R$ 54,90".into())),
            unit: None,
            quantity: None,
        });
        assert_eq!(line.unit_price_cents, 5490);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.name, "Item");
    }

    #[test]
    fn only_digits_strips_formatting() {
        assert_eq!(only_digits("(11) 99999-9999"), "11999999999");
        assert_eq!(only_digits("01311-000"), "01311000");
    }
}
