//! Integer, boolean, decimal and floating-point parsers.
//!
//! Every parser returns `None` on failure; the caller attaches column context.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::locale::NumberLocale;

/// Parses a culture-invariant integer: optional sign followed by digits only.
pub fn parse_integer<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse::<T>().ok()
}

/// Parses `1`/`0`, `true`/`false` and `S`/`N` (any case).
pub fn parse_bool(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("s") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("n")
    {
        Some(false)
    } else {
        None
    }
}

/// Parses a decimal with the regional convention, then the invariant one.
///
/// The regional pass accepts currency symbols and parenthesised negatives
/// and requires well-formed digit groups, so `1234.56` is rejected there and
/// read by the invariant pass instead. `1.234` is a regional thousand.
pub fn parse_decimal(raw: &str, regional: &NumberLocale) -> Option<Decimal> {
    parse_with_locale(raw, regional, NumberStyle::CURRENCY)
        .or_else(|| parse_with_locale(raw, &NumberLocale::invariant(), NumberStyle::NUMBER))
}

/// Parses a culture-invariant float; `,` thousands separators are ignored.
pub fn parse_f64(raw: &str) -> Option<f64> {
    let cleaned = strip_invariant_groups(raw)?;
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Single-precision variant of [`parse_f64`]; values out of `f32` range fail.
pub fn parse_f32(raw: &str) -> Option<f32> {
    let cleaned = strip_invariant_groups(raw)?;
    cleaned.parse::<f32>().ok().filter(|value| value.is_finite())
}

fn strip_invariant_groups(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.starts_with(',') || value.contains(",,") {
        return None;
    }
    Some(value.replace(',', ""))
}

#[derive(Debug, Clone, Copy)]
struct NumberStyle {
    allow_currency: bool,
    strict_grouping: bool,
}

impl NumberStyle {
    const CURRENCY: Self = Self {
        allow_currency: true,
        strict_grouping: true,
    };
    const NUMBER: Self = Self {
        allow_currency: false,
        strict_grouping: false,
    };
}

fn parse_with_locale(raw: &str, locale: &NumberLocale, style: NumberStyle) -> Option<Decimal> {
    let mut body = raw.trim();
    let mut negative = false;

    if style.allow_currency
        && let Some(inner) = body.strip_prefix('(').and_then(|s| s.strip_suffix(')'))
    {
        negative = true;
        body = inner.trim();
    }

    // Sign and currency symbol may appear in either order on each side.
    let mut saw_currency = false;
    let mut saw_sign = negative;
    for _ in 0..2 {
        if !saw_sign && let Some((rest, is_negative)) = strip_leading_sign(body) {
            negative = is_negative;
            saw_sign = true;
            body = rest.trim_start();
        }
        if style.allow_currency && !saw_currency && let Some(rest) = strip_currency_prefix(body, locale) {
            saw_currency = true;
            body = rest.trim_start();
        }
    }
    for _ in 0..2 {
        if !saw_sign && let Some((rest, is_negative)) = strip_trailing_sign(body) {
            negative = is_negative;
            saw_sign = true;
            body = rest.trim_end();
        }
        if style.allow_currency && !saw_currency && let Some(rest) = strip_currency_suffix(body, locale) {
            saw_currency = true;
            body = rest.trim_end();
        }
    }

    let (integral, fraction) = match body.split_once(locale.decimal_separator) {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (body, None),
    };
    let digits = integral_digits(integral, locale.group_separator, style.strict_grouping)?;
    let fraction = fraction.unwrap_or_default();
    if !fraction.bytes().all(|b| b.is_ascii_digit()) || (digits.is_empty() && fraction.is_empty()) {
        return None;
    }

    let mut canonical = String::with_capacity(digits.len() + fraction.len() + 2);
    if negative {
        canonical.push('-');
    }
    canonical.push_str(if digits.is_empty() { "0" } else { &digits });
    if !fraction.is_empty() {
        canonical.push('.');
        canonical.push_str(fraction);
    }
    Decimal::from_str(&canonical).ok()
}

/// Removes group separators from the integral part.
///
/// With strict grouping the first group holds 1-3 digits and every later
/// group exactly 3; otherwise separators may appear between any digits.
fn integral_digits(integral: &str, group_separator: char, strict_grouping: bool) -> Option<String> {
    if !integral.contains(group_separator) {
        return integral
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| integral.to_string());
    }
    let groups: Vec<&str> = integral.split(group_separator).collect();
    let mut digits = String::with_capacity(integral.len());
    for (idx, group) in groups.iter().enumerate() {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if strict_grouping {
            let valid_width = if idx == 0 {
                group.len() <= 3
            } else {
                group.len() == 3
            };
            if !valid_width {
                return None;
            }
        }
        digits.push_str(group);
    }
    Some(digits)
}

fn strip_leading_sign(value: &str) -> Option<(&str, bool)> {
    if let Some(rest) = value.strip_prefix('-') {
        Some((rest, true))
    } else {
        value.strip_prefix('+').map(|rest| (rest, false))
    }
}

fn strip_trailing_sign(value: &str) -> Option<(&str, bool)> {
    if let Some(rest) = value.strip_suffix('-') {
        Some((rest, true))
    } else {
        value.strip_suffix('+').map(|rest| (rest, false))
    }
}

fn strip_currency_prefix<'a>(value: &'a str, locale: &NumberLocale) -> Option<&'a str> {
    locale
        .currency_symbols
        .iter()
        .filter(|symbol| !symbol.is_empty())
        .find_map(|symbol| value.strip_prefix(symbol.as_str()))
}

fn strip_currency_suffix<'a>(value: &'a str, locale: &NumberLocale) -> Option<&'a str> {
    locale
        .currency_symbols
        .iter()
        .filter(|symbol| !symbol.is_empty())
        .find_map(|symbol| value.strip_suffix(symbol.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn regional(raw: &str) -> Option<Decimal> {
        parse_decimal(raw, &NumberLocale::regional())
    }

    #[test]
    fn integers() {
        assert_eq!(parse_integer::<i32>(" 42 "), Some(42));
        assert_eq!(parse_integer::<i32>("-7"), Some(-7));
        assert_eq!(parse_integer::<i16>("40000"), None);
        assert_eq!(parse_integer::<u8>("255"), Some(255));
        assert_eq!(parse_integer::<u8>("-1"), None);
        assert_eq!(parse_integer::<i64>("1,000"), None);
        assert_eq!(parse_integer::<i32>("12a"), None);
        assert_eq!(parse_integer::<i32>("1.0"), None);
    }

    #[test]
    fn booleans() {
        for raw in ["1", "true", "TRUE", "s", "S"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "false", "FALSE", "n", "N"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn regional_then_invariant_decimals() {
        assert_eq!(regional("1.234,56"), Some(dec("1234.56")));
        assert_eq!(regional("1234.56"), Some(dec("1234.56")));
        assert_eq!(regional("1234,56"), Some(dec("1234.56")));
        assert_eq!(regional("1,234.56"), Some(dec("1234.56")));
        assert_eq!(regional("100.50"), Some(dec("100.50")));
        assert_eq!(regional("1.234"), Some(dec("1234")));
    }

    #[test]
    fn currency_and_signs() {
        assert_eq!(regional("$ 1.500,25"), Some(dec("1500.25")));
        assert_eq!(regional("1.500,25 €"), Some(dec("1500.25")));
        assert_eq!(regional("-$5,5"), Some(dec("-5.5")));
        assert_eq!(regional("$-5,5"), Some(dec("-5.5")));
        assert_eq!(regional("(1.000,00)"), Some(dec("-1000.00")));
        assert_eq!(regional("12-"), Some(dec("-12")));
        assert_eq!(regional(",5"), Some(dec("0.5")));
    }

    #[test]
    fn invalid_decimals() {
        assert_eq!(regional("abc"), None);
        assert_eq!(regional(""), None);
        assert_eq!(regional("1..2"), None);
        assert_eq!(regional("$"), None);
        assert_eq!(regional("1.2.3,4"), None);
        assert_eq!(regional("--1"), None);
    }

    #[test]
    fn floats() {
        assert_eq!(parse_f64("1,234.5"), Some(1234.5));
        assert_eq!(parse_f64("-0.25"), Some(-0.25));
        assert_eq!(parse_f64("1e3"), Some(1000.0));
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("1,5x"), None);
        assert_eq!(parse_f32("1e39"), None);
        assert_eq!(parse_f32("2.5"), Some(2.5));
    }
}
