//! Dynamic typing of raw text cells.

use semlens_model::Value;

/// Type a text cell: empty becomes `Null`, `true`/`false` (any case) become
/// booleans, plain decimal literals become numbers, anything else stays text.
pub fn infer_value(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    match parse_decimal(text) {
        Some(number) => Value::Number(number),
        None => Value::String(text.to_string()),
    }
}

/// Accepts `-12`, `3.5`, `.5`, `1e6`; rejects `inf`, `NaN`, `0x10`, and
/// text with surrounding whitespace.
fn parse_decimal(text: &str) -> Option<f64> {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let first = digits.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    if !digits
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
    {
        return None;
    }
    // Leading zeros mark identifiers such as zip codes.
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_scalars() {
        assert_eq!(infer_value(""), Value::Null);
        assert_eq!(infer_value("TRUE"), Value::Bool(true));
        assert_eq!(infer_value("false"), Value::Bool(false));
        assert_eq!(infer_value("-1.5"), Value::Number(-1.5));
        assert_eq!(infer_value(".5"), Value::Number(0.5));
        assert_eq!(infer_value("2e3"), Value::Number(2000.0));
        assert_eq!(infer_value("0"), Value::Number(0.0));
    }

    #[test]
    fn keeps_non_numeric_text() {
        for text in ["inf", "NaN", "0x10", "12abc", "01234", "1-2", " 5"] {
            assert_eq!(infer_value(text), Value::String(text.to_string()), "{text}");
        }
    }
}
