//! Alternate field resolution and tolerant value coercion.
//!
//! The service serializes CSV cells, so a count may arrive as `12`, `12.0`
//! or `"12"`, and the same column may be named differently across endpoints.
//! A [`FieldChain`] lists the candidate names for one canonical field; the
//! first candidate that is present (and, for typed lookups, convertible)
//! wins.

use serde_json::Value;

/// Ordered candidate field names for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    names: &'static [&'static str],
}

impl FieldChain {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// First candidate present with a non-null value, with the name that matched.
    pub fn first_present<'a>(&self, row: &'a Value) -> Option<(&'static str, &'a Value)> {
        let obj = row.as_object()?;
        self.names
            .iter()
            .find_map(|name| match obj.get(*name) {
                Some(Value::Null) | None => None,
                Some(v) => Some((*name, v)),
            })
    }

    /// First candidate that `convert` accepts.
    pub fn resolve<T>(&self, row: &Value, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let obj = row.as_object()?;
        self.names
            .iter()
            .filter_map(|name| obj.get(*name))
            .find_map(|v| convert(v))
    }

    /// First candidate holding non-blank text (strings, or numbers rendered as text).
    pub fn text(&self, row: &Value) -> Option<String> {
        self.resolve(row, as_text)
    }

    pub fn u64(&self, row: &Value) -> Option<u64> {
        self.resolve(row, as_u64)
    }

    pub fn f64(&self, row: &Value) -> Option<f64> {
        self.resolve(row, as_f64)
    }

    /// First present value coerced to f64; a present but non-numeric value yields `default`.
    ///
    /// Unlike [`FieldChain::f64`], a later candidate never rescues an unparseable earlier one.
    pub fn f64_or(&self, row: &Value, default: f64) -> f64 {
        self.first_present(row)
            .and_then(|(_, v)| as_f64(v))
            .unwrap_or(default)
    }
}

/// Text content of a string or number; blank strings count as absent.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Numbers render without a trailing `.0` when integral.
pub fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Finite f64 from a number or numeric string.
pub fn as_f64(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// Non-negative integer from an integer, integral float, or numeric string.
pub fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_u64))
        }
        _ => None,
    }
}

fn integral_u64(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

/// JSON type name for error messages.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Boolean flag; anything else is `false`.
pub fn as_flag(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TERM: FieldChain = FieldChain::new(&["term", "word", "token"]);
    const COUNT: FieldChain = FieldChain::new(&["count", "frequency"]);

    #[test]
    fn test_first_candidate_wins() {
        let row = json!({"word": "strike", "term": "attack"});
        assert_eq!(TERM.text(&row).as_deref(), Some("attack"));
    }

    #[test]
    fn test_falls_through_missing_and_null() {
        let row = json!({"term": null, "token": "siege"});
        assert_eq!(TERM.text(&row).as_deref(), Some("siege"));
    }

    #[test]
    fn test_blank_text_counts_as_absent() {
        let row = json!({"term": "  ", "word": "ceasefire"});
        assert_eq!(TERM.text(&row).as_deref(), Some("ceasefire"));
    }

    #[test]
    fn test_typed_lookup_skips_wrong_type() {
        let row = json!({"count": "many", "frequency": 7});
        assert_eq!(COUNT.u64(&row), Some(7));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        assert_eq!(as_u64(&json!("12")), Some(12));
        assert_eq!(as_u64(&json!(" 12 ")), Some(12));
        assert_eq!(as_u64(&json!(12.0)), Some(12));
        assert_eq!(as_u64(&json!("3.0")), Some(3));
        assert_eq!(as_u64(&json!(-1)), None);
        assert_eq!(as_u64(&json!(2.5)), None);
        assert_eq!(as_f64(&json!("-0.25")), Some(-0.25));
        assert_eq!(as_f64(&json!("NaN")), None);
        assert_eq!(as_f64(&json!(true)), None);
    }

    #[test]
    fn test_f64_or_does_not_fall_through() {
        let chain = FieldChain::new(&["compound", "score"]);
        let row = json!({"compound": "n/a", "score": 0.7});
        assert_eq!(chain.f64_or(&row, 0.0), 0.0);

        let row = json!({"score": "0.7"});
        assert_eq!(chain.f64_or(&row, 0.0), 0.7);

        assert_eq!(chain.f64_or(&json!({}), 0.0), 0.0);
    }

    #[test]
    fn test_number_text_drops_integral_fraction() {
        assert_eq!(as_text(&json!(2)).as_deref(), Some("2"));
        assert_eq!(as_text(&json!(2.0)).as_deref(), Some("2"));
        assert_eq!(as_text(&json!(1.5)).as_deref(), Some("1.5"));
    }

    #[test]
    fn test_non_object_rows_resolve_to_none() {
        assert!(TERM.text(&json!("attack")).is_none());
        assert!(TERM.first_present(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_as_flag() {
        assert!(as_flag(Some(&json!(true))));
        assert!(!as_flag(Some(&json!("true"))));
        assert!(!as_flag(None));
    }
}
