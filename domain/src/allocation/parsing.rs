//! Estimate parsing from free-form estimator output.
//!
//! Estimators frequently wrap their answer in prose or return weights in
//! several shapes. These functions are pure: no I/O, just extraction and
//! numeric coercion.
//!
//! | Value shape | Example | Weight |
//! |-------------|---------|--------|
//! | number | `0.35` | `0.35` |
//! | numeric string | `"35"`, `"35%"` | `35.0` |
//! | object | `{"count": 12}`, `{"pct": 40}`, `{"rate": 0.4}` | first present field |

use super::estimate::RawEstimate;
use serde_json::Value;

/// Coerce a JSON value into a weight.
///
/// Returns `None` for anything that is not a finite number after coercion.
/// Negative values are returned as-is; reconciliation decides what to do
/// with them.
pub fn coerce_weight(value: &Value) -> Option<f64> {
    let weight = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        Value::Object(obj) => ["count", "pct", "percentage", "rate", "weight"]
            .iter()
            .find_map(|key| obj.get(*key))
            .and_then(coerce_weight),
        _ => None,
    }?;
    weight.is_finite().then_some(weight)
}

/// Parse an estimator response into a [`RawEstimate`].
///
/// Reads the first JSON object in the text; stray braces that do not
/// start valid JSON are skipped. If that object has a
/// `distribution`, `rates` or `results` field holding an object, that inner
/// object is used. Entries whose values cannot be coerced are dropped.
///
/// # Examples
///
/// ```
/// use survey_domain::allocation::parse_rate_estimate;
///
/// let est = parse_rate_estimate(r#"Sure! {"Yes": 0.7, "No": "30%"}"#).unwrap();
/// assert_eq!(est.weight("Yes"), Some(0.7));
/// assert_eq!(est.weight("No"), Some(30.0));
///
/// assert!(parse_rate_estimate("no structured data").is_none());
/// ```
pub fn parse_rate_estimate(text: &str) -> Option<RawEstimate> {
    let obj = text.match_indices('{').find_map(|(start, _)| {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(Value::Object(obj))) => Some(obj),
            _ => None,
        }
    })?;

    let nested = ["distribution", "rates", "results"]
        .iter()
        .find_map(|key| match obj.get(*key) {
            Some(Value::Object(inner)) => Some(inner.clone()),
            _ => None,
        });
    let obj = nested.unwrap_or(obj);

    let estimate = RawEstimate::from(obj);
    (!estimate.is_empty()).then_some(estimate)
}
