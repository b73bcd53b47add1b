use std::str::FromStr;

use anyhow::{Context, Error, Result};
use reqwest::Client;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

pub async fn make_request(client: &Client, base_url: &str, endpoint: &str) -> Result<Value> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), endpoint);
    debug!(%url, "requesting");
    let res = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    if !res.status().is_success() {
        return Err(Error::msg(format!("Request failed: {}", res.status())));
    }

    let text = res.text().await?;
    let data = serde_json::from_str::<Value>(&text)
        .with_context(|| format!("Response from {} is not valid JSON", url))?;

    Ok(data)
}

/// Deserializes every element that fits `T` and drops the rest.
pub fn parse_response_array<T>(data: Value, what: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    match data {
        Value::Array(items) => {
            let total = items.len();
            let result: Vec<T> = items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| match serde_json::from_value(item) {
                    Ok(parsed) => Some(parsed),
                    Err(err) => {
                        warn!(index, error = %err, "skipping malformed {} entry", what);
                        None
                    }
                })
                .collect();

            if result.len() < total {
                warn!(kept = result.len(), total, "dropped malformed {} entries", what);
            }
            Ok(result)
        }
        _ => Err(Error::msg(format!(
            "Unexpected {} format: not an array",
            what
        ))),
    }
}

pub fn parse_response_object<T>(data: Value, what: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    match data {
        Value::Object(obj) => serde_json::from_value(Value::Object(obj))
            .with_context(|| format!("Failed to parse {}", what)),
        _ => Err(Error::msg(format!(
            "Unexpected {} format: not an object",
            what
        ))),
    }
}

/// Capital gains payloads are sometimes wrapped in a `capitalGains` envelope.
pub fn unwrap_envelope(data: Value, key: &str) -> Value {
    match data {
        Value::Object(mut obj) if obj.contains_key(key) => obj.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

/// Parses plain or scientific notation. Values beyond `Decimal`'s scale are
/// rounded through `f64`; NaN and infinities are rejected.
pub fn parse_decimal(field: &str) -> Option<Decimal> {
    let field = field.trim();
    Decimal::from_str(field)
        .or_else(|_| Decimal::from_scientific(field))
        .ok()
        .or_else(|| {
            field
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .and_then(Decimal::from_f64)
        })
}

pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text),
        _ => None,
    }
}

/// Accepts JSON numbers and numeric strings; anything else becomes `None`.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
