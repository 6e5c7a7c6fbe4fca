use serde::{Deserialize, Deserializer};
use serde_json::Value;

const PLACEHOLDER: &str = "Unknown";

/// One freight listing returned by the remote feed. Every field is optional;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Shipment {
    /// Listing identifier. The feed emits these as numbers or strings; both
    /// normalize to one string form used for dedup and deep links.
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub pickup: Option<Location>,
    #[serde(default)]
    pub delivery: Option<Location>,
    #[serde(default)]
    pub budget: Option<Budget>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "stateCode")]
    pub state_code: Option<String>,
}

/// Listing budget as delivered by the feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Budget {
    Number(f64),
    Text(String),
}

impl Shipment {
    /// Markdown alert text for this shipment. Missing sub-fields degrade to
    /// placeholder text rather than failing.
    pub fn alert_text(&self) -> String {
        let (origin_city, origin_state) = place(self.pickup.as_ref());
        let (dest_city, dest_state) = place(self.delivery.as_ref());

        format!(
            "\u{1F4E6} *New Shipment Available!*\n\
             From: `{}, {}`\n\
             To: `{}, {}`\n\
             Budget: *${}*\n\
             [\u{1F517} View on CitizenShipper]({})",
            origin_city,
            origin_state,
            dest_city,
            dest_state,
            self.budget_text(),
            self.listing_url(),
        )
    }

    /// Public deep link for this listing.
    pub fn listing_url(&self) -> String {
        format!(
            "https://citizenshipper.com/shipment/{}",
            self.id.as_deref().unwrap_or_default()
        )
    }

    fn budget_text(&self) -> String {
        match &self.budget {
            Some(Budget::Number(n)) if n.fract() == 0.0 => format!("{}", *n as i64),
            Some(Budget::Number(n)) => format!("{}", n),
            Some(Budget::Text(s)) => s.clone(),
            None => "N/A".to_string(),
        }
    }
}

fn place(location: Option<&Location>) -> (&str, &str) {
    match location {
        Some(l) => (
            l.city.as_deref().unwrap_or(PLACEHOLDER),
            l.state_code.as_deref().unwrap_or(PLACEHOLDER),
        ),
        None => (PLACEHOLDER, PLACEHOLDER),
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Shipment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_id_normalizes_to_string() {
        let shipment = parse(json!({ "id": 12345 }));
        assert_eq!(shipment.id.as_deref(), Some("12345"));
    }

    #[test]
    fn test_string_id_kept_as_is() {
        let shipment = parse(json!({ "id": "abc-1" }));
        assert_eq!(shipment.id.as_deref(), Some("abc-1"));
    }

    #[test]
    fn test_empty_or_missing_id_is_none() {
        assert!(parse(json!({ "id": "" })).id.is_none());
        assert!(parse(json!({})).id.is_none());
        assert!(parse(json!({ "id": null })).id.is_none());
    }

    #[test]
    fn test_alert_text_full_record() {
        let shipment = parse(json!({
            "id": 42,
            "pickup": { "city": "Austin", "stateCode": "TX" },
            "delivery": { "city": "Denver", "stateCode": "CO" },
            "budget": 450
        }));

        let text = shipment.alert_text();
        assert!(text.contains("From: `Austin, TX`"));
        assert!(text.contains("To: `Denver, CO`"));
        assert!(text.contains("Budget: *$450*"));
        assert!(text.contains("https://citizenshipper.com/shipment/42"));
    }

    #[test]
    fn test_alert_text_missing_fields_use_placeholders() {
        let shipment = parse(json!({ "id": 7 }));

        let text = shipment.alert_text();
        assert!(text.contains("From: `Unknown, Unknown`"));
        assert!(text.contains("To: `Unknown, Unknown`"));
        assert!(text.contains("Budget: *$N/A*"));
    }

    #[test]
    fn test_fractional_budget_keeps_fraction() {
        let shipment = parse(json!({ "id": 7, "budget": 450.5 }));
        assert!(shipment.alert_text().contains("Budget: *$450.5*"));
    }

    #[test]
    fn test_text_budget_passed_through() {
        let shipment = parse(json!({ "id": 7, "budget": "350-400" }));
        assert!(shipment.alert_text().contains("Budget: *$350-400*"));
    }
}
