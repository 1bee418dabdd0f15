//! JSON shapes served by the customer endpoint.

use crm_core::domain::{Customer, CustomerId, LastInteraction};
use crm_core::time::{parse_iso_date, parse_iso_timestamp, TimeParseError};
use serde::Deserialize;
use tracing::debug;

use crate::{ApiError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl From<RawId> for CustomerId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(value) => CustomerId::from(value),
            RawId::Text(value) => CustomerId::new(value),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    id: RawId,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    birthday: Option<String>,
    #[serde(default)]
    last_interaction: Option<InteractionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct InteractionRecord {
    #[serde(default)]
    date: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl CustomerRecord {
    /// Unreadable dates become `None`; the record itself is kept.
    pub fn into_customer(self) -> Customer {
        let id = CustomerId::from(self.id);
        let full_name = match self.full_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
        };

        let birthday = lenient(&id, "birthday", self.birthday.as_deref(), parse_iso_date);
        let (occurred_at, channel) = match self.last_interaction {
            Some(interaction) => (
                lenient(
                    &id,
                    "lastInteraction.date",
                    interaction.date.as_deref(),
                    parse_iso_timestamp,
                ),
                interaction.kind.unwrap_or_default(),
            ),
            None => (None, String::new()),
        };

        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name,
            company: self.company.unwrap_or_default(),
            birthday,
            last_interaction: LastInteraction {
                occurred_at,
                channel,
            },
        }
    }
}

fn lenient<T>(
    id: &CustomerId,
    field: &'static str,
    raw: Option<&str>,
    parse: fn(&str) -> std::result::Result<T, TimeParseError>,
) -> Option<T> {
    let raw = raw?;
    match parse(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(customer = %id, field, value = raw, error = %err, "ignoring unreadable date");
            None
        }
    }
}

pub fn parse_customers(body: &str) -> Result<Vec<Customer>> {
    let records: Vec<CustomerRecord> =
        serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(records
        .into_iter()
        .map(CustomerRecord::into_customer)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::parse_customers;
    use crate::ApiError;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crm_core::domain::Channel;

    #[test]
    fn parses_backend_payload() {
        let body = r#"[
            {
                "id": 7,
                "firstName": "Ana",
                "lastName": "García",
                "fullName": "Ana García",
                "company": "TechCorp S.A.",
                "birthday": "1990-02-15",
                "lastInteraction": {"date": "2025-06-27T14:05:00Z", "type": "Phone"}
            },
            {
                "id": "c-2",
                "firstName": "Carlos",
                "lastName": "Rodríguez",
                "company": "Innovate Ltd.",
                "birthday": "1985-07-03",
                "lastInteraction": {"date": "2025-06-25", "type": "Telegram"}
            }
        ]"#;
        let customers = parse_customers(body).expect("parse");
        assert_eq!(customers.len(), 2);

        let ana = &customers[0];
        assert_eq!(ana.id.as_str(), "7");
        assert_eq!(ana.birthday, NaiveDate::from_ymd_opt(1990, 2, 15));
        assert_eq!(
            ana.last_interaction.occurred_at,
            Some(
                Utc.with_ymd_and_hms(2025, 6, 27, 14, 5, 0)
                    .unwrap()
                    .timestamp()
            )
        );
        assert_eq!(ana.last_interaction.category(), Channel::Phone);

        let carlos = &customers[1];
        assert_eq!(carlos.id.as_str(), "c-2");
        assert_eq!(carlos.full_name, "Carlos Rodríguez");
        assert_eq!(carlos.last_interaction.category(), Channel::Message);
    }

    #[test]
    fn unreadable_dates_are_kept_as_missing() {
        let body = r#"[{
            "id": 1,
            "firstName": "Juan",
            "lastName": "Pérez",
            "fullName": "Juan Pérez",
            "company": "StartupXYZ",
            "birthday": "Invalid Date",
            "lastInteraction": {"date": null, "type": "Facebook"}
        }]"#;
        let customers = parse_customers(body).expect("parse");
        assert_eq!(customers[0].birthday, None);
        assert_eq!(customers[0].last_interaction.occurred_at, None);
        assert_eq!(customers[0].last_interaction.channel, "Facebook");
    }

    #[test]
    fn missing_interaction_defaults_to_empty_label() {
        let body = r#"[{"id": 3, "firstName": "María", "lastName": "López"}]"#;
        let customers = parse_customers(body).expect("parse");
        assert_eq!(customers[0].full_name, "María López");
        assert_eq!(customers[0].company, "");
        assert_eq!(customers[0].last_interaction.category(), Channel::Message);
    }

    #[test]
    fn non_array_payload_is_rejected() {
        let err = parse_customers(r#"{"detail": "Not found."}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
