use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Channel, Customer, CustomerId};
use crate::present::format_birthday;
use crate::rules::{describe_elapsed, is_birthday_this_week};

/// A customer prepared for display: every derived field computed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRowDto {
    pub id: CustomerId,
    pub full_name: String,
    pub initials: String,
    pub company: String,
    pub birthday: String,
    pub birthday_this_week: bool,
    pub last_interaction: String,
    pub last_interaction_at: Option<i64>,
    pub channel: Channel,
    pub channel_label: String,
}

impl CustomerRowDto {
    pub fn from_customer(customer: &Customer, today: NaiveDate, now_utc: i64) -> Self {
        Self {
            id: customer.id.clone(),
            full_name: customer.full_name.clone(),
            initials: customer.initials(),
            company: customer.company.clone(),
            birthday: format_birthday(customer.birthday),
            birthday_this_week: is_birthday_this_week(customer.birthday, today),
            last_interaction: describe_elapsed(customer.last_interaction.occurred_at, now_utc),
            last_interaction_at: customer.last_interaction.occurred_at,
            channel: customer.last_interaction.category(),
            channel_label: customer.last_interaction.channel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CustomerRowDto;
    use crate::domain::Channel;
    use crate::fixtures::fallback_customers;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn row_carries_derived_fields() {
        let customers = fallback_customers();
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let now = Utc
            .with_ymd_and_hms(2025, 6, 28, 9, 0, 0)
            .unwrap()
            .timestamp();

        let row = CustomerRowDto::from_customer(&customers[3], today, now);
        assert_eq!(row.full_name, "Juan Pérez");
        assert_eq!(row.initials, "JP");
        assert_eq!(row.birthday, "June 30");
        assert!(row.birthday_this_week);
        assert_eq!(row.last_interaction, "9 days ago");
        assert_eq!(row.channel, Channel::Facebook);
        assert_eq!(row.channel_label, "Facebook");

        let row = CustomerRowDto::from_customer(&customers[2], today, now);
        assert_eq!(row.channel, Channel::Sms);
        assert!(!row.birthday_this_week);
        assert_eq!(row.last_interaction, "1 day ago");
    }

    #[test]
    fn row_serializes_with_display_strings() {
        let customers = fallback_customers();
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let row = CustomerRowDto::from_customer(&customers[0], today, 0);
        let value = serde_json::to_value(&row).expect("serialize row");
        assert_eq!(value["id"], "1");
        assert_eq!(value["birthday"], "February 15");
        assert_eq!(value["channel"], "phone");
        assert_eq!(value["channel_label"], "Phone");
        assert!(value["last_interaction_at"].is_i64());
    }
}
