//! Sample records shown when the customer endpoint cannot be reached.

use crate::domain::{Customer, CustomerId, LastInteraction};
use chrono::{NaiveDate, TimeZone, Utc};

struct Sample {
    id: i64,
    first_name: &'static str,
    last_name: &'static str,
    company: &'static str,
    birthday: (i32, u32, u32),
    interaction: (i32, u32, u32),
    channel: &'static str,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        id: 1,
        first_name: "Ana",
        last_name: "García",
        company: "TechCorp S.A.",
        birthday: (1990, 2, 15),
        interaction: (2025, 6, 27),
        channel: "Phone",
    },
    Sample {
        id: 2,
        first_name: "Carlos",
        last_name: "Rodríguez",
        company: "Innovate Ltd.",
        birthday: (1985, 7, 3),
        interaction: (2025, 6, 25),
        channel: "Email",
    },
    Sample {
        id: 3,
        first_name: "María",
        last_name: "López",
        company: "Global Solutions",
        birthday: (1992, 12, 20),
        interaction: (2025, 6, 28),
        channel: "SMS",
    },
    Sample {
        id: 4,
        first_name: "Juan",
        last_name: "Pérez",
        company: "StartupXYZ",
        birthday: (1988, 6, 30),
        interaction: (2025, 6, 20),
        channel: "Facebook",
    },
    Sample {
        id: 5,
        first_name: "Elena",
        last_name: "Martínez",
        company: "Enterprise Co.",
        birthday: (1995, 1, 10),
        interaction: (2025, 6, 26),
        channel: "Phone",
    },
];

pub fn fallback_customers() -> Vec<Customer> {
    SAMPLES.iter().map(to_customer).collect()
}

fn to_customer(sample: &Sample) -> Customer {
    let (by, bm, bd) = sample.birthday;
    let (iy, im, iday) = sample.interaction;
    Customer {
        id: CustomerId::from(sample.id),
        first_name: sample.first_name.to_string(),
        last_name: sample.last_name.to_string(),
        full_name: format!("{} {}", sample.first_name, sample.last_name),
        company: sample.company.to_string(),
        birthday: NaiveDate::from_ymd_opt(by, bm, bd),
        last_interaction: LastInteraction {
            occurred_at: Utc
                .with_ymd_and_hms(iy, im, iday, 0, 0, 0)
                .single()
                .map(|dt| dt.timestamp()),
            channel: sample.channel.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_customers;

    #[test]
    fn fallback_set_is_complete() {
        let customers = fallback_customers();
        assert_eq!(customers.len(), 5);
        assert!(customers.iter().all(|c| c.birthday.is_some()));
        assert!(customers
            .iter()
            .all(|c| c.last_interaction.occurred_at.is_some()));
        assert_eq!(customers[0].full_name, "Ana García");
        assert_eq!(customers[0].id.as_str(), "1");
    }
}
