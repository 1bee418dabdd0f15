use crate::domain::channel::Channel;
use crate::domain::ids::CustomerId;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastInteraction {
    /// Unix seconds; `None` when the backend sent an unreadable timestamp.
    pub occurred_at: Option<i64>,
    pub channel: String,
}

impl LastInteraction {
    pub fn category(&self) -> Channel {
        Channel::classify(&self.channel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub company: String,
    pub birthday: Option<NaiveDate>,
    pub last_interaction: LastInteraction,
}

impl Customer {
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .collect()
    }

    /// Case-insensitive substring match against full name or company.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.full_name.to_lowercase().contains(needle_lower)
            || self.company.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::{Customer, LastInteraction};
    use crate::domain::CustomerId;

    fn customer(first: &str, last: &str, company: &str) -> Customer {
        Customer {
            id: CustomerId::new("1"),
            first_name: first.to_string(),
            last_name: last.to_string(),
            full_name: format!("{first} {last}"),
            company: company.to_string(),
            birthday: None,
            last_interaction: LastInteraction {
                occurred_at: None,
                channel: "Phone".to_string(),
            },
        }
    }

    #[test]
    fn initials_use_first_letters() {
        assert_eq!(customer("Ana", "García", "TechCorp").initials(), "AG");
        assert_eq!(customer("Élodie", "Ñúñez", "X").initials(), "ÉÑ");
        assert_eq!(customer("", "Solo", "X").initials(), "S");
    }

    #[test]
    fn search_matches_name_or_company() {
        let c = customer("Ana", "García", "TechCorp S.A.");
        assert!(c.matches_search("garcía"));
        assert!(c.matches_search("techcorp"));
        assert!(c.matches_search(""));
        assert!(!c.matches_search("innovate"));
    }
}
