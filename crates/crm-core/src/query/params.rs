use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Name,
    Company,
    Birthday,
    LastInteraction,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::Company,
        SortKey::Birthday,
        SortKey::LastInteraction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Company => "company",
            SortKey::Birthday => "birthday",
            SortKey::LastInteraction => "last-interaction",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SortKey::Name => "Full name",
            SortKey::Company => "Company",
            SortKey::Birthday => "Birthday",
            SortKey::LastInteraction => "Last interaction",
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "name" => Ok(SortKey::Name),
            "company" => Ok(SortKey::Company),
            "birthday" => Ok(SortKey::Birthday),
            "last-interaction" | "last_interaction" | "lastinteraction" => {
                Ok(SortKey::LastInteraction)
            }
            _ => Err(CoreError::InvalidSortKey(raw.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(CoreError::InvalidSortDirection(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BirthdayMode {
    #[default]
    All,
    ThisWeek,
}

impl BirthdayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BirthdayMode::All => "all",
            BirthdayMode::ThisWeek => "this-week",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            BirthdayMode::All => BirthdayMode::ThisWeek,
            BirthdayMode::ThisWeek => BirthdayMode::All,
        }
    }
}

impl FromStr for BirthdayMode {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "all" | "" => Ok(BirthdayMode::All),
            "this-week" | "this_week" | "thisweek" | "week" => Ok(BirthdayMode::ThisWeek),
            _ => Err(CoreError::InvalidBirthdayMode(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            direction: SortDirection::Asc,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Sorting again on the active ascending key flips to descending;
    /// anything else starts over ascending on `key`.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { key, direction }
    }
}

/// Everything the derived view depends on besides the records and the date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub search: String,
    pub birthdays: BirthdayMode,
    pub sort: SortConfig,
}

impl QueryParams {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_birthdays(mut self, birthdays: BirthdayMode) -> Self {
        self.birthdays = birthdays;
        self
    }

    pub fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort = sort;
        self
    }
}
