use serde::{Deserialize, Serialize};

/// Display category for the medium of the last interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Phone,
    Email,
    Sms,
    Facebook,
    Message,
}

impl Channel {
    /// Labels outside the known set fall back to `Message`.
    pub fn classify(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "phone" => Channel::Phone,
            "email" => Channel::Email,
            "sms" => Channel::Sms,
            "facebook" => Channel::Facebook,
            _ => Channel::Message,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Phone => "phone",
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Facebook => "facebook",
            Channel::Message => "message",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Channel::Phone => "☎",
            Channel::Email => "✉",
            Channel::Sms => "✆",
            Channel::Facebook => "ⓕ",
            Channel::Message => "…",
        }
    }
}
