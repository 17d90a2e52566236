//! Platform-neutral rich card.
//!
//! Cards are built by the services and rendered to serenity embeds only inside the
//! gateway adapter, which keeps the services testable without a Discord client.

use chrono::{DateTime, Utc};

pub const COLOR_GREEN: u32 = 0x2ECC71;
pub const COLOR_BLUE: u32 = 0x3498DB;
pub const COLOR_DARK_GRAY: u32 = 0x607D8B;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Card {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<CardField>,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new(color: u32) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
