//! The timed unit envelope shared by giveaways, polls and scheduled messages.
//!
//! A `TimedUnit` is the durable record the scheduler works from. The feature-specific
//! data lives in `UnitPayload`; everything the scheduler needs (identity, state and
//! fire policy) lives on the envelope.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{giveaway::GiveawayPayload, poll::PollPayload, schedule::SchedulePayload};

/// Feature a timed unit belongs to. Each kind is stored in its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Giveaway,
    Poll,
    Schedule,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Giveaway, UnitKind::Poll, UnitKind::Schedule];

    /// File name of this kind's collection inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Giveaway => "giveaways.json",
            Self::Poll => "polls.json",
            Self::Schedule => "schedules.json",
        }
    }

    /// Human label used in replies.
    pub fn label(self) -> &'static str {
        match self {
            Self::Giveaway => "Giveaway",
            Self::Poll => "Poll",
            Self::Schedule => "Schedule",
        }
    }
}

/// Lifecycle state of a unit. Only ever moves from `Active` to `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Active,
    Ended,
}

/// When a unit fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FirePolicy {
    /// Fire a single time at `at`.
    Once { at: DateTime<Utc> },
    /// Fire every `interval_secs`, next at `next_fire_at`.
    Repeating {
        interval_secs: u64,
        next_fire_at: DateTime<Utc>,
    },
}

impl FirePolicy {
    /// The instant the unit is next due.
    pub fn due_at(&self) -> DateTime<Utc> {
        match self {
            Self::Once { at } => *at,
            Self::Repeating { next_fire_at, .. } => *next_fire_at,
        }
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::Repeating { .. })
    }

    /// Moves a repeating policy forward to `fired_at + interval`.
    ///
    /// The next fire is measured from the moment of firing, not from the previous
    /// scheduled instant, so spacing drifts when firing runs late. The new value is
    /// only applied when it is strictly later than the current one.
    ///
    /// # Returns
    /// - `Some(next)` - The new `next_fire_at`
    /// - `None` - The policy is one-shot, or the addition overflowed
    pub fn advance(&mut self, fired_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let Self::Repeating {
            interval_secs,
            next_fire_at,
        } = self
        else {
            return None;
        };

        let interval = Duration::try_seconds(i64::try_from(*interval_secs).ok()?)?;
        let candidate = fired_at.checked_add_signed(interval)?;
        if candidate > *next_fire_at {
            *next_fire_at = candidate;
        }

        Some(*next_fire_at)
    }
}

/// Feature-specific data carried by a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitPayload {
    Giveaway(GiveawayPayload),
    Poll(PollPayload),
    Schedule(SchedulePayload),
}

impl UnitPayload {
    pub fn kind(&self) -> UnitKind {
        match self {
            Self::Giveaway(_) => UnitKind::Giveaway,
            Self::Poll(_) => UnitKind::Poll,
            Self::Schedule(_) => UnitKind::Schedule,
        }
    }
}

/// One giveaway, poll or scheduled message.
///
/// For giveaways and polls `id` is the announcement message's own id; scheduled
/// messages use a synthesized timestamp id. Identity fields never change after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedUnit {
    #[serde(with = "crate::util::snowflake")]
    pub id: u64,
    #[serde(with = "crate::util::snowflake")]
    pub guild_id: u64,
    #[serde(with = "crate::util::snowflake")]
    pub channel_id: u64,
    #[serde(with = "crate::util::snowflake")]
    pub creator_id: u64,
    pub created_at: DateTime<Utc>,
    pub state: UnitState,
    pub fire_policy: FirePolicy,
    pub payload: UnitPayload,
}

impl TimedUnit {
    pub fn kind(&self) -> UnitKind {
        self.payload.kind()
    }

    pub fn key(&self) -> UnitKey {
        UnitKey::new(self.kind(), self.guild_id, self.id)
    }

    pub fn is_active(&self) -> bool {
        self.state == UnitState::Active
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.fire_policy.due_at()
    }

    /// Marks the unit `Ended`. Has no effect on an already ended unit.
    pub fn end(&mut self) {
        self.state = UnitState::Ended;
    }
}

/// In-memory address of a unit: ids are only unique per guild and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitKey {
    pub kind: UnitKind,
    pub guild_id: u64,
    pub unit_id: u64,
}

impl UnitKey {
    pub fn new(kind: UnitKind, guild_id: u64, unit_id: u64) -> Self {
        Self {
            kind,
            guild_id,
            unit_id,
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (guild {})",
            self.kind.label().to_lowercase(),
            self.unit_id,
            self.guild_id
        )
    }
}

/// What the scheduler should do once a fire has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The unit is finished; drop its registry entry.
    Retired,
    /// Arm the unit again for the given instant.
    Rearm(DateTime<Utc>),
}
