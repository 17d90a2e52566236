//! Scheduled messages: creation from a time expression and delivery.

use chrono::{DateTime, Duration, Utc};

use crate::{
    data::{store::JsonStore, timed_unit::TimedUnitRepository},
    error::{gateway::GatewayError, validation::ValidationError, AppError},
    gateway::{
        card::{Card, COLOR_BLUE},
        Gateway, Outgoing,
    },
    model::{
        schedule::{CreateScheduleParams, SchedulePayload},
        unit::{FireOutcome, FirePolicy, TimedUnit, UnitKind, UnitPayload, UnitState},
    },
    service::UTC_DISPLAY_FORMAT,
    util::{
        format::format_interval,
        time::{parse_time_expression, ParsedTime},
    },
};

pub struct ScheduleService<'a> {
    store: &'a JsonStore,
    gateway: &'a dyn Gateway,
}

impl<'a> ScheduleService<'a> {
    pub fn new(store: &'a JsonStore, gateway: &'a dyn Gateway) -> Self {
        Self { store, gateway }
    }

    /// Validates a schedule request and builds its unit.
    ///
    /// The unit id is the creation time in Unix seconds; `UnitLifecycle::create_unit`
    /// bumps it if another schedule in the guild already uses it. Repeating schedules
    /// first fire one interval after creation.
    ///
    /// # Returns
    /// - `Ok(TimedUnit)` - The new schedule, not yet stored or armed
    /// - `Err(AppError::ValidationErr)` - Unparseable or past time, repeat flag mismatch,
    ///   zero interval, or unknown channel
    /// - `Err(AppError::GatewayErr)` - The channel lookup failed for another reason
    pub async fn create(
        &self,
        params: CreateScheduleParams,
        now: DateTime<Utc>,
    ) -> Result<TimedUnit, AppError> {
        let parsed = parse_time_expression(&params.time, now)
            .ok_or(ValidationError::InvalidTimeExpression)?;

        let fire_policy = match parsed {
            ParsedTime::Once(at) => {
                if params.repeat {
                    return Err(ValidationError::RepeatFlagUnexpected(params.time).into());
                }
                if at <= now {
                    return Err(ValidationError::TimeInPast.into());
                }
                FirePolicy::Once { at }
            }
            ParsedTime::Repeating { interval_secs } => {
                if !params.repeat {
                    return Err(ValidationError::RepeatFlagMissing(params.time).into());
                }
                if interval_secs == 0 {
                    return Err(ValidationError::ZeroInterval.into());
                }
                let next_fire_at = i64::try_from(interval_secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .and_then(|interval| now.checked_add_signed(interval))
                    .ok_or(ValidationError::InvalidTimeExpression)?;
                FirePolicy::Repeating {
                    interval_secs,
                    next_fire_at,
                }
            }
        };

        match self.gateway.fetch_channel(params.channel_id).await {
            Err(AppError::GatewayErr(GatewayError::NotFound(_))) => {
                return Err(ValidationError::ChannelNotFound.into())
            }
            other => other?,
        }

        Ok(TimedUnit {
            id: now.timestamp().max(0) as u64,
            guild_id: params.guild_id,
            channel_id: params.channel_id,
            creator_id: params.creator_id,
            created_at: now,
            state: UnitState::Active,
            fire_policy,
            payload: UnitPayload::Schedule(SchedulePayload {
                message: params.message,
                use_embed: params.use_embed,
            }),
        })
    }

    /// Sends a scheduled message.
    ///
    /// One-shot schedules are deleted afterwards. Repeating schedules get their next
    /// fire time moved to one interval after `now`, but only if the record still
    /// exists, so a cancel that raced with delivery wins.
    ///
    /// # Returns
    /// - `Ok(FireOutcome::Rearm(at))` - Repeating schedule advanced to `at`
    /// - `Ok(FireOutcome::Retired)` - One-shot delivered, or the schedule was cancelled
    /// - `Err(AppError)` - Sending or the store update failed
    pub async fn deliver(
        &self,
        unit: &TimedUnit,
        payload: &SchedulePayload,
        now: DateTime<Utc>,
    ) -> Result<FireOutcome, AppError> {
        let message = if payload.use_embed {
            Outgoing::Card(
                Card::new(COLOR_BLUE)
                    .description(&payload.message)
                    .timestamp(now),
            )
        } else {
            Outgoing::Text(payload.message.clone())
        };
        self.gateway.send_message(unit.channel_id, message).await?;

        let repo = TimedUnitRepository::new(self.store);

        if !unit.fire_policy.is_repeating() {
            repo.delete(unit.key()).await?;
            tracing::info!("Delivered one-shot schedule {}", unit.key());
            return Ok(FireOutcome::Retired);
        }

        let updated = repo
            .update(unit.key(), |stored| {
                stored.fire_policy.advance(now);
            })
            .await?;

        match updated {
            Some(stored) => {
                tracing::info!(
                    "Delivered repeating schedule {}, next at {}",
                    unit.key(),
                    stored.due_at()
                );
                Ok(FireOutcome::Rearm(stored.due_at()))
            }
            None => Ok(FireOutcome::Retired),
        }
    }

    /// Schedules of a guild, soonest first, optionally only those created by `creator_id`.
    pub async fn list(
        &self,
        guild_id: u64,
        creator_id: Option<u64>,
    ) -> Result<Vec<TimedUnit>, AppError> {
        let schedules = TimedUnitRepository::new(self.store)
            .get_by_guild(UnitKind::Schedule, guild_id)
            .await?;

        Ok(schedules
            .into_iter()
            .filter(TimedUnit::is_active)
            .filter(|unit| creator_id.is_none_or(|id| unit.creator_id == id))
            .collect())
    }
}

/// Confirmation shown to the person who created a schedule.
pub fn confirmation_text(unit: &TimedUnit) -> String {
    let when = match unit.fire_policy {
        FirePolicy::Once { at } => format!("at {}", at.format(UTC_DISPLAY_FORMAT)),
        FirePolicy::Repeating { interval_secs, .. } => {
            format!("every {}", format_interval(interval_secs))
        }
    };

    format!(
        "Schedule created! I'll send your message to <#{}> {}.\nSchedule ID: `{}`\nUse `/schedulelist` to see all schedules or `/cancelschedule {}` to cancel this schedule.",
        unit.channel_id, when, unit.id, unit.id
    )
}
