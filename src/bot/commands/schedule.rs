use chrono::Utc;
use serenity::all::{ChannelType, CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

use crate::{
    bot::commands::{Caller, CommandArgs, Reply, MAX_LIST_FIELDS},
    data::timed_unit::TimedUnitRepository,
    error::{validation::ValidationError, AppError},
    gateway::card::{Card, COLOR_BLUE},
    model::{
        schedule::CreateScheduleParams,
        unit::{FirePolicy, UnitKey, UnitKind, UnitPayload},
    },
    service::{
        lifecycle::UnitLifecycle,
        schedule::{confirmation_text, ScheduleService},
        UTC_DISPLAY_FORMAT,
    },
    state::AppState,
    util::{
        format::{format_interval, format_time_left, truncate},
        parse::parse_u64_from_string,
    },
};

const PREVIEW_CHARS: usize = 50;

pub fn commands() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("schedule")
            .description("Schedule a message to be sent later")
            .default_member_permissions(Permissions::MANAGE_MESSAGES)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "The channel to send the message in",
                )
                .channel_types(vec![ChannelType::Text])
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "time",
                    "When to send the message (e.g., 'in 10 minutes', '18:00', '2026-12-25 12:00')",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "message",
                    "The message to send",
                )
                .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::Boolean,
                "repeat",
                "Whether the schedule should repeat (default: false)",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::Boolean,
                "embed",
                "Whether to send the message as an embed (default: false)",
            )),
        CreateCommand::new("schedulelist")
            .description("List all scheduled messages")
            .add_option(CreateCommandOption::new(
                CommandOptionType::Boolean,
                "show_all",
                "Whether to show schedules for the entire server or just yours (requires manage_messages)",
            )),
        CreateCommand::new("cancelschedule")
            .description("Cancel a scheduled message")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "schedule_id",
                    "The ID of the schedule to cancel",
                )
                .required(true),
            ),
    ]
}

/// `/schedule`: validates the time expression, stores the schedule and arms it.
pub async fn create(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    let params = CreateScheduleParams {
        guild_id: caller.guild_id,
        channel_id: args.required_channel("channel")?,
        creator_id: caller.user_id,
        time: args.required_string("time")?.to_string(),
        message: args.required_string("message")?.to_string(),
        repeat: args.flag("repeat"),
        use_embed: args.flag("embed"),
    };

    let unit = ScheduleService::new(&state.store, state.gateway.as_ref())
        .create(params, Utc::now())
        .await?;
    let unit = UnitLifecycle::new(&state.store, &state.scheduler)
        .create_unit(unit)
        .await?;

    Ok(Reply::Text(confirmation_text(&unit)))
}

/// `/schedulelist`: the caller's schedules, or every schedule in the guild when
/// `show_all` is set by someone with manage messages.
pub async fn list(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    let show_all = args.flag("show_all") && caller.permissions.manage_messages();
    let service = ScheduleService::new(&state.store, state.gateway.as_ref());

    if service.list(caller.guild_id, None).await?.is_empty() {
        return Ok(Reply::text("There are no scheduled messages in this server."));
    }

    let creator = (!show_all).then_some(caller.user_id);
    let schedules = service.list(caller.guild_id, creator).await?;
    if schedules.is_empty() {
        return Ok(Reply::text(
            "You don't have any scheduled messages. Use /schedule to create one.",
        ));
    }

    let now = Utc::now();
    let mut card = Card::new(COLOR_BLUE)
        .title("Scheduled Messages")
        .description(format!(
            "Found {} scheduled message(s).",
            schedules.len()
        ));

    for unit in schedules.iter().take(MAX_LIST_FIELDS) {
        let UnitPayload::Schedule(payload) = &unit.payload else {
            continue;
        };
        let timing = match unit.fire_policy {
            FirePolicy::Repeating {
                interval_secs,
                next_fire_at,
            } => format!(
                "**Next run:** {}\n**Repeats:** Every {}",
                format_time_left(next_fire_at, now),
                format_interval(interval_secs)
            ),
            FirePolicy::Once { at } => format!(
                "**Runs in:** {}\n**Date:** {}",
                format_time_left(at, now),
                at.format(UTC_DISPLAY_FORMAT)
            ),
        };
        let format = if payload.use_embed {
            "Embed"
        } else {
            "Plain text"
        };

        card = card.field(
            format!("Schedule ID: {}", unit.id),
            format!(
                "**Channel:** <#{}>\n{}\n**Message:** {}\n**Format:** {}",
                unit.channel_id,
                timing,
                truncate(&payload.message, PREVIEW_CHARS),
                format
            ),
            false,
        );
    }

    Ok(Reply::Card(card))
}

/// `/cancelschedule`: removes a schedule. Only its creator or someone with manage
/// messages may do this.
pub async fn cancel(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    let id = parse_u64_from_string(args.required_string("schedule_id")?)?;
    let key = UnitKey::new(UnitKind::Schedule, caller.guild_id, id);

    let unit = TimedUnitRepository::new(&state.store)
        .get(key)
        .await?
        .ok_or(ValidationError::UnitNotFound(UnitKind::Schedule.label()))?;
    if unit.creator_id != caller.user_id && !caller.permissions.manage_messages() {
        return Err(ValidationError::NotScheduleOwner.into());
    }

    UnitLifecycle::new(&state.store, &state.scheduler)
        .cancel_unit(key)
        .await?;

    Ok(Reply::Text(format!(
        "Schedule {} has been cancelled successfully.",
        id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use test_utils::{builder::TestBuilder, factory::schedule::ScheduleFactory};

    use crate::{
        bot::commands::{
            test_support::{caller, state_with},
            ArgValue,
        },
        gateway::mock::MockGateway,
    };

    fn text(value: &str) -> ArgValue {
        ArgValue::String(value.to_string())
    }

    /// Tests creating a repeating schedule from command options.
    ///
    /// Expected: confirmation mentions the interval and the unit is armed
    #[tokio::test]
    async fn create_repeating_schedule() -> Result<(), AppError> {
        let test = TestBuilder::new().build().await.unwrap();
        let state = state_with(&test, Arc::new(MockGateway::new()));
        let args = CommandArgs::default()
            .with("channel", ArgValue::Channel(55))
            .with("time", text("every 2 hours"))
            .with("message", text("Drink water"))
            .with("repeat", ArgValue::Boolean(true));

        let reply = create(&state, &caller(7, Permissions::MANAGE_MESSAGES), &args).await?;

        let Reply::Text(text) = reply else {
            panic!("expected text");
        };
        assert!(text.contains("<#55> every 2 hours"));
        assert_eq!(state.scheduler.tracked_count().await, 1);

        Ok(())
    }

    /// Tests the repeat flag mismatch surfaced by the command.
    ///
    /// Expected: RepeatFlagMissing and nothing stored
    #[tokio::test]
    async fn create_requires_repeat_flag() -> Result<(), AppError> {
        let test = TestBuilder::new().build().await.unwrap();
        let state = state_with(&test, Arc::new(MockGateway::new()));
        let args = CommandArgs::default()
            .with("channel", ArgValue::Channel(55))
            .with("time", text("every 2 hours"))
            .with("message", text("Drink water"));

        let result = create(&state, &caller(7, Permissions::MANAGE_MESSAGES), &args).await;

        assert!(matches!(
            result,
            Err(AppError::ValidationErr(ValidationError::RepeatFlagMissing(_)))
        ));
        assert!(state.store.load_all(UnitKind::Schedule).await?.is_empty());

        Ok(())
    }

    /// Tests that show_all needs manage messages.
    ///
    /// Expected: own schedules only without the permission, all with it
    #[tokio::test]
    async fn list_show_all_needs_permission() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_record(
                "schedules.json",
                ScheduleFactory::new().id(100).guild_id(1).build(),
            )
            .build()
            .await
            .unwrap();
        let state = state_with(&test, Arc::new(MockGateway::new()));
        let args = CommandArgs::default().with("show_all", ArgValue::Boolean(true));

        let reply = list(&state, &caller(7, Permissions::empty()), &args).await?;
        assert_eq!(
            reply,
            Reply::text("You don't have any scheduled messages. Use /schedule to create one.")
        );

        let reply = list(&state, &caller(7, Permissions::MANAGE_MESSAGES), &args).await?;
        let Reply::Card(card) = reply else {
            panic!("expected a card");
        };
        assert_eq!(card.fields.len(), 1);
        assert_eq!(card.fields[0].name, "Schedule ID: 100");

        Ok(())
    }

    /// Tests cancelling another member's schedule.
    ///
    /// Expected: refused without manage messages, allowed with it
    #[tokio::test]
    async fn cancel_checks_ownership() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_record(
                "schedules.json",
                ScheduleFactory::new().id(101).guild_id(1).build(),
            )
            .build()
            .await
            .unwrap();
        let state = state_with(&test, Arc::new(MockGateway::new()));
        let args = CommandArgs::default().with("schedule_id", text("101"));

        let result = cancel(&state, &caller(7, Permissions::empty()), &args).await;
        assert!(matches!(
            result,
            Err(AppError::ValidationErr(ValidationError::NotScheduleOwner))
        ));

        let reply = cancel(&state, &caller(7, Permissions::MANAGE_MESSAGES), &args).await?;
        assert_eq!(
            reply,
            Reply::text("Schedule 101 has been cancelled successfully.")
        );
        assert!(TimedUnitRepository::new(&state.store)
            .get(UnitKey::new(UnitKind::Schedule, 1, 101))
            .await?
            .is_none());

        Ok(())
    }
}
