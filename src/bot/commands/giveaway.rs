use chrono::Utc;
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

use crate::{
    bot::commands::{Caller, CommandArgs, Reply, MAX_LIST_FIELDS},
    error::AppError,
    gateway::card::{Card, COLOR_GREEN},
    model::{
        giveaway::CreateGiveawayParams,
        unit::{UnitKey, UnitKind, UnitPayload},
    },
    service::{giveaway::GiveawayService, lifecycle::UnitLifecycle},
    state::AppState,
    util::{format::format_time_left, parse::parse_u64_from_string},
};

pub fn commands() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("giveaway")
            .description("Start a new giveaway")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "prize",
                    "The prize to be given away",
                )
                .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "winners",
                "Number of winners (default: 1)",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "duration",
                "Duration in minutes (default: 60)",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::String,
                "description",
                "Additional description about the giveaway (optional)",
            )),
        CreateCommand::new("giveaway_end")
            .description("End a giveaway early")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "message_id",
                    "The ID of the giveaway message to end",
                )
                .required(true),
            ),
        CreateCommand::new("giveaway_reroll")
            .description("Reroll the winners of an ended giveaway")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "message_id",
                    "The ID of the giveaway message to reroll",
                )
                .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "winners",
                "Number of new winners to select (default: 1)",
            )),
        CreateCommand::new("giveaway_list")
            .description("List all active giveaways")
            .default_member_permissions(Permissions::MANAGE_GUILD),
    ]
}

/// `/giveaway`: posts the announcement in the current channel and arms its end.
pub async fn start(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    let params = CreateGiveawayParams {
        guild_id: caller.guild_id,
        channel_id: caller.channel_id,
        host_id: caller.user_id,
        prize: args.required_string("prize")?.to_string(),
        winner_count: args.count("winners", 1),
        duration_minutes: args.count("duration", 60),
        description: args.string("description").map(str::to_string),
    };

    let unit = GiveawayService::new(&state.store, state.gateway.as_ref())
        .announce(params, Utc::now())
        .await?;
    let unit = UnitLifecycle::new(&state.store, &state.scheduler)
        .create_unit(unit)
        .await?;

    Ok(Reply::Text(format!(
        "Giveaway started! Message ID: `{}`",
        unit.id
    )))
}

/// `/giveaway_end`: draws the winners now.
pub async fn end(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    let id = parse_u64_from_string(args.required_string("message_id")?)?;

    UnitLifecycle::new(&state.store, &state.scheduler)
        .end_unit_early(UnitKey::new(UnitKind::Giveaway, caller.guild_id, id))
        .await?;

    Ok(Reply::text("Ending giveaway..."))
}

/// `/giveaway_reroll`: draws fresh winners for an ended giveaway.
pub async fn reroll(
    state: &AppState,
    caller: &Caller,
    args: &CommandArgs,
) -> Result<Reply, AppError> {
    let id = parse_u64_from_string(args.required_string("message_id")?)?;
    let winner_count = args.count("winners", 1);

    GiveawayService::new(&state.store, state.gateway.as_ref())
        .reroll(
            UnitKey::new(UnitKind::Giveaway, caller.guild_id, id),
            winner_count,
        )
        .await?;

    Ok(Reply::text("Giveaway winners rerolled."))
}

/// `/giveaway_list`: active giveaways in this guild with their time left.
pub async fn list(state: &AppState, caller: &Caller) -> Result<Reply, AppError> {
    let giveaways = GiveawayService::new(&state.store, state.gateway.as_ref())
        .list_active(caller.guild_id)
        .await?;

    if giveaways.is_empty() {
        return Ok(Reply::text("There are no active giveaways in this server."));
    }

    let now = Utc::now();
    let mut card = Card::new(COLOR_GREEN)
        .title("Active Giveaways")
        .description(format!(
            "There are {} active giveaways in this server.",
            giveaways.len()
        ));

    for unit in giveaways.iter().take(MAX_LIST_FIELDS) {
        let UnitPayload::Giveaway(payload) = &unit.payload else {
            continue;
        };
        card = card.field(
            format!("🎉 {}", payload.prize),
            format!(
                "**Channel:** <#{}>\n**Winners:** {}\n**Ends in:** {}\n**Message ID:** {}",
                unit.channel_id,
                payload.winner_count,
                format_time_left(unit.due_at(), now),
                unit.id
            ),
            false,
        );
    }

    Ok(Reply::Card(card))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serenity::all::Permissions;
    use test_utils::{builder::TestBuilder, factory::giveaway::GiveawayFactory};

    use crate::{
        bot::commands::{
            test_support::{caller, state_with},
            ArgValue,
        },
        data::timed_unit::TimedUnitRepository,
        error::validation::ValidationError,
        gateway::mock::MockGateway,
        model::giveaway::GIVEAWAY_MARKER,
    };

    /// Tests starting a giveaway from command options.
    ///
    /// Expected: announcement posted, unit stored and armed
    #[tokio::test]
    async fn start_stores_and_arms() -> Result<(), AppError> {
        let test = TestBuilder::new().build().await.unwrap();
        let gateway = Arc::new(MockGateway::new());
        let state = state_with(&test, gateway.clone());
        let args = CommandArgs::default()
            .with("prize", ArgValue::String("Nitro".to_string()))
            .with("winners", ArgValue::Integer(2));

        let reply = start(&state, &caller(7, Permissions::MANAGE_GUILD), &args).await?;

        let (announcement, _) = gateway.sent()[0].clone();
        let key = UnitKey::new(UnitKind::Giveaway, 1, announcement.message_id);
        assert_eq!(
            reply,
            Reply::Text(format!(
                "Giveaway started! Message ID: `{}`",
                announcement.message_id
            ))
        );
        assert!(TimedUnitRepository::new(&state.store).get(key).await?.is_some());
        assert!(state.scheduler.is_tracked(key).await);
        assert_eq!(gateway.markers()[0].1, GIVEAWAY_MARKER);

        Ok(())
    }

    /// Tests an out-of-range winner count.
    ///
    /// Expected: validation error and nothing posted
    #[tokio::test]
    async fn start_rejects_too_many_winners() {
        let test = TestBuilder::new().build().await.unwrap();
        let gateway = Arc::new(MockGateway::new());
        let state = state_with(&test, gateway.clone());
        let args = CommandArgs::default()
            .with("prize", ArgValue::String("Nitro".to_string()))
            .with("winners", ArgValue::Integer(21));

        let result = start(&state, &caller(7, Permissions::MANAGE_GUILD), &args).await;

        assert!(matches!(
            result,
            Err(AppError::ValidationErr(ValidationError::WinnerCountOutOfRange { max: 20 }))
        ));
        assert!(gateway.sent().is_empty());
    }

    /// Tests a non-numeric message id.
    ///
    /// Expected: InvalidId
    #[tokio::test]
    async fn end_rejects_bad_id() {
        let test = TestBuilder::new().build().await.unwrap();
        let state = state_with(&test, Arc::new(MockGateway::new()));
        let args = CommandArgs::default().with("message_id", ArgValue::String("abc".to_string()));

        let result = end(&state, &caller(7, Permissions::MANAGE_GUILD), &args).await;

        assert!(matches!(
            result,
            Err(AppError::ValidationErr(ValidationError::InvalidId(_)))
        ));
    }

    /// Tests listing active giveaways.
    ///
    /// Expected: one field per active giveaway, ended ones left out
    #[tokio::test]
    async fn list_shows_active_giveaways() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_record(
                "giveaways.json",
                GiveawayFactory::new().id(1).guild_id(1).prize("Nitro").build(),
            )
            .with_record(
                "giveaways.json",
                GiveawayFactory::new()
                    .id(2)
                    .guild_id(1)
                    .ended_with_winners(&[3])
                    .build(),
            )
            .build()
            .await
            .unwrap();
        let state = state_with(&test, Arc::new(MockGateway::new()));

        let reply = list(&state, &caller(7, Permissions::MANAGE_GUILD)).await?;

        let Reply::Card(card) = reply else {
            panic!("expected a card");
        };
        assert_eq!(card.fields.len(), 1);
        assert_eq!(card.fields[0].name, "🎉 Nitro");
        assert!(card.fields[0].value.contains("**Message ID:** 1"));

        Ok(())
    }

    /// Tests listing a guild without giveaways.
    ///
    /// Expected: plain text notice
    #[tokio::test]
    async fn list_without_giveaways() -> Result<(), AppError> {
        let test = TestBuilder::new().build().await.unwrap();
        let state = state_with(&test, Arc::new(MockGateway::new()));

        let reply = list(&state, &caller(7, Permissions::MANAGE_GUILD)).await?;

        assert_eq!(
            reply,
            Reply::text("There are no active giveaways in this server.")
        );

        Ok(())
    }
}
