use chrono::Utc;
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

use crate::{
    bot::commands::{Caller, CommandArgs, Reply},
    data::timed_unit::TimedUnitRepository,
    error::{validation::ValidationError, AppError},
    model::{
        poll::{CreatePollParams, PollChoices, MAX_POLL_OPTIONS},
        unit::{UnitKey, UnitKind},
    },
    service::{lifecycle::UnitLifecycle, poll::PollService},
    state::AppState,
    util::parse::parse_u64_from_string,
};

const OPTION_NAMES: [&str; MAX_POLL_OPTIONS] = [
    "option1", "option2", "option3", "option4", "option5", "option6", "option7", "option8",
    "option9",
];

pub fn commands() -> Vec<CreateCommand> {
    let mut poll = CreateCommand::new("poll")
        .description("Create a simple poll with up to 9 options")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "question",
                "The question for your poll",
            )
            .required(true),
        );
    for (i, name) in OPTION_NAMES.iter().enumerate() {
        let required = i < 2;
        let description = if required {
            format!("Option {}", i + 1)
        } else {
            format!("Option {} (optional)", i + 1)
        };
        poll = poll.add_option(
            CreateCommandOption::new(CommandOptionType::String, *name, description)
                .required(required),
        );
    }
    let poll = poll.add_option(CreateCommandOption::new(
        CommandOptionType::Integer,
        "duration",
        "Poll duration in minutes (default: 60)",
    ));

    vec![
        poll,
        CreateCommand::new("quickpoll")
            .description("Create a simple yes/no poll")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "question",
                    "The question for your yes/no poll",
                )
                .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "duration",
                "Poll duration in minutes (default: 60)",
            )),
        CreateCommand::new("endpoll")
            .description("End a poll early and show results")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "message_id",
                    "The ID of the poll message to end",
                )
                .required(true),
            ),
    ]
}

/// `/poll`: numbered poll from the options that were filled in, in slot order.
pub async fn start(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    let options = OPTION_NAMES
        .iter()
        .filter_map(|name| args.string(name))
        .map(str::to_string)
        .collect();

    create(state, caller, args, PollChoices::Numbered(options)).await
}

/// `/quickpoll`: Yes/No poll.
pub async fn quick(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    create(state, caller, args, PollChoices::YesNo).await
}

async fn create(
    state: &AppState,
    caller: &Caller,
    args: &CommandArgs,
    choices: PollChoices,
) -> Result<Reply, AppError> {
    let params = CreatePollParams {
        guild_id: caller.guild_id,
        channel_id: caller.channel_id,
        creator_id: caller.user_id,
        question: args.required_string("question")?.to_string(),
        choices,
        duration_minutes: args.count("duration", 60),
    };

    let unit = PollService::new(&state.store, state.gateway.as_ref())
        .announce(params, Utc::now())
        .await?;
    let unit = UnitLifecycle::new(&state.store, &state.scheduler)
        .create_unit(unit)
        .await?;

    Ok(Reply::Text(format!("Poll created! Message ID: `{}`", unit.id)))
}

/// `/endpoll`: closes a poll now. Only its creator or an administrator may do this.
pub async fn end(state: &AppState, caller: &Caller, args: &CommandArgs) -> Result<Reply, AppError> {
    let id = parse_u64_from_string(args.required_string("message_id")?)?;
    let key = UnitKey::new(UnitKind::Poll, caller.guild_id, id);

    let unit = TimedUnitRepository::new(&state.store)
        .get(key)
        .await?
        .ok_or(ValidationError::UnitNotFound(UnitKind::Poll.label()))?;
    if unit.creator_id != caller.user_id && !caller.permissions.administrator() {
        return Err(ValidationError::NotPollOwner.into());
    }

    UnitLifecycle::new(&state.store, &state.scheduler)
        .end_unit_early(key)
        .await?;

    Ok(Reply::text("Ending poll..."))
}
