//! Slash command definitions and dispatch.
//!
//! Each feature module exposes `commands()` with its `CreateCommand` builders and one
//! handler per command. Handlers never touch the interaction itself: they take the
//! `Caller` and `CommandArgs` extracted here and return a `Reply`, which the
//! interaction handler sends back as an ephemeral response.

pub mod giveaway;
pub mod poll;
pub mod schedule;

use std::collections::HashMap;

use serenity::all::{CommandInteraction, CreateCommand, Permissions, ResolvedOption, ResolvedValue};

use crate::{
    error::{validation::ValidationError, AppError},
    gateway::card::Card,
    state::AppState,
};

/// Discord caps embeds at 25 fields.
pub(crate) const MAX_LIST_FIELDS: usize = 25;

/// Who ran a command and where.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub guild_id: u64,
    pub channel_id: u64,
    pub user_id: u64,
    pub permissions: Permissions,
}

impl Caller {
    /// Extracts the caller from a guild interaction.
    ///
    /// # Returns
    /// - `Ok(Caller)` - The invoking member's ids and resolved channel permissions
    /// - `Err(AppError::ValidationErr(GuildOnly))` - The command was run in a DM
    pub fn from_interaction(command: &CommandInteraction) -> Result<Self, AppError> {
        let guild_id = command.guild_id.ok_or(ValidationError::GuildOnly)?;
        let permissions = command
            .member
            .as_ref()
            .and_then(|member| member.permissions)
            .unwrap_or_else(Permissions::empty);

        Ok(Self {
            guild_id: guild_id.get(),
            channel_id: command.channel_id.get(),
            user_id: command.user.id.get(),
            permissions,
        })
    }
}

/// An option value in the shapes our commands use.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Channel(u64),
}

/// Options supplied with a command, keyed by option name.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    values: HashMap<String, ArgValue>,
}

impl CommandArgs {
    pub fn from_resolved(options: &[ResolvedOption<'_>]) -> Self {
        let values = options
            .iter()
            .filter_map(|option| {
                let value = match &option.value {
                    ResolvedValue::String(s) => ArgValue::String(s.to_string()),
                    ResolvedValue::Integer(i) => ArgValue::Integer(*i),
                    ResolvedValue::Boolean(b) => ArgValue::Boolean(*b),
                    ResolvedValue::Channel(channel) => ArgValue::Channel(channel.id.get()),
                    _ => return None,
                };
                Some((option.name.to_string(), value))
            })
            .collect();

        Self { values }
    }

    #[cfg(test)]
    pub fn with(mut self, name: &str, value: ArgValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn required_string(&self, name: &'static str) -> Result<&str, AppError> {
        Ok(self.string(name).ok_or(ValidationError::MissingOption(name))?)
    }

    /// An integer option narrowed to `u32`, or `default` when absent.
    ///
    /// Negative or oversized values become 0 so the range check downstream rejects
    /// them with its own message.
    pub fn count(&self, name: &str, default: u32) -> u32 {
        match self.values.get(name) {
            Some(ArgValue::Integer(i)) => u32::try_from(*i).unwrap_or(0),
            _ => default,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Boolean(true)))
    }

    pub fn required_channel(&self, name: &'static str) -> Result<u64, AppError> {
        match self.values.get(name) {
            Some(ArgValue::Channel(id)) => Ok(*id),
            _ => Err(ValidationError::MissingOption(name).into()),
        }
    }
}

/// What a command handler answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Card(Card),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Every slash command the bot registers.
pub fn all_commands() -> Vec<CreateCommand> {
    let mut commands = giveaway::commands();
    commands.extend(poll::commands());
    commands.extend(schedule::commands());
    commands
}

/// Routes a command by name to its handler.
///
/// # Returns
/// - `Ok(Reply)` - The answer for the caller
/// - `Err(AppError)` - The command failed; `user_message` decides what the caller sees
pub async fn dispatch(
    state: &AppState,
    name: &str,
    caller: &Caller,
    args: &CommandArgs,
) -> Result<Reply, AppError> {
    match name {
        "giveaway" => giveaway::start(state, caller, args).await,
        "giveaway_end" => giveaway::end(state, caller, args).await,
        "giveaway_reroll" => giveaway::reroll(state, caller, args).await,
        "giveaway_list" => giveaway::list(state, caller).await,
        "poll" => poll::start(state, caller, args).await,
        "quickpoll" => poll::quick(state, caller, args).await,
        "endpoll" => poll::end(state, caller, args).await,
        "schedule" => schedule::create(state, caller, args).await,
        "schedulelist" => schedule::list(state, caller, args).await,
        "cancelschedule" => schedule::cancel(state, caller, args).await,
        other => {
            tracing::warn!("Received unknown command /{}", other);
            Ok(Reply::text("Unknown command."))
        }
    }
}
