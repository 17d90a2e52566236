use thiserror::Error;

/// Caller mistakes detected before any timed unit is created or touched.
///
/// The display text of every variant is written for the person who ran the
/// command and is sent back to them verbatim.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "Invalid time format. Examples: 'in 10 minutes', 'every 2 hours', '18:00', '2026-12-25 12:00'"
    )]
    InvalidTimeExpression,

    #[error("Number of winners must be between 1 and {max}.")]
    WinnerCountOutOfRange { max: u32 },

    #[error("Duration must be between 1 minute and {max_minutes} minutes.")]
    DurationOutOfRange { max_minutes: u32 },

    #[error("A poll needs between {min} and {max} options.")]
    OptionCountOutOfRange { min: usize, max: usize },

    #[error("That time is already in the past.")]
    TimeInPast,

    #[error("A repeating interval must be greater than zero.")]
    ZeroInterval,

    /// A repeating expression was given without `repeat = true`.
    #[error(
        "You provided a repeating time format ('{0}') but didn't set repeat=True. Use /schedule again with repeat=True for a repeating schedule."
    )]
    RepeatFlagMissing(String),

    /// `repeat = true` was given with a one-time expression.
    #[error(
        "You set repeat=True but provided a one-time time format ('{0}'). For repeating schedules, use formats like 'every X minutes/hours/days'."
    )]
    RepeatFlagUnexpected(String),

    #[error("Invalid ID '{0}'. Please provide a valid number.")]
    InvalidId(String),

    #[error("{0} not found. Make sure you're using the correct ID.")]
    UnitNotFound(&'static str),

    #[error("This giveaway has already ended.")]
    AlreadyEnded,

    #[error("This giveaway has not ended yet. End it first before rerolling.")]
    NotEnded,

    #[error("That unit is being processed right now, try again in a moment.")]
    AlreadyFiring,

    #[error("Only the poll creator or administrators can end polls early.")]
    NotPollOwner,

    #[error(
        "You don't have permission to cancel this schedule. Only the creator or admins can cancel it."
    )]
    NotScheduleOwner,

    #[error("I can't find that channel.")]
    ChannelNotFound,

    #[error("This command can only be used in a server.")]
    GuildOnly,

    #[error("Missing required option '{0}'.")]
    MissingOption(&'static str),
}
