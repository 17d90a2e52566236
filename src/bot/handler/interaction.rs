use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, Interaction,
};

use crate::{
    bot::commands::{self, Caller, CommandArgs, Reply},
    error::AppError,
    gateway::discord::render_embed,
    state::AppState,
};

/// Runs a slash command and answers the caller ephemerally.
///
/// The response is deferred first because creating a giveaway or poll makes several
/// platform calls, which can exceed the three second interaction deadline.
pub async fn handle_interaction(state: &AppState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    let caller = match Caller::from_interaction(&command) {
        Ok(caller) => caller,
        Err(e) => {
            respond_immediately(&ctx, &command, e.user_message()).await;
            return;
        }
    };

    if let Err(e) = command.defer_ephemeral(&ctx.http).await {
        tracing::error!("Failed to defer /{}: {}", command.data.name, e);
        return;
    }

    let args = CommandArgs::from_resolved(&command.data.options());
    tracing::debug!(
        "/{} from user {} in guild {}",
        command.data.name,
        caller.user_id,
        caller.guild_id
    );

    let reply = commands::dispatch(state, &command.data.name, &caller, &args)
        .await
        .unwrap_or_else(|e| Reply::Text(e.user_message()));

    if let Err(e) = send_reply(&ctx, &command, reply).await {
        tracing::error!("Failed to answer /{}: {}", command.data.name, e);
    }
}

async fn send_reply(
    ctx: &Context,
    command: &CommandInteraction,
    reply: Reply,
) -> Result<(), AppError> {
    let response = match reply {
        Reply::Text(text) => EditInteractionResponse::new().content(text),
        Reply::Card(card) => EditInteractionResponse::new().embed(render_embed(&card)?),
    };

    command.edit_response(&ctx.http, response).await?;

    Ok(())
}

async fn respond_immediately(ctx: &Context, command: &CommandInteraction, text: String) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(text)
            .ephemeral(true),
    );

    if let Err(e) = command.create_response(&ctx.http, response).await {
        tracing::error!("Failed to answer /{}: {}", command.data.name, e);
    }
}
