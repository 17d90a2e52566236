//! `Gateway` implementation backed by serenity's HTTP client.

use std::{collections::HashSet, sync::Arc};

use serenity::{
    all::{
        ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, MessageId,
        MessageReaction, ReactionType, Timestamp, User, UserId,
    },
    async_trait,
    http::Http,
};

use crate::{
    error::{gateway::GatewayError, internal::InternalError, AppError},
    gateway::{card::Card, Gateway, MessageRef, Outgoing},
};

/// Discord caps reaction-user pages at 100 entries.
const REACTION_PAGE_SIZE: u8 = 100;

pub struct DiscordGateway {
    http: Arc<Http>,
    bot_user_id: u64,
}

impl DiscordGateway {
    /// Creates a new DiscordGateway.
    ///
    /// # Arguments
    /// - `http` - Shared serenity HTTP client
    /// - `bot_user_id` - User id of the logged-in bot account
    pub fn new(http: Arc<Http>, bot_user_id: u64) -> Self {
        Self { http, bot_user_id }
    }
}

#[async_trait]
impl Gateway for DiscordGateway {
    async fn send_message(
        &self,
        channel_id: u64,
        message: Outgoing,
    ) -> Result<MessageRef, AppError> {
        let builder = match message {
            Outgoing::Text(text) => CreateMessage::new().content(text),
            Outgoing::Card(card) => CreateMessage::new().embed(render_embed(&card)?),
        };

        let sent = ChannelId::new(channel_id)
            .send_message(&self.http, builder)
            .await
            .map_err(GatewayError::from)?;

        Ok(MessageRef::new(channel_id, sent.id.get()))
    }

    async fn edit_message(&self, message: MessageRef, card: Card) -> Result<(), AppError> {
        let edit_message = EditMessage::new().embed(render_embed(&card)?);

        ChannelId::new(message.channel_id)
            .edit_message(
                &self.http,
                MessageId::new(message.message_id),
                edit_message,
            )
            .await
            .map_err(GatewayError::from)?;

        Ok(())
    }

    async fn add_marker(&self, message: MessageRef, marker: &str) -> Result<(), AppError> {
        ChannelId::new(message.channel_id)
            .create_reaction(
                &self.http,
                MessageId::new(message.message_id),
                ReactionType::Unicode(marker.to_string()),
            )
            .await
            .map_err(GatewayError::from)?;

        Ok(())
    }

    async fn get_reactors(
        &self,
        message: MessageRef,
        marker: &str,
    ) -> Result<HashSet<u64>, AppError> {
        let channel_id = ChannelId::new(message.channel_id);
        let message_id = MessageId::new(message.message_id);

        let mut reactors = HashSet::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = channel_id
                .reaction_users(
                    &self.http,
                    message_id,
                    ReactionType::Unicode(marker.to_string()),
                    Some(REACTION_PAGE_SIZE),
                    after,
                )
                .await
                .map_err(GatewayError::from)?;

            reactors.extend(page_user_ids(&page));

            if page.len() < usize::from(REACTION_PAGE_SIZE) {
                break;
            }
            after = page.last().map(|user| user.id);
        }

        Ok(reactors)
    }

    async fn count_reactions(&self, message: MessageRef, marker: &str) -> Result<u64, AppError> {
        let fetched = ChannelId::new(message.channel_id)
            .message(&self.http, MessageId::new(message.message_id))
            .await
            .map_err(GatewayError::from)?;

        Ok(count_for_marker(&fetched.reactions, marker))
    }

    async fn fetch_channel(&self, channel_id: u64) -> Result<(), AppError> {
        self.http
            .get_channel(ChannelId::new(channel_id))
            .await
            .map_err(GatewayError::from)?;

        Ok(())
    }

    fn bot_user_id(&self) -> u64 {
        self.bot_user_id
    }
}

/// Converts a domain card into a serenity embed.
///
/// # Returns
/// - `Ok(CreateEmbed)` - Embed ready to send
/// - `Err(AppError::InternalErr)` - The card timestamp is outside Discord's range
pub fn render_embed(card: &Card) -> Result<CreateEmbed, AppError> {
    let mut embed = CreateEmbed::new().color(card.color);

    if let Some(title) = &card.title {
        embed = embed.title(title);
    }
    if let Some(description) = &card.description {
        embed = embed.description(description);
    }
    for field in &card.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &card.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(at) = card.timestamp {
        let timestamp = Timestamp::from_unix_timestamp(at.timestamp()).map_err(|e| {
            AppError::InternalErr(InternalError::InvalidDiscordTimestamp {
                timestamp: at.timestamp(),
                reason: e.to_string(),
            })
        })?;
        embed = embed.timestamp(timestamp);
    }

    Ok(embed)
}

fn page_user_ids(page: &[User]) -> impl Iterator<Item = u64> + '_ {
    page.iter().map(|user| user.id.get())
}

/// Platform count for a unicode marker; zero when nobody reacted with it.
fn count_for_marker(reactions: &[MessageReaction], marker: &str) -> u64 {
    reactions
        .iter()
        .find(|reaction| {
            matches!(&reaction.reaction_type, ReactionType::Unicode(emoji) if emoji == marker)
        })
        .map(|reaction| reaction.count)
        .unwrap_or(0)
}
