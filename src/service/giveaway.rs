//! Giveaway announcement, drawing and rerolling.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::{seq::IndexedRandom, Rng};

use crate::{
    data::{store::JsonStore, timed_unit::TimedUnitRepository},
    error::{validation::ValidationError, AppError},
    gateway::{
        card::{Card, COLOR_DARK_GRAY, COLOR_GREEN},
        Gateway, MessageRef, Outgoing,
    },
    model::{
        giveaway::{
            CreateGiveawayParams, DrawResult, GiveawayPayload, GIVEAWAY_MARKER,
            MAX_GIVEAWAY_MINUTES, MAX_WINNERS,
        },
        unit::{FireOutcome, FirePolicy, TimedUnit, UnitKey, UnitKind, UnitPayload, UnitState},
    },
    service::UTC_DISPLAY_FORMAT,
};

pub struct GiveawayService<'a> {
    store: &'a JsonStore,
    gateway: &'a dyn Gateway,
}

impl<'a> GiveawayService<'a> {
    /// Creates a new GiveawayService instance.
    ///
    /// # Arguments
    /// - `store` - Store holding the giveaway records
    /// - `gateway` - Chat platform used to post and read the announcement
    pub fn new(store: &'a JsonStore, gateway: &'a dyn Gateway) -> Self {
        Self { store, gateway }
    }

    /// Posts the announcement card and seeds the entry reaction.
    ///
    /// The returned unit is not yet stored or armed; hand it to
    /// `UnitLifecycle::create_unit`. Its id is the announcement message id.
    ///
    /// # Arguments
    /// - `params` - Giveaway details from the command
    /// - `now` - Creation instant
    ///
    /// # Returns
    /// - `Ok(TimedUnit)` - The new giveaway
    /// - `Err(AppError::ValidationErr)` - Winner count or duration out of range
    /// - `Err(AppError::GatewayErr)` - Posting the announcement failed
    pub async fn announce(
        &self,
        params: CreateGiveawayParams,
        now: DateTime<Utc>,
    ) -> Result<TimedUnit, AppError> {
        validate_winner_count(params.winner_count)?;
        if !(1..=MAX_GIVEAWAY_MINUTES).contains(&params.duration_minutes) {
            return Err(ValidationError::DurationOutOfRange {
                max_minutes: MAX_GIVEAWAY_MINUTES,
            }
            .into());
        }

        let ends_at = now + Duration::minutes(i64::from(params.duration_minutes));
        let payload = GiveawayPayload {
            prize: params.prize,
            winner_count: params.winner_count,
            description: params.description.filter(|d| !d.trim().is_empty()),
            marker: GIVEAWAY_MARKER.to_string(),
            winner_ids: None,
            winners_message_id: None,
        };

        let card = announcement_card(&payload, params.host_id, ends_at, now);
        let message = self
            .gateway
            .send_message(params.channel_id, Outgoing::Card(card))
            .await?;
        self.gateway.add_marker(message, &payload.marker).await?;

        tracing::info!(
            "Started giveaway {} for '{}' in guild {}",
            message.message_id,
            payload.prize,
            params.guild_id
        );

        Ok(TimedUnit {
            id: message.message_id,
            guild_id: params.guild_id,
            channel_id: params.channel_id,
            creator_id: params.host_id,
            created_at: now,
            state: UnitState::Active,
            fire_policy: FirePolicy::Once { at: ends_at },
            payload: UnitPayload::Giveaway(payload),
        })
    }

    /// Draws the winners of a giveaway whose time is up.
    ///
    /// With too few participants an insufficiency notice is posted and no winners are
    /// recorded; a removed entry marker gets its own notice. Otherwise the announcement is switched to its ended card, the winners
    /// are announced, and their ids are stored with the winners message id. Either way
    /// the giveaway ends.
    ///
    /// # Returns
    /// - `Ok(FireOutcome::Retired)` - The giveaway has ended
    /// - `Err(AppError)` - A gateway or store call failed
    pub async fn end(
        &self,
        unit: &TimedUnit,
        payload: &GiveawayPayload,
        now: DateTime<Utc>,
    ) -> Result<FireOutcome, AppError> {
        let announcement = MessageRef::new(unit.channel_id, unit.id);
        let draw = self
            .draw(announcement, &payload.marker, payload.winner_count)
            .await?;
        let repo = TimedUnitRepository::new(self.store);

        match draw {
            DrawResult::MarkerRemoved => {
                let notice = format!(
                    "Could not end the giveaway for {} because the reaction was removed.",
                    payload.prize
                );
                self.gateway
                    .send_message(unit.channel_id, Outgoing::Text(notice))
                    .await?;

                repo.update(unit.key(), TimedUnit::end).await?;

                tracing::info!("Giveaway {} ended without its entry reaction", unit.id);
            }
            DrawResult::Insufficient {
                needed,
                participants,
            } => {
                let notice = format!(
                    "Not enough participants for the giveaway of **{}**. Needed {} participants, but only got {}.",
                    payload.prize, needed, participants
                );
                self.gateway
                    .send_message(unit.channel_id, Outgoing::Text(notice))
                    .await?;

                repo.update(unit.key(), TimedUnit::end).await?;

                tracing::info!(
                    "Giveaway {} ended without winners ({} of {} needed)",
                    unit.id,
                    participants,
                    needed
                );
            }
            DrawResult::Winners(winners) => {
                self.gateway
                    .edit_message(announcement, ended_card(unit, payload, now))
                    .await?;

                let winners_message = self
                    .gateway
                    .send_message(
                        unit.channel_id,
                        Outgoing::Text(winners_text(
                            "GIVEAWAY ENDED",
                            "Winners",
                            payload,
                            &winners,
                            unit.creator_id,
                        )),
                    )
                    .await?;

                repo.update(unit.key(), |stored| {
                    stored.end();
                    if let UnitPayload::Giveaway(stored_payload) = &mut stored.payload {
                        stored_payload.winner_ids = Some(winners.clone());
                        stored_payload.winners_message_id = Some(winners_message.message_id);
                    }
                })
                .await?;

                tracing::info!("Giveaway {} ended with {} winner(s)", unit.id, winners.len());
            }
        }

        Ok(FireOutcome::Retired)
    }

    /// Draws new winners for an ended giveaway and announces them.
    ///
    /// The winners recorded by the original draw are left unchanged.
    ///
    /// # Arguments
    /// - `key` - Giveaway to reroll
    /// - `winner_count` - Number of new winners, 1..=20
    ///
    /// # Returns
    /// - `Ok(DrawResult)` - The draw that was announced
    /// - `Err(AppError::ValidationErr)` - Bad winner count, unknown giveaway, or not yet ended
    /// - `Err(AppError::GatewayErr)` - Reading reactions or posting failed
    pub async fn reroll(&self, key: UnitKey, winner_count: u32) -> Result<DrawResult, AppError> {
        validate_winner_count(winner_count)?;

        let unit = TimedUnitRepository::new(self.store)
            .get(key)
            .await?
            .ok_or(ValidationError::UnitNotFound(UnitKind::Giveaway.label()))?;
        let UnitPayload::Giveaway(payload) = &unit.payload else {
            return Err(ValidationError::UnitNotFound(UnitKind::Giveaway.label()).into());
        };
        if unit.is_active() {
            return Err(ValidationError::NotEnded.into());
        }

        let draw = self
            .draw(
                MessageRef::new(unit.channel_id, unit.id),
                &payload.marker,
                winner_count,
            )
            .await?;

        let text = match &draw {
            DrawResult::MarkerRemoved => format!(
                "Could not reroll the giveaway for {} because the reaction was removed.",
                payload.prize
            ),
            DrawResult::Insufficient {
                needed,
                participants,
            } => format!(
                "Not enough participants for rerolling the giveaway of **{}**. Needed {} participants, but only got {}.",
                payload.prize, needed, participants
            ),
            DrawResult::Winners(winners) => winners_text(
                "GIVEAWAY REROLLED",
                "New Winners",
                payload,
                winners,
                unit.creator_id,
            ),
        };
        self.gateway
            .send_message(unit.channel_id, Outgoing::Text(text))
            .await?;

        tracing::info!("Rerolled giveaway {} in guild {}", unit.id, unit.guild_id);

        Ok(draw)
    }

    /// Active giveaways of a guild, soonest ending first.
    pub async fn list_active(&self, guild_id: u64) -> Result<Vec<TimedUnit>, AppError> {
        let giveaways = TimedUnitRepository::new(self.store)
            .get_by_guild(UnitKind::Giveaway, guild_id)
            .await?;

        Ok(giveaways.into_iter().filter(TimedUnit::is_active).collect())
    }

    /// Draws from the reactors on the entry marker, minus the bot's own seed reaction.
    ///
    /// An empty reactor set means the marker itself was removed from the message.
    async fn draw(
        &self,
        message: MessageRef,
        marker: &str,
        winner_count: u32,
    ) -> Result<DrawResult, AppError> {
        let mut reactors = self.gateway.get_reactors(message, marker).await?;
        if reactors.is_empty() {
            return Ok(DrawResult::MarkerRemoved);
        }

        reactors.remove(&self.gateway.bot_user_id());
        Ok(pick_winners(&reactors, winner_count, &mut rand::rng()))
    }
}

fn validate_winner_count(winner_count: u32) -> Result<(), ValidationError> {
    if (1..=MAX_WINNERS).contains(&winner_count) {
        Ok(())
    } else {
        Err(ValidationError::WinnerCountOutOfRange { max: MAX_WINNERS })
    }
}

/// Samples `count` distinct winners uniformly from `participants`.
///
/// # Returns
/// - `DrawResult::Winners` - Exactly `count` distinct participant ids
/// - `DrawResult::Insufficient` - Fewer participants than `count`
pub fn pick_winners<R: Rng + ?Sized>(
    participants: &HashSet<u64>,
    count: u32,
    rng: &mut R,
) -> DrawResult {
    // Sorted so a seeded rng gives reproducible draws.
    let mut pool: Vec<u64> = participants.iter().copied().collect();
    pool.sort_unstable();

    let needed = count as usize;
    if pool.len() < needed {
        return DrawResult::Insufficient {
            needed: count,
            participants: pool.len(),
        };
    }

    DrawResult::Winners(pool.choose_multiple(rng, needed).copied().collect())
}

fn announcement_card(
    payload: &GiveawayPayload,
    host_id: u64,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Card {
    Card::new(COLOR_GREEN)
        .title(format!("🎉 GIVEAWAY: {}", payload.prize))
        .description(
            payload
                .description
                .clone()
                .unwrap_or_else(|| format!("React with {} to enter!", payload.marker)),
        )
        .field("Prize", &payload.prize, true)
        .field("Winners", payload.winner_count.to_string(), true)
        .field("Hosted by", format!("<@{}>", host_id), true)
        .field("Ends at", format!("<t:{}:F>", ends_at.timestamp()), false)
        .footer(format!("Ends at • {}", ends_at.format(UTC_DISPLAY_FORMAT)))
        .timestamp(now)
}

fn ended_card(unit: &TimedUnit, payload: &GiveawayPayload, now: DateTime<Utc>) -> Card {
    let mut card = announcement_card(payload, unit.creator_id, unit.due_at(), unit.created_at);
    card.color = COLOR_DARK_GRAY;
    card.description = Some(format!(
        "**Giveaway Ended**\n\n{}",
        payload.description.as_deref().unwrap_or_default()
    ));
    card.footer = Some(format!(
        "Ended at • {} • Giveaway ID: {}",
        now.format(UTC_DISPLAY_FORMAT),
        unit.id
    ));
    card
}

fn winners_text(
    headline: &str,
    label: &str,
    payload: &GiveawayPayload,
    winners: &[u64],
    host_id: u64,
) -> String {
    let mentions: Vec<String> = winners.iter().map(|id| format!("<@{}>", id)).collect();

    format!(
        "🎉 **{}** 🎉\n\n**Prize:** {}\n**{}:** {}\n\nCongratulations! Contact <@{}> to claim your prize.",
        headline,
        payload.prize,
        label,
        mentions.join(", "),
        host_id
    )
}
