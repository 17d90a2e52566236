//! Reaction polls: posting, tallying and closing.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::{
    data::{store::JsonStore, timed_unit::TimedUnitRepository},
    error::{validation::ValidationError, AppError},
    gateway::{
        card::{Card, COLOR_BLUE, COLOR_DARK_GRAY},
        Gateway, MessageRef, Outgoing,
    },
    model::{
        poll::{
            CreatePollParams, OptionResult, PollChoices, PollPayload, PollTally,
            MAX_POLL_MINUTES, MAX_POLL_OPTIONS, MIN_POLL_OPTIONS,
        },
        unit::{FireOutcome, FirePolicy, TimedUnit, UnitPayload, UnitState},
    },
    service::UTC_DISPLAY_FORMAT,
};

const BAR_CELLS: u64 = 10;

pub struct PollService<'a> {
    store: &'a JsonStore,
    gateway: &'a dyn Gateway,
}

impl<'a> PollService<'a> {
    pub fn new(store: &'a JsonStore, gateway: &'a dyn Gateway) -> Self {
        Self { store, gateway }
    }

    /// Posts the poll card and seeds one reaction per option.
    ///
    /// The returned unit is not yet stored or armed. Its id is the poll message id.
    ///
    /// # Returns
    /// - `Ok(TimedUnit)` - The new poll
    /// - `Err(AppError::ValidationErr)` - Duration or option count out of range
    /// - `Err(AppError::GatewayErr)` - Posting the card or a reaction failed
    pub async fn announce(
        &self,
        params: CreatePollParams,
        now: DateTime<Utc>,
    ) -> Result<TimedUnit, AppError> {
        if !(1..=MAX_POLL_MINUTES).contains(&params.duration_minutes) {
            return Err(ValidationError::DurationOutOfRange {
                max_minutes: MAX_POLL_MINUTES,
            }
            .into());
        }

        let payload = match params.choices {
            PollChoices::YesNo => PollPayload::yes_no(params.question),
            PollChoices::Numbered(options) => {
                if !(MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS).contains(&options.len()) {
                    return Err(ValidationError::OptionCountOutOfRange {
                        min: MIN_POLL_OPTIONS,
                        max: MAX_POLL_OPTIONS,
                    }
                    .into());
                }
                PollPayload::numbered(params.question, options)
            }
        };

        let ends_at = now + Duration::minutes(i64::from(params.duration_minutes));
        let card = poll_card(&payload, now)
            .footer(format!("Poll ends at {}", ends_at.format(UTC_DISPLAY_FORMAT)));

        let message = self
            .gateway
            .send_message(params.channel_id, Outgoing::Card(card))
            .await?;
        for marker in &payload.markers {
            self.gateway.add_marker(message, marker).await?;
        }

        tracing::info!(
            "Started poll {} with {} option(s) in guild {}",
            message.message_id,
            payload.options.len(),
            params.guild_id
        );

        Ok(TimedUnit {
            id: message.message_id,
            guild_id: params.guild_id,
            channel_id: params.channel_id,
            creator_id: params.creator_id,
            created_at: now,
            state: UnitState::Active,
            fire_policy: FirePolicy::Once { at: ends_at },
            payload: UnitPayload::Poll(payload),
        })
    }

    /// Closes a poll: posts the results, marks the poll card ended and deletes the unit.
    ///
    /// # Returns
    /// - `Ok(FireOutcome::Retired)` - Results posted and the poll removed
    /// - `Err(AppError)` - A gateway or store call failed
    pub async fn end(
        &self,
        unit: &TimedUnit,
        payload: &PollPayload,
        now: DateTime<Utc>,
    ) -> Result<FireOutcome, AppError> {
        let poll_message = MessageRef::new(unit.channel_id, unit.id);

        let mut counts = Vec::with_capacity(payload.markers.len());
        for marker in &payload.markers {
            let count = self.gateway.count_reactions(poll_message, marker).await?;
            // The bot's seed reaction is not a vote.
            counts.push(count.saturating_sub(1));
        }

        let tally = tally_votes(&payload.options, &counts);

        self.gateway
            .send_message(
                unit.channel_id,
                Outgoing::Card(results_card(&payload.question, &tally, now)),
            )
            .await?;

        let mut ended = poll_card(payload, unit.created_at).footer("Poll ended");
        ended.color = COLOR_DARK_GRAY;
        self.gateway.edit_message(poll_message, ended).await?;

        TimedUnitRepository::new(self.store)
            .delete(unit.key())
            .await?;

        tracing::info!(
            "Closed poll {} with {} vote(s)",
            unit.id,
            tally.total_votes
        );

        Ok(FireOutcome::Retired)
    }
}

/// Turns per-option vote counts into results with whole-number percentages.
///
/// Percentages round half to even and are all zero when nobody voted.
pub fn tally_votes(options: &[String], votes: &[u64]) -> PollTally {
    let total_votes: u64 = votes.iter().sum();

    let results = options
        .iter()
        .zip(votes.iter().copied())
        .map(|(option, votes)| OptionResult {
            option: option.clone(),
            votes,
            percentage: percentage(votes, total_votes),
        })
        .collect();

    PollTally {
        results,
        total_votes,
    }
}

fn percentage(votes: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let scaled = votes * 100;
    let (quotient, remainder) = (scaled / total, scaled % total);
    match (remainder * 2).cmp(&total) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => quotient + quotient % 2,
    }
}

/// Ten-cell bar with one filled cell per full ten percent.
pub fn render_bar(percentage: u64) -> String {
    let filled = (percentage / 10).min(BAR_CELLS) as usize;
    let empty = BAR_CELLS as usize - filled;

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn poll_card(payload: &PollPayload, timestamp: DateTime<Utc>) -> Card {
    let lines: Vec<String> = payload
        .choices()
        .map(|(marker, option)| format!("{} {}", marker, option))
        .collect();

    Card::new(COLOR_BLUE)
        .title(format!("📊 {}", payload.question))
        .description(lines.join("\n"))
        .timestamp(timestamp)
}

fn results_card(question: &str, tally: &PollTally, now: DateTime<Utc>) -> Card {
    let lines: Vec<String> = tally
        .results
        .iter()
        .map(|result| {
            format!(
                "{}: {} {} votes ({}%)",
                result.option,
                render_bar(result.percentage),
                result.votes,
                result.percentage
            )
        })
        .collect();

    Card::new(COLOR_BLUE)
        .title(format!("📊 Poll Results: {}", question))
        .description(lines.join("\n"))
        .footer(format!("Total votes: {}", tally.total_votes))
        .timestamp(now)
}
