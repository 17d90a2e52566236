use std::sync::Arc;

use chrono::Utc;
use serenity::async_trait;

use crate::{
    data::{store::JsonStore, timed_unit::TimedUnitRepository},
    error::AppError,
    gateway::Gateway,
    model::unit::{FireOutcome, UnitKey, UnitKind, UnitPayload},
    scheduler::FireHandler,
    service::{giveaway::GiveawayService, poll::PollService, schedule::ScheduleService},
};

/// Runs the outcome of whichever feature a firing unit belongs to.
///
/// The record is always re-read from the store at fire time, so a unit that was
/// cancelled or ended after its timer was armed resolves to a no-op.
pub struct OutcomeResolver {
    store: Arc<JsonStore>,
    gateway: Arc<dyn Gateway>,
}

impl OutcomeResolver {
    pub fn new(store: Arc<JsonStore>, gateway: Arc<dyn Gateway>) -> Self {
        Self { store, gateway }
    }
}

#[async_trait]
impl FireHandler for OutcomeResolver {
    async fn fire(&self, key: UnitKey) -> Result<FireOutcome, AppError> {
        let repo = TimedUnitRepository::new(&self.store);

        let Some(unit) = repo.get(key).await? else {
            tracing::debug!("Skipping {}: no longer stored", key);
            return Ok(FireOutcome::Retired);
        };
        if !unit.is_active() {
            tracing::debug!("Skipping {}: already ended", key);
            return Ok(FireOutcome::Retired);
        }

        let now = Utc::now();
        let gateway = self.gateway.as_ref();

        match &unit.payload {
            UnitPayload::Giveaway(payload) => {
                GiveawayService::new(&self.store, gateway)
                    .end(&unit, payload, now)
                    .await
            }
            UnitPayload::Poll(payload) => {
                PollService::new(&self.store, gateway)
                    .end(&unit, payload, now)
                    .await
            }
            UnitPayload::Schedule(payload) => {
                ScheduleService::new(&self.store, gateway)
                    .deliver(&unit, payload, now)
                    .await
            }
        }
    }

    /// Polls are removed; giveaways and schedules are kept but marked ended so they
    /// are never resumed.
    async fn retire(&self, key: UnitKey) -> Result<(), AppError> {
        let repo = TimedUnitRepository::new(&self.store);

        match key.kind {
            UnitKind::Poll => {
                repo.delete(key).await?;
            }
            UnitKind::Giveaway | UnitKind::Schedule => {
                repo.update(key, |unit| unit.end()).await?;
            }
        }

        tracing::warn!("Retired {} after a failed run", key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use test_utils::{
        builder::TestBuilder,
        factory::{giveaway::GiveawayFactory, poll::PollFactory, schedule::ScheduleFactory},
    };

    use crate::{
        gateway::mock::{MockGateway, MOCK_BOT_ID},
        model::{giveaway::GIVEAWAY_MARKER, unit::UnitState},
        scheduler::Scheduler,
    };

    /// Tests firing a key whose record is gone.
    ///
    /// Expected: Retired without touching the gateway
    #[tokio::test]
    async fn missing_unit_is_a_no_op() -> Result<(), AppError> {
        let test = TestBuilder::new().build().await.unwrap();
        let store = Arc::new(JsonStore::new(test.data_dir()));
        let gateway = Arc::new(MockGateway::new());
        let resolver = OutcomeResolver::new(store, gateway.clone());

        let outcome = resolver
            .fire(UnitKey::new(UnitKind::Giveaway, 1, 2))
            .await?;

        assert_eq!(outcome, FireOutcome::Retired);
        assert!(gateway.sent().is_empty());

        Ok(())
    }

    /// Tests firing a giveaway that already ended.
    ///
    /// Expected: Retired, no second draw
    #[tokio::test]
    async fn ended_unit_is_a_no_op() -> Result<(), AppError> {
        let record = GiveawayFactory::new()
            .id(77)
            .guild_id(1)
            .ended_with_winners(&[5])
            .build();
        let test = TestBuilder::new()
            .with_record("giveaways.json", record)
            .build()
            .await
            .unwrap();
        let store = Arc::new(JsonStore::new(test.data_dir()));
        let gateway = Arc::new(MockGateway::new());
        let resolver = OutcomeResolver::new(store, gateway.clone());

        let outcome = resolver
            .fire(UnitKey::new(UnitKind::Giveaway, 1, 77))
            .await?;

        assert_eq!(outcome, FireOutcome::Retired);
        assert!(gateway.sent().is_empty());
        assert!(gateway.edits().is_empty());

        Ok(())
    }

    /// Tests dispatching a due giveaway.
    ///
    /// Expected: the single participant wins and the giveaway is ended
    #[tokio::test]
    async fn dispatches_giveaway() -> Result<(), AppError> {
        let record = GiveawayFactory::new()
            .id(78)
            .guild_id(1)
            .due_in_minutes(-1)
            .build();
        let test = TestBuilder::new()
            .with_record("giveaways.json", record)
            .build()
            .await
            .unwrap();
        let store = Arc::new(JsonStore::new(test.data_dir()));
        let gateway =
            Arc::new(MockGateway::new().with_reactors(78, GIVEAWAY_MARKER, &[MOCK_BOT_ID, 42]));
        let resolver = OutcomeResolver::new(store.clone(), gateway.clone());
        let key = UnitKey::new(UnitKind::Giveaway, 1, 78);

        let outcome = resolver.fire(key).await?;

        assert_eq!(outcome, FireOutcome::Retired);
        let stored = TimedUnitRepository::new(&store).get(key).await?.unwrap();
        assert_eq!(stored.state, UnitState::Ended);
        let UnitPayload::Giveaway(payload) = stored.payload else {
            panic!("expected giveaway payload");
        };
        assert_eq!(payload.winner_ids, Some(vec![42]));

        Ok(())
    }

    /// Tests dispatching a due poll.
    ///
    /// Expected: results card posted and the poll deleted
    #[tokio::test]
    async fn dispatches_poll() -> Result<(), AppError> {
        let record = PollFactory::new().id(79).guild_id(1).build();
        let test = TestBuilder::new()
            .with_record("polls.json", record)
            .build()
            .await
            .unwrap();
        let store = Arc::new(JsonStore::new(test.data_dir()));
        let gateway = Arc::new(MockGateway::new().with_count(79, "1️⃣", 3));
        let resolver = OutcomeResolver::new(store.clone(), gateway.clone());
        let key = UnitKey::new(UnitKind::Poll, 1, 79);

        let outcome = resolver.fire(key).await?;

        assert_eq!(outcome, FireOutcome::Retired);
        assert_eq!(gateway.sent_cards().len(), 1);
        assert!(TimedUnitRepository::new(&store).get(key).await?.is_none());

        Ok(())
    }

    /// Tests dispatching a repeating schedule.
    ///
    /// Expected: message sent and a re-arm requested
    #[tokio::test]
    async fn dispatches_schedule() -> Result<(), AppError> {
        let record = ScheduleFactory::new()
            .id(80)
            .guild_id(1)
            .repeating(300)
            .message("ping")
            .build();
        let test = TestBuilder::new()
            .with_record("schedules.json", record)
            .build()
            .await
            .unwrap();
        let store = Arc::new(JsonStore::new(test.data_dir()));
        let gateway = Arc::new(MockGateway::new());
        let resolver = OutcomeResolver::new(store, gateway.clone());

        let outcome = resolver
            .fire(UnitKey::new(UnitKind::Schedule, 1, 80))
            .await?;

        assert!(matches!(outcome, FireOutcome::Rearm(_)));
        assert_eq!(gateway.sent_texts(), vec!["ping".to_string()]);

        Ok(())
    }

    /// Tests retiring each kind after a failed run.
    ///
    /// Expected: poll removed, giveaway and schedule kept as ended
    #[tokio::test]
    async fn retire_ends_or_removes() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_record(
                "giveaways.json",
                GiveawayFactory::new().id(1).guild_id(1).build(),
            )
            .with_record("polls.json", PollFactory::new().id(2).guild_id(1).build())
            .with_record(
                "schedules.json",
                ScheduleFactory::new().id(3).guild_id(1).build(),
            )
            .build()
            .await
            .unwrap();
        let store = Arc::new(JsonStore::new(test.data_dir()));
        let resolver = OutcomeResolver::new(store.clone(), Arc::new(MockGateway::new()));
        let repo = TimedUnitRepository::new(&store);
        let giveaway = UnitKey::new(UnitKind::Giveaway, 1, 1);
        let poll = UnitKey::new(UnitKind::Poll, 1, 2);
        let schedule = UnitKey::new(UnitKind::Schedule, 1, 3);

        resolver.retire(giveaway).await?;
        resolver.retire(poll).await?;
        resolver.retire(schedule).await?;

        assert_eq!(repo.get(giveaway).await?.unwrap().state, UnitState::Ended);
        assert!(repo.get(poll).await?.is_none());
        assert_eq!(repo.get(schedule).await?.unwrap().state, UnitState::Ended);

        Ok(())
    }

    /// Tests overdue units whose sends fail when the scheduler fires them.
    ///
    /// Expected: schedule kept as ended, poll removed, neither key still tracked
    #[tokio::test]
    async fn failed_send_retires_through_scheduler() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_record(
                "schedules.json",
                ScheduleFactory::new()
                    .id(90)
                    .guild_id(1)
                    .repeating(3600)
                    .due_in_minutes(-60)
                    .build(),
            )
            .with_record(
                "polls.json",
                PollFactory::new().id(91).guild_id(1).due_in_minutes(-5).build(),
            )
            .build()
            .await
            .unwrap();
        let store = Arc::new(JsonStore::new(test.data_dir()));
        let gateway = Arc::new(MockGateway::new().failing_sends());
        let scheduler = Scheduler::new(
            store.clone(),
            Arc::new(OutcomeResolver::new(store.clone(), gateway.clone())),
        );
        let repo = TimedUnitRepository::new(&store);
        let schedule = UnitKey::new(UnitKind::Schedule, 1, 90);
        let poll = UnitKey::new(UnitKind::Poll, 1, 91);

        assert_eq!(scheduler.resume_all().await?, 2);

        for _ in 0..200 {
            if scheduler.tracked_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(!scheduler.is_tracked(schedule).await);
        assert!(!scheduler.is_tracked(poll).await);
        assert_eq!(repo.get(schedule).await?.unwrap().state, UnitState::Ended);
        assert!(repo.get(poll).await?.is_none());
        assert!(gateway.sent().is_empty());

        Ok(())
    }
}
