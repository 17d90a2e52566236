use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use serenity::async_trait;
use test_utils::{builder::TestBuilder, context::TestContext};
use tokio::sync::Notify;

use crate::{
    data::store::JsonStore,
    error::{gateway::GatewayError, AppError},
    model::unit::{FireOutcome, UnitKey, UnitKind},
    scheduler::{FireHandler, Scheduler},
};


enum Behavior {
    Retire,
    RearmAfter(Duration),
    Fail,
    Panic,
}

/// Handler that counts calls and optionally blocks inside `fire` until released.
struct TestHandler {
    behavior: Behavior,
    fires: AtomicUsize,
    retires: AtomicUsize,
    started: Notify,
    gate: Option<Notify>,
}

impl TestHandler {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            fires: AtomicUsize::new(0),
            retires: AtomicUsize::new(0),
            started: Notify::new(),
            gate: None,
        })
    }

    fn gated(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            fires: AtomicUsize::new(0),
            retires: AtomicUsize::new(0),
            started: Notify::new(),
            gate: Some(Notify::new()),
        })
    }

    fn fires(&self) -> usize {
        self.fires.load(Ordering::SeqCst)
    }

    fn retires(&self) -> usize {
        self.retires.load(Ordering::SeqCst)
    }

    fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl FireHandler for TestHandler {
    async fn fire(&self, _key: UnitKey) -> Result<FireOutcome, AppError> {
        self.fires.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match self.behavior {
            Behavior::Retire => Ok(FireOutcome::Retired),
            Behavior::RearmAfter(delay) => Ok(FireOutcome::Rearm(
                Utc::now() + chrono::Duration::from_std(delay).unwrap(),
            )),
            Behavior::Fail => Err(GatewayError::NotFound("Unknown Channel".to_string()).into()),
            Behavior::Panic => panic!("resolver blew up"),
        }
    }

    async fn retire(&self, _key: UnitKey) -> Result<(), AppError> {
        self.retires.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

async fn scheduler_with(handler: Arc<TestHandler>) -> (TestContext, Scheduler) {
    let test = TestBuilder::new().build().await.unwrap();
    let store = Arc::new(JsonStore::new(test.data_dir()));
    (test, Scheduler::new(store, handler))
}

fn key(unit_id: u64) -> UnitKey {
    UnitKey::new(UnitKind::Schedule, 1, unit_id)
}

/// Polls `condition` for up to two seconds.
async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Gives spawned tasks time to make progress.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
