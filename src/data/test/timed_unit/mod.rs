use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory};

use crate::{
    data::{store::JsonStore, timed_unit::TimedUnitRepository},
    error::AppError,
    model::{
        schedule::SchedulePayload,
        unit::{FirePolicy, TimedUnit, UnitKey, UnitKind, UnitPayload, UnitState},
    },
};

mod create;
mod delete;
mod get;
mod update;

fn schedule_unit(guild_id: u64, id: u64, due_in_minutes: i64) -> TimedUnit {
    let now = Utc::now();
    TimedUnit {
        id,
        guild_id,
        channel_id: 77,
        creator_id: 88,
        created_at: now,
        state: UnitState::Active,
        fire_policy: FirePolicy::Once {
            at: now + Duration::minutes(due_in_minutes),
        },
        payload: UnitPayload::Schedule(SchedulePayload {
            message: format!("message {id}"),
            use_embed: false,
        }),
    }
}
