//! SeaORM entities, one per table.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

use sea_orm::ActiveValue::{self, NotSet, Set};

/// Serial keys are assigned by the database; `0` marks an unsaved row.
pub(crate) fn serial(id: i32) -> ActiveValue<i32> {
    if id == 0 { NotSet } else { Set(id) }
}
