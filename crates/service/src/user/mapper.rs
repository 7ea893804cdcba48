//! Translation between validated input and the persisted record.
//!
//! Responses are built with `UserResponse::from(model)`.

use models::user;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveValue::NotSet, Set};

use super::validation::ValidUser;

/// A new record; the id is left for the store to assign.
pub fn to_new_active_model(user: ValidUser, now: DateTimeWithTimeZone) -> user::ActiveModel {
    user::ActiveModel {
        id: NotSet,
        first_name: Set(user.first_name),
        last_name: Set(user.last_name),
        email: Set(user.email),
        role: Set(user.role),
        status: Set(user.status),
        birth_date: Set(user.birth_date),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Replace every mutable field of `existing`. Absent optional values clear the
/// stored ones; `created_at` is left as is.
pub fn apply_update(existing: user::Model, user: ValidUser, now: DateTimeWithTimeZone) -> user::ActiveModel {
    let mut am: user::ActiveModel = existing.into();
    am.first_name = Set(user.first_name);
    am.last_name = Set(user.last_name);
    am.email = Set(user.email);
    am.role = Set(user.role);
    am.status = Set(user.status);
    am.birth_date = Set(user.birth_date);
    am.updated_at = Set(now);
    am
}
