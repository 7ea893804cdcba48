use async_trait::async_trait;
use models::user;

use super::errors::UserError;
use super::predicate::UserPredicate;
use crate::pagination::{Page, PageRequest};

/// Persistence boundary for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<user::Model>, UserError>;
    /// A record whose email equals `email` ignoring case, skipping `exclude_id`.
    async fn find_by_email_ignore_case(
        &self,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<user::Model>, UserError>;
    async fn exists_by_email_ignore_case(&self, email: &str) -> Result<bool, UserError>;

    /// Insert when the id is unset, update otherwise.
    async fn save(&self, user: user::ActiveModel) -> Result<user::Model, UserError>;
    async fn delete(&self, user: user::Model) -> Result<(), UserError>;

    async fn find_page_matching(
        &self,
        predicate: &UserPredicate,
        page: &PageRequest,
    ) -> Result<Page<user::Model>, UserError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use sea_orm::{ActiveValue, TryIntoModel};
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    struct State {
        users: BTreeMap<i64, user::Model>,
        last_id: i64,
    }

    /// Behaves like the users table: ids are assigned in insertion order and
    /// an exact duplicate email is rejected the way the unique key would.
    #[derive(Default)]
    pub struct MockUserRepository {
        state: Mutex<State>,
    }

    impl MockUserRepository {
        fn state(&self) -> Result<MutexGuard<'_, State>, UserError> {
            self.state.lock().map_err(|e| UserError::Unexpected(e.to_string()))
        }

        pub fn len(&self) -> Result<usize, UserError> {
            Ok(self.state()?.users.len())
        }

        pub fn is_empty(&self) -> Result<bool, UserError> {
            Ok(self.len()? == 0)
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_id(&self, id: i64) -> Result<Option<user::Model>, UserError> {
            Ok(self.state()?.users.get(&id).cloned())
        }

        async fn find_by_email_ignore_case(
            &self,
            email: &str,
            exclude_id: Option<i64>,
        ) -> Result<Option<user::Model>, UserError> {
            let needle = email.to_lowercase();
            let state = self.state()?;
            Ok(state
                .users
                .values()
                .find(|u| Some(u.id) != exclude_id && u.email.to_lowercase() == needle)
                .cloned())
        }

        async fn exists_by_email_ignore_case(&self, email: &str) -> Result<bool, UserError> {
            Ok(self.find_by_email_ignore_case(email, None).await?.is_some())
        }

        async fn save(&self, mut am: user::ActiveModel) -> Result<user::Model, UserError> {
            let mut state = self.state()?;
            let inserting = am.id.is_not_set();
            if inserting {
                am.id = ActiveValue::Set(state.last_id + 1);
            }
            let model = am.try_into_model()?;

            if !inserting && !state.users.contains_key(&model.id) {
                return Err(UserError::Unexpected(format!("no row with id {} to update", model.id)));
            }
            if state.users.values().any(|u| u.id != model.id && u.email == model.email) {
                return Err(UserError::Unexpected(format!(
                    "duplicate key value violates unique constraint on email: {}",
                    model.email
                )));
            }

            if inserting {
                state.last_id = model.id;
            }
            state.users.insert(model.id, model.clone());
            Ok(model)
        }

        async fn delete(&self, user: user::Model) -> Result<(), UserError> {
            self.state()?.users.remove(&user.id);
            Ok(())
        }

        async fn find_page_matching(
            &self,
            predicate: &UserPredicate,
            page: &PageRequest,
        ) -> Result<Page<user::Model>, UserError> {
            let state = self.state()?;
            let mut matching: Vec<&user::Model> = state.users.values().filter(|u| predicate.matches(u)).collect();
            matching.sort_by(|a, b| page.compare(a, b));

            let total = matching.len() as u64;
            let items = matching
                .into_iter()
                .skip(page.offset().and_then(|o| usize::try_from(o).ok()).unwrap_or(usize::MAX))
                .take(page.size as usize)
                .cloned()
                .collect();
            Ok(Page::new(items, total, page))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::sync::Arc;

        #[tokio::test]
        async fn poisoned_lock_is_reported() {
            let repo = Arc::new(MockUserRepository::default());
            let poisoner = repo.clone();
            let _ = std::thread::spawn(move || {
                let _guard = poisoner.state.lock();
                panic!("poison");
            })
            .join();
            assert!(matches!(repo.len(), Err(UserError::Unexpected(_))));
            assert!(matches!(repo.is_empty(), Err(UserError::Unexpected(_))));
            assert!(matches!(repo.find_by_id(1).await, Err(UserError::Unexpected(_))));
        }
    }
}
