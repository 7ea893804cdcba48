use std::sync::Arc;

use chrono::Utc;
use models::user;
use tracing::{debug, info, instrument};

use super::domain::{UserInput, UserResponse, UserSearchCriteria};
use super::errors::UserError;
use super::mapper::{apply_update, to_new_active_model};
use super::predicate::UserPredicate;
use super::repository::UserRepository;
use super::validation::validate;
use crate::pagination::{Page, PageRequest};

/// User business service independent of web framework
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Validate and store a new user.
    ///
    /// # Examples
    /// ```
    /// use service::user::{UserService, repository::mock::MockUserRepository};
    /// use service::user::domain::UserInput;
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(MockUserRepository::default()));
    /// let input = UserInput {
    ///     first_name: Some("Juan".into()),
    ///     last_name: Some("Perez".into()),
    ///     email: Some("juan.perez@example.com".into()),
    ///     ..Default::default()
    /// };
    /// let user = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(user.id, 1);
    /// assert_eq!(user.created_at, user.updated_at);
    /// ```
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn create(&self, input: UserInput) -> Result<UserResponse, UserError> {
        let valid = validate(input)?;
        self.ensure_email_unique(&valid.email, None).await?;

        let saved = self.repo.save(to_new_active_model(valid, Utc::now().into())).await?;
        info!(user_id = saved.id, email = %saved.email, "user_created");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<UserResponse, UserError> {
        Ok(self.find_user(id).await?.into())
    }

    /// Replace every mutable field of an existing user.
    ///
    /// # Examples
    /// ```
    /// use service::user::{UserService, repository::mock::MockUserRepository};
    /// use service::user::domain::UserInput;
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(MockUserRepository::default()));
    /// let mut input = UserInput {
    ///     first_name: Some("Juan".into()),
    ///     last_name: Some("Perez".into()),
    ///     email: Some("juan@example.com".into()),
    ///     role: Some("USER".into()),
    ///     ..Default::default()
    /// };
    /// let created = tokio_test::block_on(svc.create(input.clone())).unwrap();
    /// input.role = None;
    /// let updated = tokio_test::block_on(svc.update(created.id, input)).unwrap();
    /// assert_eq!(updated.role, None);
    /// assert_eq!(updated.created_at, created.created_at);
    /// ```
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn update(&self, id: i64, input: UserInput) -> Result<UserResponse, UserError> {
        let valid = validate(input)?;
        let existing = self.find_user(id).await?;
        self.ensure_email_unique(&valid.email, Some(id)).await?;

        let saved = self.repo.save(apply_update(existing, valid, Utc::now().into())).await?;
        info!(user_id = saved.id, email = %saved.email, "user_updated");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        let existing = self.find_user(id).await?;
        self.repo.delete(existing).await?;
        info!(user_id = id, "user_deleted");
        Ok(())
    }

    /// Filtered, paginated listing. Blank criteria are ignored.
    #[instrument(skip(self, criteria))]
    pub async fn search(
        &self,
        criteria: &UserSearchCriteria,
        page: &PageRequest,
    ) -> Result<Page<UserResponse>, UserError> {
        let predicate = UserPredicate::from_criteria(criteria);
        debug!(clauses = predicate.clauses().len(), "user_search");
        let found = self.repo.find_page_matching(&predicate, page).await?;
        Ok(found.map(UserResponse::from))
    }

    async fn find_user(&self, id: i64) -> Result<user::Model, UserError> {
        self.repo.find_by_id(id).await?.ok_or(UserError::NotFound { id })
    }

    /// Fails when another record already holds `email`, ignoring case.
    async fn ensure_email_unique(&self, email: &str, exclude_id: Option<i64>) -> Result<(), UserError> {
        let taken = match exclude_id {
            None => self.repo.exists_by_email_ignore_case(email).await?,
            Some(id) => self
                .repo
                .find_by_email_ignore_case(email, Some(id))
                .await?
                .is_some(),
        };
        if taken {
            debug!(email, "email already in use");
            return Err(UserError::Conflict { email: email.to_string() });
        }
        Ok(())
    }
}
