use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use models::user;

use crate::pagination::{Page, PageRequest, SortField};
use crate::user::errors::UserError;
use crate::user::predicate::UserPredicate;
use crate::user::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn by_email_ignore_case(email: &str, exclude_id: Option<i64>) -> Select<user::Entity> {
    let select = user::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.to_lowercase()));
    match exclude_id {
        Some(id) => select.filter(user::Column::Id.ne(id)),
        None => select,
    }
}

/// Filtered and ordered query for one search; id breaks ties so paging is stable.
pub fn search_select(predicate: &UserPredicate, page: &PageRequest) -> Select<user::Entity> {
    let mut select = user::Entity::find().filter(predicate.to_condition());
    for order in &page.sort {
        select = select.order_by(order.field.column(), order.direction.into());
    }
    if !page.sort.iter().any(|o| o.field == SortField::Id) {
        select = select.order_by_asc(user::Column::Id);
    }
    select
}

/// One page of [`search_select`]; `None` when the offset overflows, which can
/// only lie past the last row.
pub fn page_select(predicate: &UserPredicate, page: &PageRequest) -> Option<Select<user::Entity>> {
    let offset = page.offset()?;
    Some(search_select(predicate, page).offset(offset).limit(page.size))
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<user::Model>, UserError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_email_ignore_case(
        &self,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<user::Model>, UserError> {
        Ok(by_email_ignore_case(email, exclude_id).one(&self.db).await?)
    }

    async fn exists_by_email_ignore_case(&self, email: &str) -> Result<bool, UserError> {
        Ok(by_email_ignore_case(email, None).count(&self.db).await? > 0)
    }

    async fn save(&self, am: user::ActiveModel) -> Result<user::Model, UserError> {
        let saved = if am.id.is_not_set() {
            am.insert(&self.db).await?
        } else {
            am.update(&self.db).await?
        };
        Ok(saved)
    }

    async fn delete(&self, user: user::Model) -> Result<(), UserError> {
        user::Entity::delete_by_id(user.id).exec(&self.db).await?;
        Ok(())
    }

    async fn find_page_matching(
        &self,
        predicate: &UserPredicate,
        page: &PageRequest,
    ) -> Result<Page<user::Model>, UserError> {
        let total = search_select(predicate, page).count(&self.db).await?;
        let items = match page_select(predicate, page) {
            Some(select) if total > 0 => select.all(&self.db).await?,
            _ => Vec::new(),
        };
        Ok(Page::new(items, total, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortOrder;
    use crate::test_support::get_db;
    use crate::user::domain::UserSearchCriteria;
    use crate::user::mapper::to_new_active_model;
    use crate::user::validation::ValidUser;
    use chrono::Utc;
    use sea_orm::{DbBackend, MockDatabase, QueryTrait, Value};
    use std::collections::BTreeMap;

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    fn stored(id: i64) -> user::Model {
        let now = Utc::now().into();
        user::Model {
            id,
            first_name: "Ana".into(),
            last_name: "Lopez".into(),
            email: format!("ana{id}@example.com"),
            role: None,
            status: None,
            birth_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn search_select_orders_then_breaks_ties_by_id() {
        let request = PageRequest::default().with_sort(vec![SortOrder::desc(SortField::LastName)]);
        let sql = search_select(&UserPredicate::default(), &request)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("ORDER BY \"users\".\"last_name\" DESC, \"users\".\"id\" ASC"), "{sql}");
    }

    #[test]
    fn search_select_defaults_to_id_order() {
        let sql = search_select(&UserPredicate::default(), &PageRequest::default())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("ORDER BY \"users\".\"id\" ASC"), "{sql}");
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn page_select_renders_limit_and_offset() {
        let request = PageRequest::new(Some(2), Some(2));
        let sql = page_select(&UserPredicate::default(), &request)
            .map(|s| s.build(DbBackend::Postgres).to_string())
            .unwrap_or_default();
        assert!(sql.ends_with("ORDER BY \"users\".\"id\" ASC LIMIT 2 OFFSET 4"), "{sql}");
    }

    #[test]
    fn page_select_is_none_when_offset_overflows() {
        let request = PageRequest::new(Some(u64::MAX), Some(100));
        assert!(page_select(&UserPredicate::default(), &request).is_none());
    }

    #[test]
    fn email_lookup_can_exclude_an_id() {
        let sql = by_email_ignore_case("Ana@X.com", Some(5)).build(DbBackend::Postgres).to_string();
        assert!(sql.contains("LOWER(\"email\") = 'ana@x.com'"), "{sql}");
        assert!(sql.contains("\"users\".\"id\" <> 5"), "{sql}");

        let sql = by_email_ignore_case("Ana@X.com", None).build(DbBackend::Postgres).to_string();
        assert!(!sql.contains("<>"), "{sql}");
    }

    #[tokio::test]
    async fn page_past_u64_range_is_empty_without_fetching() -> anyhow::Result<()> {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([[count_row(3)]])
            .into_connection();
        let repo = SeaOrmUserRepository::new(db);

        let request = PageRequest::new(Some(u64::MAX), Some(100));
        let page = repo.find_page_matching(&UserPredicate::default(), &request).await?;
        assert!(page.items.is_empty());
        assert_eq!((page.total_items, page.page, page.total_pages), (3, u64::MAX, 1));
        assert_eq!(repo.db.into_transaction_log().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn page_fetches_count_then_rows() -> anyhow::Result<()> {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([[count_row(3)]])
            .append_query_results([[stored(3)]])
            .into_connection();
        let repo = SeaOrmUserRepository::new(db);

        let page = repo.find_page_matching(&UserPredicate::default(), &PageRequest::new(Some(1), Some(2))).await?;
        assert_eq!(page.items.iter().map(|u| u.id).collect::<Vec<_>>(), [3]);
        assert_eq!((page.total_items, page.total_pages), (3, 2));
        assert_eq!(repo.db.into_transaction_log().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_repository_roundtrip() -> anyhow::Result<()> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmUserRepository::new(db);

        let tag = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let email = format!("Repo.{tag}@Example.com");
        let saved = repo
            .save(to_new_active_model(
                ValidUser {
                    first_name: format!("Zed{tag}"),
                    last_name: "Repo".into(),
                    email: email.clone(),
                    role: Some("ADMIN".into()),
                    status: None,
                    birth_date: None,
                },
                Utc::now().into(),
            ))
            .await?;
        assert!(saved.id > 0);

        assert!(repo.exists_by_email_ignore_case(&email.to_uppercase()).await?);
        let found = repo.find_by_email_ignore_case(&email.to_lowercase(), None).await?;
        assert_eq!(found.map(|u| u.id), Some(saved.id));
        assert!(repo.find_by_email_ignore_case(&email, Some(saved.id)).await?.is_none());

        let predicate = UserPredicate::from_criteria(&UserSearchCriteria {
            name: Some(format!("zed{tag}")),
            role: Some("admin".into()),
            ..Default::default()
        });
        let page = repo.find_page_matching(&predicate, &PageRequest::default()).await?;
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id, saved.id);

        repo.delete(saved.clone()).await?;
        assert!(repo.find_by_id(saved.id).await?.is_none());
        Ok(())
    }
}
