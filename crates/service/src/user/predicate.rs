//! Search predicate built from optional criteria.
//!
//! Each present criterion contributes one [`Clause`]; clauses are AND-ed onto an
//! always-true base, so an empty predicate matches every record. The same
//! clause list renders to a SeaORM [`Condition`] for the database and is
//! evaluated directly against records by the in-memory repository.

use chrono::NaiveDate;
use models::user;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

use super::domain::UserSearchCriteria;
use super::validation::non_blank;

const LIKE_ESCAPE: char = '\\';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Clause {
    /// Substring of first name or last name.
    NameContains(String),
    EmailContains(String),
    RoleEquals(String),
    StatusEquals(String),
    BirthDateFrom(NaiveDate),
    BirthDateTo(NaiveDate),
}

impl Clause {
    pub fn to_expr(&self) -> SimpleExpr {
        match self {
            Clause::NameContains(needle) => lower(user::Column::FirstName)
                .like(like_pattern(needle))
                .or(lower(user::Column::LastName).like(like_pattern(needle))),
            Clause::EmailContains(needle) => lower(user::Column::Email).like(like_pattern(needle)),
            Clause::RoleEquals(value) => lower(user::Column::Role).eq(value.clone()),
            Clause::StatusEquals(value) => lower(user::Column::Status).eq(value.clone()),
            Clause::BirthDateFrom(date) => user::Column::BirthDate.gte(*date),
            Clause::BirthDateTo(date) => user::Column::BirthDate.lte(*date),
        }
    }

    pub fn matches(&self, u: &user::Model) -> bool {
        match self {
            Clause::NameContains(needle) => {
                u.first_name.to_lowercase().contains(needle.as_str())
                    || u.last_name.to_lowercase().contains(needle.as_str())
            }
            Clause::EmailContains(needle) => u.email.to_lowercase().contains(needle.as_str()),
            Clause::RoleEquals(value) => u.role.as_deref().is_some_and(|r| r.to_lowercase() == *value),
            Clause::StatusEquals(value) => u.status.as_deref().is_some_and(|s| s.to_lowercase() == *value),
            Clause::BirthDateFrom(date) => u.birth_date.is_some_and(|b| b >= *date),
            Clause::BirthDateTo(date) => u.birth_date.is_some_and(|b| b <= *date),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPredicate {
    clauses: Vec<Clause>,
}

impl UserPredicate {
    pub fn from_criteria(criteria: &UserSearchCriteria) -> Self {
        let text = |v: &Option<String>| non_blank(v.as_deref()).map(|s| s.trim().to_lowercase());

        let clauses = [
            text(&criteria.name).map(Clause::NameContains),
            text(&criteria.email).map(Clause::EmailContains),
            text(&criteria.role).map(Clause::RoleEquals),
            text(&criteria.status).map(Clause::StatusEquals),
            criteria.birth_date_from.map(Clause::BirthDateFrom),
            criteria.birth_date_to.map(Clause::BirthDateTo),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn to_condition(&self) -> Condition {
        self.clauses
            .iter()
            .fold(Condition::all(), |cond, clause| cond.add(clause.to_expr()))
    }

    pub fn matches(&self, u: &user::Model) -> bool {
        self.clauses.iter().all(|clause| clause.matches(u))
    }
}

fn lower(col: user::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col(col)))
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn like_pattern(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn record(first: &str, last: &str, email: &str, birth: Option<(i32, u32, u32)>) -> user::Model {
        let now = Utc::now().into();
        user::Model {
            id: 1,
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            role: Some("Admin".into()),
            status: None,
            birth_date: birth.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            created_at: now,
            updated_at: now,
        }
    }

    fn sql(p: &UserPredicate) -> String {
        user::Entity::find()
            .filter(p.to_condition())
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn blank_criteria_produce_no_clauses() {
        let criteria = UserSearchCriteria {
            name: Some("   ".into()),
            email: Some(String::new()),
            role: None,
            status: Some("\t".into()),
            ..Default::default()
        };
        let p = UserPredicate::from_criteria(&criteria);
        assert!(p.is_match_all());
        assert!(p.matches(&record("a", "b", "c@d", None)));
        assert!(!sql(&p).contains("WHERE"));
    }

    #[test]
    fn text_values_are_trimmed_and_lowercased() {
        let criteria = UserSearchCriteria {
            name: Some("  HecTor ".into()),
            role: Some(" ADMIN ".into()),
            ..Default::default()
        };
        let p = UserPredicate::from_criteria(&criteria);
        assert_eq!(
            p.clauses(),
            &[Clause::NameContains("hector".into()), Clause::RoleEquals("admin".into())]
        );
    }

    #[test]
    fn name_matches_first_or_last_name() {
        let p = UserPredicate::from_criteria(&UserSearchCriteria { name: Some("Hector".into()), ..Default::default() });
        assert!(p.matches(&record("Hector", "Lavoe", "h@x.com", None)));
        assert!(p.matches(&record("Ana", "Hector", "a@x.com", None)));
        assert!(p.matches(&record("Ana", "Hectorio", "a@x.com", None)));
        assert!(!p.matches(&record("Ana", "Gomez", "hector@x.com", None)));
    }

    #[test]
    fn role_is_exact_and_null_never_matches() {
        let p = UserPredicate::from_criteria(&UserSearchCriteria { role: Some("admin".into()), ..Default::default() });
        assert!(p.matches(&record("a", "b", "c@d", None)));

        let mut other = record("a", "b", "c@d", None);
        other.role = Some("administrator".into());
        assert!(!p.matches(&other));
        other.role = None;
        assert!(!p.matches(&other));

        let s = UserPredicate::from_criteria(&UserSearchCriteria { status: Some("ACTIVE".into()), ..Default::default() });
        assert!(!s.matches(&other));
    }

    #[test]
    fn birth_date_range_is_inclusive() {
        let p = UserPredicate::from_criteria(&UserSearchCriteria {
            birth_date_from: NaiveDate::from_ymd_opt(1990, 1, 1),
            birth_date_to: NaiveDate::from_ymd_opt(2000, 12, 31),
            ..Default::default()
        });
        assert!(!p.matches(&record("a", "b", "c@d", Some((1985, 5, 5)))));
        assert!(p.matches(&record("a", "b", "c@d", Some((1995, 5, 5)))));
        assert!(p.matches(&record("a", "b", "c@d", Some((1990, 1, 1)))));
        assert!(p.matches(&record("a", "b", "c@d", Some((2000, 12, 31)))));
        assert!(!p.matches(&record("a", "b", "c@d", None)));
    }

    #[test]
    fn email_substring_is_case_insensitive() {
        let p = UserPredicate::from_criteria(&UserSearchCriteria { email: Some("EXAMPLE.com".into()), ..Default::default() });
        assert!(p.matches(&record("a", "b", "Juan@Example.COM", None)));
        assert!(!p.matches(&record("a", "b", "juan@example.org", None)));
    }

    #[test]
    fn wildcards_are_literal() {
        let p = UserPredicate::from_criteria(&UserSearchCriteria { email: Some("a_b".into()), ..Default::default() });
        assert!(p.matches(&record("x", "y", "a_b@x.com", None)));
        assert!(!p.matches(&record("x", "y", "axb@x.com", None)));
        assert!(sql(&p).contains("ESCAPE"));
    }

    #[test]
    fn sql_combines_clauses_with_and() {
        let p = UserPredicate::from_criteria(&UserSearchCriteria {
            name: Some("hector".into()),
            status: Some("active".into()),
            birth_date_from: NaiveDate::from_ymd_opt(1990, 1, 1),
            ..Default::default()
        });
        let sql = sql(&p);
        assert!(sql.contains("LOWER(\"first_name\") LIKE '%hector%'"), "{sql}");
        assert!(sql.contains("LOWER(\"last_name\") LIKE '%hector%'"), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains("LOWER(\"status\") = 'active'"), "{sql}");
        assert!(sql.contains("\"birth_date\" >= '1990-01-01'"), "{sql}");
        assert_eq!(sql.matches(" AND ").count(), 2, "{sql}");
    }
}
