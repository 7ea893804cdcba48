//! Pagination utilities for service layer
//!
//! `PageRequest` carries a zero-based page index, a clamped page size and an
//! optional list of sort orders; `Page` is the result handed back to callers.

use std::cmp::Ordering;

use models::user;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("unknown sort field: {0}")]
    UnknownField(String),
    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for sea_orm::Order {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Asc => sea_orm::Order::Asc,
            Direction::Desc => sea_orm::Order::Desc,
        }
    }
}

/// Sortable user attributes, named as on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Id,
    FirstName,
    LastName,
    Email,
    Role,
    Status,
    BirthDate,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        let field = match name {
            "id" => Self::Id,
            "firstName" => Self::FirstName,
            "lastName" => Self::LastName,
            "email" => Self::Email,
            "role" => Self::Role,
            "status" => Self::Status,
            "birthDate" => Self::BirthDate,
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }

    pub fn column(self) -> user::Column {
        match self {
            Self::Id => user::Column::Id,
            Self::FirstName => user::Column::FirstName,
            Self::LastName => user::Column::LastName,
            Self::Email => user::Column::Email,
            Self::Role => user::Column::Role,
            Self::Status => user::Column::Status,
            Self::BirthDate => user::Column::BirthDate,
            Self::CreatedAt => user::Column::CreatedAt,
            Self::UpdatedAt => user::Column::UpdatedAt,
        }
    }

    /// Ascending comparison of two records on this field.
    pub fn compare(self, a: &user::Model, b: &user::Model) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::FirstName => a.first_name.cmp(&b.first_name),
            Self::LastName => a.last_name.cmp(&b.last_name),
            Self::Email => a.email.cmp(&b.email),
            Self::Role => a.role.cmp(&b.role),
            Self::Status => a.status.cmp(&b.status),
            Self::BirthDate => a.birth_date.cmp(&b.birth_date),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: SortField) -> Self {
        Self { field, direction: Direction::Asc }
    }

    pub fn desc(field: SortField) -> Self {
        Self { field, direction: Direction::Desc }
    }

    /// Parse `lastName,desc;firstName` style input. Direction defaults to ascending.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, PaginationError> {
        raw.split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse_one)
            .collect()
    }

    /// Parse every value of a repeated `sort` parameter, in order. Each value
    /// may itself hold several `;`-separated orders.
    pub fn parse_all<S: AsRef<str>>(values: &[S]) -> Result<Vec<Self>, PaginationError> {
        let mut orders = Vec::new();
        for value in values {
            orders.extend(Self::parse_list(value.as_ref())?);
        }
        Ok(orders)
    }

    fn parse_one(part: &str) -> Result<Self, PaginationError> {
        let (name, direction) = match part.split_once(',') {
            Some((name, dir)) => (name.trim(), dir.trim()),
            None => (part, ""),
        };
        let field = SortField::parse(name).ok_or_else(|| PaginationError::UnknownField(name.to_string()))?;
        let direction = match direction.to_ascii_lowercase().as_str() {
            "" | "asc" => Direction::Asc,
            "desc" => Direction::Desc,
            _ => return Err(PaginationError::UnknownDirection(direction.to_string())),
        };
        Ok(Self { field, direction })
    }

    pub fn compare(&self, a: &user::Model, b: &user::Model) -> Ordering {
        let ord = self.field.compare(a, b);
        match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }
}

/// Pagination parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Clamp to sane defaults.
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    /// Rows to skip; `None` when `page * size` does not fit in a `u64`.
    pub fn offset(&self) -> Option<u64> {
        self.page.checked_mul(self.size)
    }

    /// Compare by every sort order in turn, then by id.
    pub fn compare(&self, a: &user::Model, b: &user::Model) -> Ordering {
        self.sort
            .iter()
            .map(|o| o.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total_items,
            page: request.page,
            size: request.size,
            total_pages: total_items.div_ceil(request.size.max(1)),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
        }
    }
}
