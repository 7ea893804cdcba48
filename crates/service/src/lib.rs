//! Service layer providing the user workflows on top of models.
//! - Separates business logic from data access behind `UserRepository`.
//! - Reuses entity definitions from the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod pagination;
pub mod user;
#[cfg(test)]
mod test_support;
