//! User module: validation, mapping, search predicate, repository and service.
//!
//! The service is independent of the web framework; the server crate only
//! translates HTTP into calls on [`UserService`].

pub mod domain;
pub mod errors;
pub mod mapper;
pub mod predicate;
pub mod repo;
pub mod repository;
pub mod service;
pub mod validation;

pub use service::UserService;
