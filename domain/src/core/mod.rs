//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelSpec`] / [`model::ModelCatalog`]: selectable models and their providers
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
