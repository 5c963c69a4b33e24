//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link lookups, partner resolution, bulk deletion
//! - [`ProgramRepository`] - Programs and partner enrollments
//! - [`DefaultDomainsRepository`] - Per-workspace reference domain flags
//! - [`AnalyticsStore`] - Event ingestion and aggregation
//! - [`CommissionRepository`] - Commission earnings series
//! - [`TokenRepository`] - API token authentication
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod analytics_store;
pub mod commission_repository;
pub mod default_domains_repository;
pub mod link_repository;
pub mod program_repository;
pub mod token_repository;

pub use analytics_store::AnalyticsStore;
pub use commission_repository::CommissionRepository;
pub use default_domains_repository::DefaultDomainsRepository;
pub use link_repository::{LinkPartnerRecord, LinkRepository};
pub use program_repository::ProgramRepository;
pub use token_repository::{ApiToken, NewApiToken, TokenGrant, TokenRepository};

#[cfg(test)]
pub use analytics_store::MockAnalyticsStore;
#[cfg(test)]
pub use commission_repository::MockCommissionRepository;
#[cfg(test)]
pub use default_domains_repository::MockDefaultDomainsRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use program_repository::MockProgramRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
