//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; rules that need no I/O (discount
//! precedence, reference-domain gating) live next to them as pure functions.
//!
//! # Entity Types
//!
//! - [`Workspace`] - Tenant boundary with a billing [`Plan`]
//! - [`Link`] - A `(domain, key)` short link, optionally owned by a partner
//! - [`Partner`], [`Program`], [`ProgramEnrollment`] - Affiliate program membership
//! - [`Discount`] - Partner-level or program-default discount
//! - [`DefaultDomains`] - Reference domains a workspace opted into

pub mod default_domains;
pub mod discount;
pub mod link;
pub mod partner;
pub mod workspace;

pub use default_domains::{DefaultDomainFlags, DefaultDomains, ReferenceDomain};
pub use discount::{Discount, DiscountType, resolve_effective_discount};
pub use link::{InFolder, Link, LinkPartner, LinkWithPartner, links_have_folders};
pub use partner::{EnrollmentWithProgram, Partner, Program, ProgramEnrollment};
pub use workspace::{Plan, Workspace};
