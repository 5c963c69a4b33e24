//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and domain services independent of
//! infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`analytics`] - Analytics query model and time-window rules
//! - [`repositories`] - Data access trait definitions
//! - [`principal`] - Authenticated callers and scopes
//! - [`link_event`] - Link event model for asynchronous ingestion
//! - [`event_worker`] - Background worker persisting link events
//!
//! # Event Processing Flow
//!
//! 1. Redirect handler resolves the link and answers immediately
//! 2. [`link_event::LinkEvent`] is sent to a bounded channel
//! 3. [`event_worker::run_event_worker`] persists it with retry logic
//! 4. Events are aggregated later through [`repositories::AnalyticsStore`]

pub mod analytics;
pub mod entities;
pub mod event_worker;
pub mod link_event;
pub mod principal;
pub mod repositories;
