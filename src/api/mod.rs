//! HTTP surface: DTOs, handlers, middleware and route tables.
//!
//! Handlers stay thin; they check scopes, translate DTOs into service
//! calls and map [`crate::error::AppError`] into responses.
//!
//! # Modules
//!
//! - [`dto`] - Wire types (camelCase JSON, query strings)
//! - [`extract`] - `Query`/`Json` extractors that reject with `AppError`
//! - [`handlers`] - One module per endpoint group
//! - [`middleware`] - Bearer authentication, rate limiting, request tracing
//! - [`routes`] - Workspace and partner route groups

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
