//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod default_domains;
pub mod health;
pub mod links;
pub mod partner_analytics;
pub mod programs;
pub mod redirect;

pub use default_domains::{list_default_domains_handler, update_default_domains_handler};
pub use health::health_handler;
pub use links::{bulk_delete_links_handler, link_info_handler};
pub use partner_analytics::partner_analytics_handler;
pub use programs::{commissions_timeseries_handler, program_revenue_handler};
pub use redirect::redirect_handler;
