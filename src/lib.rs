//! m365-cli - manage Microsoft 365 from the command line
//!
//! Commands validate their options, resolve display names to ids, call the
//! Graph or SharePoint REST API and hand the response to the output sink.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod types;
pub mod validation;

pub use api::client::M365Client;
pub use config::Config;
pub use error::CommandError;
