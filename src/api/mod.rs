pub mod auth;
pub mod client;
pub mod lookup;
pub mod odata;

pub use auth::*;
pub use client::*;

/// Entra ID sign-in authority
pub const LOGIN_URL: &str = "https://login.microsoftonline.com";

/// Resource every sign-in is initially scoped to
pub const RESOURCE_GRAPH: &str = "https://graph.microsoft.com";

/// Public client id of the PnP Microsoft 365 CLI multi-tenant app
pub const CLI_CLIENT_ID: &str = "31359c7f-bd7e-475c-86db-fdb8c937548e";

/// Environment variable holding a ready-to-use bearer token
pub const ACCESS_TOKEN_ENV: &str = "M365_ACCESS_TOKEN";
