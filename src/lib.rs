//! Async Rust client library and CLI plumbing for Microsoft Graph user,
//! license, and group administration.
//!
//! Authenticates once with the OAuth2 client-credentials grant, then issues
//! Graph REST calls one at a time. Collection endpoints are drained through a
//! single pagination helper that follows `@odata.nextLink`.
//!
//! # Modules
//!
//! - [`auth`]: client-credentials token acquisition.
//! - [`client`]: authenticated HTTP wrapper and paginated fetch.
//! - [`users`]: list/get/create/update/delete users.
//! - [`licenses`]: subscribed SKUs, license details, license assignment.
//! - [`groups`]: group listing and membership references.
//! - [`config`]: JSON configuration file loading and validation.
//! - [`error`]: typed error hierarchy (`GraphError`).
//! - [`cli`], [`commands`], [`output`]: the `gua` command surface.
//!
//! # Quick Start
//!
//! ```ignore
//! use graph_user_admin::auth::TokenProvider;
//! use graph_user_admin::client::GraphClient;
//! use graph_user_admin::users::list_users;
//!
//! let tp = TokenProvider::new("tenant", "client_id", "secret")?;
//! let client = GraphClient::new(tp.acquire_token().await?)?;
//! let users = list_users(&client, None).await?;
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod groups;
pub mod licenses;
pub mod output;
pub mod users;
