//! # Pet Shop 🐾
//!
//! A terminal client for the Pet Shop records API.
//!
//! ## Overview
//!
//! Lists and creates owners and pets against a remote HTTP API. Lists are
//! rendered as expandable cards; pets can be created with a photo dropped
//! onto the terminal.
//!
//! ## Layout
//!
//! ```text
//!   cli / main ──► app (routes, views, event loop)
//!                    │  AsyncCommand / AsyncResult
//!                    ▼
//!                  api::ApiClient ──► models (schema checks)
//!                    │
//!                    └─► images (photo decoding)
//! ```
//!
//! - [`api`]: HTTP client and response interpretation
//! - [`app`]: terminal views, routing and the draw loop
//! - [`cli`]: argument parsing for the one-shot commands
//! - [`config`]: persisted settings and environment overrides
//! - [`images`]: photo decoding and terminal graphics
//! - [`models`]: records, create payloads and schema validation
//! - [`paths`]: config and log locations
//! - [`theme`]: palettes from ratatui-themes
//!
//! ## Example
//!
//! ```no_run
//! use petshop::api::{ApiClient, PetShopApi};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new("http://localhost:8000", Duration::from_secs(30))?;
//!     for owner in client.fetch_owners().await? {
//!         println!("{} {}", owner.id, owner.name);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod images;
pub mod models;
pub mod paths;
pub mod theme;

pub use api::{ApiClient, ApiError, PetShopApi};
pub use app::AppState;
pub use config::Config;
pub use models::{NewOwner, NewPet, Owner, Pet};
pub use theme::{Theme, ThemeColors};

pub use ratatui_themes::ThemeName;

/// Banner printed above `--help`
pub const LOGO: &str = r"
    ____       __     _____ __
   / __ \___  / /_   / ___// /_  ____  ____
  / /_/ / _ \/ __/   \__ \/ __ \/ __ \/ __ \
 / ____/  __/ /_    ___/ / / / / /_/ / /_/ /
/_/    \___/\__/   /____/_/ /_/\____/ .___/
                                   /_/
";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
