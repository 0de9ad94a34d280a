#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Service configuration loaded from environment variables.
//!
//! Layout: `defaults.rs` (variable names and default values), `model.rs`
//! (`ServiceConfig`), `loader.rs` (environment lookup), `validate.rs`
//! (duration, address and URL parsing), `error.rs`.

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{OtelSettings, ServiceConfig};
pub use validate::{parse_bind_addr, parse_duration};
