//! HTTP routing, handlers and middleware.

pub(crate) mod caller;
pub(crate) mod constants;
pub(crate) mod download;
pub(crate) mod health;
pub(crate) mod router;
pub(crate) mod telemetry;
