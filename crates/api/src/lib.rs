//! HTTP API: routing, bearer authentication, per-route access policies.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
