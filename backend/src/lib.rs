//! Roomboard backend: session-authenticated household management.
//!
//! Hexagonal layout: `domain` holds entities, form validation, and use-case
//! services behind ports; `inbound::http` adapts actix-web requests onto
//! them; `outbound` implements the ports over PostgreSQL and Redis;
//! `server` wires the production adapters together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
