//! Business layer for cardledger.
//!
//! Domain models, the REST client for the cardledger service, and the
//! compute/command data-fetch layer the UI reads through
//! [`cardledger_states::StateCtx`].

pub mod allocation;
pub mod api;
pub mod api_status;
pub mod config;
pub mod http;
pub mod inventory;
pub mod model;
pub mod money;
pub mod route;
pub mod transactions;

pub use config::ApiConfig;
pub use route::Route;
