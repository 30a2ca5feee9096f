//! Types shared between the Pokédex server and anything that talks to it:
//! request/response bodies, per-route error codes and the configuration
//! model.

pub mod config;
pub mod types;
