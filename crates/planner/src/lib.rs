//! Remote planning service access and the request orchestration around it.
//!
//! Components here read a session through [`session::SessionHandle`], call a
//! [`PlannerService`] or [`Geocoder`], and write the outcome back. All
//! service access goes through those two traits so the HTTP adapters can be
//! swapped for in-memory ones.

pub mod admin;
pub mod error;
pub mod geocode;
mod inflight;
pub mod obstacles;
pub mod protocol;
pub mod routing;
pub mod service;

#[cfg(test)]
mod testing;

pub use admin::*;
pub use error::*;
pub use geocode::*;
pub use obstacles::*;
pub use protocol::*;
pub use routing::*;
pub use service::*;
