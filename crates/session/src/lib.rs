//! Interaction state for one route-planning session.
//!
//! Everything in this crate is synchronous. Network-facing orchestration
//! lives in the `planner` crate and writes its results back through a
//! [`SessionHandle`].

pub mod controller;
pub mod error;
pub mod handle;
pub mod markers;
pub mod mode;
pub mod moderation;
pub mod obstacles;
pub mod planning;
pub mod route;
pub mod state;
pub mod validator;

pub use controller::*;
pub use error::*;
pub use handle::*;
pub use markers::*;
pub use mode::*;
pub use moderation::*;
pub use obstacles::*;
pub use planning::*;
pub use route::*;
pub use state::*;
pub use validator::*;
