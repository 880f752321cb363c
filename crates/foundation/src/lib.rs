pub mod bounds;
pub mod geo;
pub mod geodesy;
pub mod ids;

// Foundation crate: small, well-tested geographic primitives only.
pub use bounds::*;
pub use geo::*;
pub use geodesy::*;
pub use ids::*;
