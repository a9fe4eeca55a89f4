pub mod camps;
pub mod config;
pub mod errors;
pub mod pathfinding;
pub mod terrain;
pub mod world;

// Selective re-exports for external consumers
pub use camps::{CampLayout, CampSite};
pub use config::WorldConfig;
pub use errors::{WorldgenError, WorldgenResult};
pub use pathfinding::{CostModel, Route, TraversalClass};
pub use terrain::{GridCoord, HeightGrid, SteepnessGrid};
pub use world::WorldLayout;
