// src/lib.rs

pub mod covering;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod scenario;
pub mod union_lib;

pub use covering::{covering_rectangle, DEFAULT_MARGIN};
pub use error::{GeometryError, Result};
pub use generator::{GeneratorConfig, RectangleGenerator};
pub use geometry::{Bounds, Point2, Polygon, Ring};
pub use scenario::{Scenario, ScenarioConfig};
pub use union_lib::{PolygonUnion, UnionResult};
