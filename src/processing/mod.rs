pub mod clustering;
pub mod region;
pub mod text;

pub use clustering::{RegionClusterer, RegionPlanner};
pub use region::Rectangle;
pub use text::{LocatorPolicy, MrzLocator};
