//! Vehicle Packer Library
//!
//! Provides the core bin-packing heuristic for loading rectangular
//! parcels into identical rectangular vehicles under orientation
//! freedom, non-overlap, containment, and delivery-order constraints.

pub mod geometry;
pub mod packer;
pub mod parcel;
pub mod solver;
pub mod zones;

pub use geometry::Box3;
pub use packer::{Placement, VehiclePacker};
pub use parcel::{Orientation, Parcel, VehicleShape};
pub use solver::{solve, Heuristic, SolveOptions, Solution, Stats, Unplaced, UnplacedReason};
pub use zones::{DeliveryZonePlan, Zone};
