//! Vehicle packer: owns the placements inside one vehicle.
//!
//! `try_place` scores a placement without mutating state; `commit_place`
//! repeats the same search and, on success, applies it. Both share
//! [`search_placement`], which implements the candidate-anchor search
//! from the specification: anchors seeded at the origin and at each
//! existing placement's three "next corner" points, filtered to the
//! vehicle interior and any x-range, sorted bottom-left-back, tried
//! against each orientation in enumeration order.

use crate::geometry::Box3;
use crate::parcel::{Parcel, VehicleShape};

/// A committed parcel placement inside one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub vehicle: usize,
    pub parcel: usize,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub lx: i32,
    pub ly: i32,
    pub lz: i32,
}

impl Placement {
    pub fn occupied(&self) -> Box3 {
        Box3::new(self.x, self.y, self.z, self.lx, self.ly, self.lz)
    }
}

/// Owns the placements inside one vehicle, plus a cached occupied volume.
pub struct VehiclePacker {
    shape: VehicleShape,
    vehicle_index: usize,
    placements: Vec<Placement>,
    occupied_volume: i64,
}

impl VehiclePacker {
    pub fn new(shape: VehicleShape, vehicle_index: usize) -> Self {
        Self {
            shape,
            vehicle_index,
            placements: Vec::new(),
            occupied_volume: 0,
        }
    }

    pub fn vehicle_index(&self) -> usize {
        self.vehicle_index
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn occupied_volume(&self) -> i64 {
        self.occupied_volume
    }

    /// Occupied volume divided by vehicle volume, in `[0, 1]`.
    pub fn utilization(&self) -> f64 {
        let total = self.shape.volume();
        if total > 0 {
            self.occupied_volume as f64 / total as f64
        } else {
            0.0
        }
    }

    /// True iff the parcel has at least one orientation fitting this vehicle shape.
    pub fn can_fit(&self, parcel: &Parcel) -> bool {
        !parcel.orientations_fitting(&self.shape).is_empty()
    }

    /// Searches for a placement without mutating state. Returns the
    /// utilization that would result from committing it, or `None` if no
    /// valid placement exists under the given x-range.
    pub fn try_place(&self, parcel: &Parcel, x_min: Option<i32>, x_max: Option<i32>) -> Option<f64> {
        let (_, _, _, lx, ly, lz) = self.search_placement(parcel, x_min, x_max)?;
        let total = self.shape.volume();
        let new_occupied = self.occupied_volume + lx as i64 * ly as i64 * lz as i64;
        Some(if total > 0 { new_occupied as f64 / total as f64 } else { 0.0 })
    }

    /// Repeats the search and, on success, appends the placement and
    /// updates the cached occupied volume. Returns `true` on success.
    pub fn commit_place(&mut self, parcel: &Parcel, x_min: Option<i32>, x_max: Option<i32>) -> bool {
        let Some((x, y, z, lx, ly, lz)) = self.search_placement(parcel, x_min, x_max) else {
            return false;
        };
        self.placements.push(Placement {
            vehicle: self.vehicle_index,
            parcel: parcel.index,
            x,
            y,
            z,
            lx,
            ly,
            lz,
        });
        self.occupied_volume += lx as i64 * ly as i64 * lz as i64;
        true
    }

    /// Removes the placement carrying `parcel_index`, if present.
    pub fn remove(&mut self, parcel_index: usize) -> bool {
        if let Some(pos) = self.placements.iter().position(|p| p.parcel == parcel_index) {
            let removed = self.placements.remove(pos);
            self.occupied_volume -= removed.lx as i64 * removed.ly as i64 * removed.lz as i64;
            true
        } else {
            false
        }
    }

    /// Renumbers this packer's vehicle index and patches every placement it holds.
    pub fn set_vehicle_index(&mut self, index: usize) {
        self.vehicle_index = index;
        for placement in &mut self.placements {
            placement.vehicle = index;
        }
    }

    pub fn into_placements(self) -> Vec<Placement> {
        self.placements
    }

    fn search_placement(
        &self,
        parcel: &Parcel,
        x_min: Option<i32>,
        x_max: Option<i32>,
    ) -> Option<(i32, i32, i32, i32, i32, i32)> {
        let orientations = parcel.orientations_fitting(&self.shape);
        if orientations.is_empty() {
            return None;
        }

        let mut anchors: Vec<(i32, i32, i32)> = Vec::with_capacity(self.placements.len() * 3 + 1);
        anchors.push((0, 0, 0));
        for p in &self.placements {
            anchors.push((p.x + p.lx, p.y, p.z));
            anchors.push((p.x, p.y + p.ly, p.z));
            anchors.push((p.x, p.y, p.z + p.lz));
        }
        anchors.sort_unstable();
        anchors.dedup();

        let (length, width, height) = (self.shape.length, self.shape.width, self.shape.height);
        let mut candidates: Vec<(i32, i32, i32)> = anchors
            .into_iter()
            .filter(|&(x, y, z)| {
                if x < 0 || y < 0 || z < 0 || x >= length || y >= width || z >= height {
                    return false;
                }
                if let Some(min) = x_min {
                    if x < min {
                        return false;
                    }
                }
                if let Some(max) = x_max {
                    if x >= max {
                        return false;
                    }
                }
                true
            })
            .collect();
        candidates.sort_by_key(|&(x, y, z)| (z, y, x));

        for &(lx, ly, lz) in &orientations {
            for &(x, y, z) in &candidates {
                if let Some(min) = x_min {
                    if x < min {
                        continue;
                    }
                }
                if let Some(max) = x_max {
                    if x + lx > max {
                        continue;
                    }
                }
                if x + lx > length || y + ly > width || z + lz > height {
                    continue;
                }
                let candidate_box = Box3::new(x, y, z, lx, ly, lz);
                if self.placements.iter().any(|p| candidate_box.overlaps(&p.occupied())) {
                    continue;
                }
                return Some((x, y, z, lx, ly, lz));
            }
        }

        None
    }
}
