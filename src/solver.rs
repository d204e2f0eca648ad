//! Orchestrates sorting, best-fit construction across a growing list of
//! vehicle packers, and a local search that tries to empty the
//! least-utilized vehicle.

use crate::packer::{Placement, VehiclePacker};
use crate::parcel::{Parcel, VehicleShape};
use crate::zones::DeliveryZonePlan;

/// Local search stops once it runs this many iterations without being
/// able to empty another packer.
const MAX_LOCAL_SEARCH_ITERATIONS: usize = 10;

/// Secondary sort key used to break ties among parcels with the same
/// delivery-time tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Descending `lx*ly*lz` of the parcel's original dimensions.
    Volume,
    /// Descending `max(lx, ly, lz)`.
    LongestSide,
    /// Descending `lx*ly` (base area).
    Area,
    /// Descending `lz` (height).
    Height,
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::Volume
    }
}

/// The knobs a caller can set for one solve: which heuristic breaks
/// sort ties, whether delivery zones are enforced, and whether to emit
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    pub heuristic: Heuristic,
    pub zones_enabled: bool,
    /// Diagnostics only; never affects the returned `Solution`.
    pub verbose: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::default(),
            zones_enabled: true,
            verbose: false,
        }
    }
}

/// Why a parcel could not be placed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnplacedReason {
    /// No permutation of the parcel's dimensions fits inside the vehicle shape.
    NoFittingOrientation,
    /// At least one orientation fits, but no position could be found for it
    /// in any existing packer or a fresh one.
    NoFeasiblePlacement,
}

/// A parcel that could not be placed, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unplaced {
    pub parcel_index: usize,
    pub reason: UnplacedReason,
}

/// The result of a solve: every committed placement, any unplaced
/// parcels, and whether the instance was fully packed.
#[derive(Debug, Clone)]
pub struct Solution {
    pub placements: Vec<Placement>,
    pub unplaced: Vec<Unplaced>,
    pub success: bool,
}

/// Aggregate statistics over a `Solution`, for callers that want a
/// summary without walking every placement themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub vehicles_used: usize,
    pub parcels_placed: usize,
    pub parcels_unplaced: usize,
    pub mean_utilization: f64,
    pub occupied_volume: i64,
    pub available_volume: i64,
}

impl Solution {
    /// Computes statistics for this solution against `vehicle`'s shape.
    pub fn stats(&self, vehicle: &VehicleShape) -> Stats {
        let vehicles_used = self
            .placements
            .iter()
            .map(|p| p.vehicle)
            .collect::<std::collections::HashSet<_>>()
            .len();
        let occupied_volume: i64 = self.placements.iter().map(|p| p.lx as i64 * p.ly as i64 * p.lz as i64).sum();
        let available_volume = vehicle.volume() * vehicles_used as i64;
        let mean_utilization = if vehicles_used > 0 {
            occupied_volume as f64 / available_volume as f64
        } else {
            0.0
        };
        Stats {
            vehicles_used,
            parcels_placed: self.placements.len(),
            parcels_unplaced: self.unplaced.len(),
            mean_utilization,
            occupied_volume,
            available_volume,
        }
    }
}

/// Solves a 3D vehicle-loading instance: orients, sorts, places with
/// best-fit, and runs a local search to reduce the vehicle count.
///
/// Pure function of its inputs — holds no process-wide state, safe to
/// call concurrently from independent callers.
pub fn solve(vehicle: &VehicleShape, parcels: &[Parcel], options: &SolveOptions) -> Solution {
    let order = sort_parcels(parcels, options.heuristic);
    let zone_plan = DeliveryZonePlan::compute(parcels, vehicle, options.zones_enabled);

    let mut packers: Vec<VehiclePacker> = Vec::new();
    let mut unplaced: Vec<Unplaced> = Vec::new();

    for &parcel_index in &order {
        let parcel = &parcels[parcel_index];
        let (x_min, x_max) = zone_bounds(&zone_plan, parcel);

        let mut best: Option<(usize, f64)> = None;
        for (i, packer) in packers.iter().enumerate() {
            if let Some(score) = packer.try_place(parcel, x_min, x_max) {
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((i, score));
                }
            }
        }

        if let Some((best_index, _)) = best {
            packers[best_index].commit_place(parcel, x_min, x_max);
            continue;
        }

        let mut fresh = VehiclePacker::new(*vehicle, packers.len());
        if fresh.commit_place(parcel, x_min, x_max) {
            packers.push(fresh);
        } else {
            let reason = if parcel.orientations_fitting(vehicle).is_empty() {
                UnplacedReason::NoFittingOrientation
            } else {
                UnplacedReason::NoFeasiblePlacement
            };
            unplaced.push(Unplaced { parcel_index: parcel.index, reason });
        }
    }

    if unplaced.is_empty() {
        local_search_close_vehicles(&mut packers, parcels, &zone_plan);
    }

    let success = unplaced.is_empty();
    let placements: Vec<Placement> = packers.into_iter().flat_map(VehiclePacker::into_placements).collect();

    let solution = Solution { placements, unplaced, success };
    if options.verbose {
        log_diagnostics(vehicle, &solution);
    }
    solution
}

/// Parcels ordered by delivery time (constrained before unconstrained,
/// ascending delivery time), then by the heuristic's secondary key
/// (descending). Ties beyond both keys keep their original relative
/// order, since `sort_by_key` is stable.
fn sort_parcels(parcels: &[Parcel], heuristic: Heuristic) -> Vec<usize> {
    let mut order: Vec<usize> = (0..parcels.len()).collect();
    order.sort_by_key(|&i| {
        let parcel = &parcels[i];
        let (tier, delivery_time) = if parcel.delivery_time >= 0 { (0, parcel.delivery_time) } else { (1, 0) };
        let secondary = match heuristic {
            Heuristic::Volume => parcel.volume(),
            Heuristic::LongestSide => parcel.longest_side() as i64,
            Heuristic::Area => parcel.base_area(),
            Heuristic::Height => parcel.height as i64,
        };
        (tier, delivery_time, std::cmp::Reverse(secondary))
    });
    order
}

fn zone_bounds(zone_plan: &DeliveryZonePlan, parcel: &Parcel) -> (Option<i32>, Option<i32>) {
    match zone_plan.zone_for(parcel.delivery_time) {
        Some((min, max)) => (Some(min), Some(max)),
        None => (None, None),
    }
}

/// Repeated up to `MAX_LOCAL_SEARCH_ITERATIONS` times while progress occurs.
fn local_search_close_vehicles(packers: &mut Vec<VehiclePacker>, parcels: &[Parcel], zone_plan: &DeliveryZonePlan) {
    for _ in 0..MAX_LOCAL_SEARCH_ITERATIONS {
        if !try_close_one_vehicle(packers, parcels, zone_plan) {
            break;
        }
    }
}

/// Attempts to empty the least-utilized packer by redistributing its
/// parcels into other packers. Scoring for the whole batch uses each
/// candidate packer's state as of entry to this iteration, not a running
/// simulation that would let earlier moves in the same batch influence
/// later scores; the commit phase re-verifies every move live and rolls
/// back this iteration's commits if any step fails partway, so a failed
/// redistribution never loses a parcel or leaves an overlap.
fn try_close_one_vehicle(packers: &mut Vec<VehiclePacker>, parcels: &[Parcel], zone_plan: &DeliveryZonePlan) -> bool {
    if packers.len() <= 1 {
        return false;
    }

    let mut min_utilization = f64::INFINITY;
    let mut target_index = None;
    for (i, packer) in packers.iter().enumerate() {
        if packer.utilization() < min_utilization {
            min_utilization = packer.utilization();
            target_index = Some(i);
        }
    }
    let Some(target_index) = target_index else {
        return false;
    };

    let target_parcels: Vec<usize> = packers[target_index].placements().iter().map(|p| p.parcel).collect();

    let mut plan: Vec<(usize, usize)> = Vec::with_capacity(target_parcels.len());
    for &parcel_index in &target_parcels {
        let parcel = &parcels[parcel_index];
        let (x_min, x_max) = zone_bounds(zone_plan, parcel);

        let mut best: Option<(usize, f64)> = None;
        for (i, packer) in packers.iter().enumerate() {
            if i == target_index {
                continue;
            }
            if let Some(score) = packer.try_place(parcel, x_min, x_max) {
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((i, score));
                }
            }
        }

        match best {
            Some((host_index, _)) => plan.push((host_index, parcel_index)),
            None => return false,
        }
    }

    let mut committed: Vec<(usize, usize)> = Vec::with_capacity(plan.len());
    for &(host_index, parcel_index) in &plan {
        let parcel = &parcels[parcel_index];
        let (x_min, x_max) = zone_bounds(zone_plan, parcel);
        if packers[host_index].commit_place(parcel, x_min, x_max) {
            committed.push((host_index, parcel_index));
        } else {
            for (host, parcel_index) in committed {
                packers[host].remove(parcel_index);
            }
            return false;
        }
    }

    packers.remove(target_index);
    for (i, packer) in packers.iter_mut().enumerate() {
        packer.set_vehicle_index(i);
    }
    true
}

fn log_diagnostics(vehicle: &VehicleShape, solution: &Solution) {
    let stats = solution.stats(vehicle);
    eprintln!(
        "vehicles={} placed={} unplaced={} mean_utilization={:.2}%",
        stats.vehicles_used,
        stats.parcels_placed,
        stats.parcels_unplaced,
        stats.mean_utilization * 100.0
    );
}
