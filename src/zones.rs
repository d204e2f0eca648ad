//! Delivery-zone planner.
//!
//! Partitions the vehicle's length axis by delivery time so that
//! earlier-delivered parcels end up farther from the unloading door
//! (the high-x face) without any explicit aisle reasoning.

use rustc_hash::FxHashMap;

use crate::parcel::{Parcel, VehicleShape};

/// A delivery time's assigned x-interval, `[x_min, x_max]`.
pub type Zone = (i32, i32);

/// A read-only map from delivery time to x-interval, computed once per problem.
pub struct DeliveryZonePlan {
    zones: FxHashMap<i32, Zone>,
}

impl DeliveryZonePlan {
    /// Computes the plan. When `enabled` is false the plan is empty — every
    /// lookup then falls through to "unbounded."
    pub fn compute(parcels: &[Parcel], vehicle: &VehicleShape, enabled: bool) -> Self {
        let mut zones = FxHashMap::default();
        if !enabled {
            return Self { zones };
        }

        let mut groups: FxHashMap<i32, Vec<&Parcel>> = FxHashMap::default();
        for parcel in parcels {
            groups.entry(parcel.delivery_time).or_default().push(parcel);
        }

        let mut constrained_times: Vec<i32> = groups.keys().copied().filter(|&d| d >= 0).collect();
        constrained_times.sort_unstable();

        if !constrained_times.is_empty() {
            let k = constrained_times.len();
            let total_constrained_items: usize =
                constrained_times.iter().map(|d| groups[d].len()).sum();
            let avg_items_per_group = total_constrained_items as f64 / k as f64;

            if k > 20 || (k > 10 && avg_items_per_group < 3.0) {
                assign_cumulative(&constrained_times, vehicle.length, &mut zones);
            } else {
                assign_proportional(&constrained_times, &groups, vehicle.length, &mut zones);
            }
        }

        if let Some(unconstrained) = groups.get(&-1) {
            if !unconstrained.is_empty() {
                zones.insert(-1, (0, vehicle.length));
            }
        }

        Self { zones }
    }

    /// The x-interval assigned to `delivery_time`, if any.
    pub fn zone_for(&self, delivery_time: i32) -> Option<Zone> {
        self.zones.get(&delivery_time).copied()
    }
}

/// Cumulative strategy: nested zones, earlier deliveries reach farther back.
fn assign_cumulative(constrained_times: &[i32], length: i32, zones: &mut FxHashMap<i32, Zone>) {
    let k = constrained_times.len();
    for (i, &d) in constrained_times.iter().enumerate() {
        let relative_pos = i as f64 / (k.saturating_sub(1)).max(1) as f64;
        let x_max = (length as f64 * (0.4 + 0.6 * (1.0 - relative_pos))).floor() as i32;
        zones.insert(d, (0, x_max));
    }
}

/// Proportional strategy: contiguous zones sized by group volume share,
/// traversed latest-delivery-first so the earliest delivery ends up nearest
/// the rear (largest x).
fn assign_proportional(
    constrained_times: &[i32],
    groups: &FxHashMap<i32, Vec<&Parcel>>,
    length: i32,
    zones: &mut FxHashMap<i32, Zone>,
) {
    let k = constrained_times.len();
    let total_volume: i64 = constrained_times.iter().map(|d| group_volume(&groups[d])).sum();

    let mut cursor: i32 = 0;
    for &d in constrained_times.iter().rev() {
        let items = &groups[&d];
        let zone_length = if total_volume > 0 {
            let volume = group_volume(items);
            let proportional = (volume as f64 / total_volume as f64 * length as f64 * 0.85).floor() as i32;
            let max_item_dimension = items
                .iter()
                .map(|p| p.length.max(p.width).max(p.height))
                .max()
                .unwrap_or(0);
            proportional.max(max_item_dimension * 3)
        } else {
            length / k as i32
        };

        let zone_length = zone_length.min(length - cursor);
        let x_max = (cursor + zone_length).min(length);
        zones.insert(d, (cursor, x_max));
        cursor = x_max;
    }
}

fn group_volume(items: &[&Parcel]) -> i64 {
    items.iter().map(|p| p.volume()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel(index: usize, l: i32, w: i32, h: i32, d: i32) -> Parcel {
        Parcel::new(index, l, w, h, d)
    }

    #[test]
    fn disabled_zones_produce_an_empty_plan() {
        let parcels = vec![parcel(0, 2, 2, 2, 0)];
        let vehicle = VehicleShape::new(30, 10, 10);
        let plan = DeliveryZonePlan::compute(&parcels, &vehicle, false);
        assert_eq!(plan.zone_for(0), None);
        assert_eq!(plan.zone_for(-1), None);
    }

    #[test]
    fn unconstrained_parcels_get_the_full_length() {
        let parcels = vec![parcel(0, 2, 2, 2, -1)];
        let vehicle = VehicleShape::new(30, 10, 10);
        let plan = DeliveryZonePlan::compute(&parcels, &vehicle, true);
        assert_eq!(plan.zone_for(-1), Some((0, 30)));
    }

    #[test]
    fn earlier_delivery_gets_a_zone_closer_to_the_rear() {
        // few groups -> proportional strategy; equal volumes split the
        // length evenly, latest delivery (d=1) placed first (low x).
        let parcels = vec![
            parcel(0, 2, 2, 2, 0),
            parcel(1, 2, 2, 2, 1),
        ];
        let vehicle = VehicleShape::new(30, 10, 10);
        let plan = DeliveryZonePlan::compute(&parcels, &vehicle, true);
        let (d0_min, d0_max) = plan.zone_for(0).unwrap();
        let (d1_min, d1_max) = plan.zone_for(1).unwrap();
        assert_eq!((d1_min, d1_max), (0, 12));
        assert_eq!((d0_min, d0_max), (12, 24));
        // earlier delivery (d=0) sits strictly closer to the door (high x).
        assert!(d0_max > d1_max);
    }

    #[test]
    fn cumulative_strategy_nests_zones_by_position() {
        let parcels: Vec<Parcel> = (0..25).map(|d| parcel(d as usize, 1, 1, 1, d)).collect();
        let vehicle = VehicleShape::new(100, 10, 10);
        let plan = DeliveryZonePlan::compute(&parcels, &vehicle, true);
        let (first_min, first_max) = plan.zone_for(0).unwrap();
        let (last_min, last_max) = plan.zone_for(24).unwrap();
        assert_eq!(first_min, 0);
        assert_eq!(last_min, 0);
        // earliest delivery (i=0) reaches closer to the full length than the latest.
        assert!(first_max > last_max);
        assert_eq!(last_max, 40); // floor(100 * 0.4)
    }

    #[test]
    fn proportional_zone_respects_minimum_length_floor() {
        // one huge parcel and one tiny parcel; tiny group's proportional share
        // would be far smaller than 3x its own max dimension.
        let parcels = vec![
            parcel(0, 29, 1, 1, 0),
            parcel(1, 1, 1, 1, 1),
        ];
        let vehicle = VehicleShape::new(30, 10, 10);
        let plan = DeliveryZonePlan::compute(&parcels, &vehicle, true);
        let (_, d1_max) = plan.zone_for(1).unwrap();
        assert!(d1_max - 0 >= 3); // 3x the 1x1x1 parcel's max dimension
    }
}
