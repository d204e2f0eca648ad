//! Parcel and vehicle-shape definitions.
//!
//! Each parcel is identified by its zero-based index in the input order,
//! carries three positive integer dimensions and a delivery time, and
//! precomputes the (up to six) distinct orientations obtained by
//! permuting its dimensions.

/// One of a parcel's distinct dimension orderings: `(lx, ly, lz)`.
pub type Orientation = (i32, i32, i32);

/// The shape shared by every vehicle in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleShape {
    pub length: i32,
    pub width: i32,
    pub height: i32,
}

impl VehicleShape {
    pub fn new(length: i32, width: i32, height: i32) -> Self {
        Self { length, width, height }
    }

    pub fn volume(&self) -> i64 {
        self.length as i64 * self.width as i64 * self.height as i64
    }
}

/// A parcel to be loaded: its original dimensions, delivery time, and
/// precomputed orientation set.
///
/// `delivery_time == -1` means unconstrained. Orientations are computed
/// once in `new` and never change afterward.
#[derive(Debug, Clone)]
pub struct Parcel {
    pub index: usize,
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub delivery_time: i32,
    orientations: Vec<Orientation>,
}

impl Parcel {
    pub fn new(index: usize, length: i32, width: i32, height: i32, delivery_time: i32) -> Self {
        Self {
            index,
            length,
            width,
            height,
            delivery_time,
            orientations: distinct_orientations(length, width, height),
        }
    }

    pub fn volume(&self) -> i64 {
        self.length as i64 * self.width as i64 * self.height as i64
    }

    pub fn base_area(&self) -> i64 {
        self.length as i64 * self.width as i64
    }

    pub fn longest_side(&self) -> i32 {
        self.length.max(self.width).max(self.height)
    }

    /// All distinct orientations of this parcel, in a fixed enumeration order.
    pub fn orientations(&self) -> &[Orientation] {
        &self.orientations
    }

    /// The subset of `orientations()` that fits within `vehicle` on every axis,
    /// in the same enumeration order. Empty iff the parcel cannot be loaded
    /// into any vehicle of this shape (the `NoFittingOrientation` case).
    pub fn orientations_fitting(&self, vehicle: &VehicleShape) -> Vec<Orientation> {
        self.orientations
            .iter()
            .copied()
            .filter(|&(lx, ly, lz)| lx <= vehicle.length && ly <= vehicle.width && lz <= vehicle.height)
            .collect()
    }
}

/// Generates the distinct permutations of `(length, width, height)`.
///
/// Enumerated in a fixed order — (l,w,h), (l,h,w), (w,l,h), (w,h,l),
/// (h,l,w), (h,w,l) — and deduplicated by a first-seen linear scan
/// rather than a sort, so the order is stable and independent of any
/// hasher. Cubes collapse to one orientation; square-faced boxes to three.
fn distinct_orientations(length: i32, width: i32, height: i32) -> Vec<Orientation> {
    let candidates = [
        (length, width, height),
        (length, height, width),
        (width, length, height),
        (width, height, length),
        (height, length, width),
        (height, width, length),
    ];

    let mut out = Vec::with_capacity(6);
    for candidate in candidates {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_one_orientation() {
        let p = Parcel::new(0, 4, 4, 4, -1);
        assert_eq!(p.orientations(), &[(4, 4, 4)]);
    }

    #[test]
    fn square_faced_box_has_three_orientations() {
        let p = Parcel::new(0, 2, 2, 5, -1);
        assert_eq!(p.orientations().len(), 3);
    }

    #[test]
    fn generic_box_has_six_orientations() {
        let p = Parcel::new(0, 2, 3, 5, -1);
        assert_eq!(p.orientations().len(), 6);
    }

    #[test]
    fn orientation_enumeration_order_is_fixed() {
        let p = Parcel::new(0, 2, 3, 5, -1);
        assert_eq!(
            p.orientations(),
            &[(2, 3, 5), (2, 5, 3), (3, 2, 5), (3, 5, 2), (5, 2, 3), (5, 3, 2)]
        );
    }

    #[test]
    fn orientations_fitting_filters_and_preserves_order() {
        let p = Parcel::new(0, 10, 10, 5, -1);
        let vehicle = VehicleShape::new(10, 10, 10);
        let fitting = p.orientations_fitting(&vehicle);
        // (10,10,5) and (10,5,10) and (5,10,10) all fit; none exceed any axis.
        assert_eq!(fitting.len(), 3);
    }

    #[test]
    fn no_fitting_orientation_when_too_big_on_every_permutation() {
        let p = Parcel::new(0, 11, 1, 1, -1);
        let vehicle = VehicleShape::new(10, 10, 10);
        assert!(p.orientations_fitting(&vehicle).is_empty());
    }
}
