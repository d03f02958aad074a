use crate::math::Vec3;

/// Axis-aligned bounding box in world coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Smallest box containing every point. Panics on an empty slice.
    pub fn from_points(points: &[Vec3]) -> Self {
        let first = points[0].as_array();
        let mut b = Aabb3::new(first, first);
        for p in &points[1..] {
            let p = p.as_array();
            for axis in 0..3 {
                b.min[axis] = b.min[axis].min(p[axis]);
                b.max[axis] = b.max[axis].max(p[axis]);
            }
        }
        b
    }

    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        Aabb3::new(
            [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
                self.min[2].min(other.min[2]),
            ],
            [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
                self.max[2].max(other.max[2]),
            ],
        )
    }

    pub fn centroid(&self, axis: usize) -> f64 {
        (self.min[axis] + self.max[axis]) * 0.5
    }

    pub fn extent(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb3;
    use crate::math::Vec3;

    #[test]
    fn from_points_covers_all_points() {
        let b = Aabb3::from_points(&[
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.5),
            Vec3::new(0.0, 0.0, 7.0),
        ]);
        assert_eq!(b, Aabb3::new([-1.0, -2.0, 0.5], [1.0, 4.0, 7.0]));
    }

    #[test]
    fn union_grows_to_both() {
        let a = Aabb3::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = Aabb3::new([2.0, -1.0, 0.5], [3.0, 0.5, 0.75]);
        assert_eq!(a.union(&b), Aabb3::new([0.0, -1.0, 0.0], [3.0, 1.0, 1.0]));
        assert_eq!(a.union(&b).extent(0), 3.0);
    }
}
