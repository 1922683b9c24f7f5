use cgmath::{InnerSpace, Vector3};

/// Axis-aligned bounding box over mesh positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Returns `None` for an empty position set.
    pub fn from_positions(positions: &[[f32; 3]]) -> Option<Self> {
        let first = positions.first()?;
        let mut min = Vector3::new(first[0], first[1], first[2]);
        let mut max = min;

        for p in positions.iter().skip(1) {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
        }

        Some(Self::new(min, max))
    }

    pub fn union(self, other: Self) -> Self {
        Self::new(
            Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Length of the box diagonal; the framing reference size.
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).magnitude()
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_positions() {
        let positions = [[1.0, 2.0, 3.0], [-1.0, 0.0, 5.0], [0.0, -2.0, 4.0]];
        let aabb = Aabb::from_positions(&positions).unwrap();
        assert_eq!(aabb.min, Vector3::new(-1.0, -2.0, 3.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn test_empty_positions() {
        assert!(Aabb::from_positions(&[]).is_none());
    }

    #[test]
    fn test_center_and_diagonal() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(aabb.center(), Vector3::new(0.0, 0.0, 0.0));
        assert!((aabb.diagonal() - 12.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_union() {
        let a = Aabb::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vector3::new(-2.0, 0.5, 0.0), Vector3::new(0.5, 3.0, 0.5));
        let u = a.union(b);
        assert_eq!(u.min, Vector3::new(-2.0, 0.0, 0.0));
        assert_eq!(u.max, Vector3::new(1.0, 3.0, 1.0));
    }
}
