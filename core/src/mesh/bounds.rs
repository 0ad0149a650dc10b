//! Axis-aligned bounds stored as minimum corner plus extent.

/// Per-primitive bounding box.
///
/// `size` is `max - min` and never negative for boxes built from data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Minimum corner.
    pub offset: [f32; 3],
    /// Extent along each axis.
    pub size: [f32; 3],
}

impl Bounds {
    /// Bounds from explicit min/max corners.
    pub fn from_min_max(min: [f32; 3], max: [f32; 3]) -> Self {
        Self {
            offset: min,
            size: std::array::from_fn(|i| (max[i] - min[i]).max(0.0)),
        }
    }

    /// Scan positions once. Empty input yields zero bounds.
    pub fn from_positions(positions: &[[f32; 3]]) -> Self {
        let Some(first) = positions.first() else {
            return Self::default();
        };
        let mut min = *first;
        let mut max = *first;
        for p in &positions[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Self::from_min_max(min, max)
    }

    /// Maximum corner.
    pub fn max(&self) -> [f32; 3] {
        std::array::from_fn(|i| self.offset[i] + self.size[i])
    }

    /// Smallest bounds enclosing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let (a, b) = (self.max(), other.max());
        let min = std::array::from_fn(|i| self.offset[i].min(other.offset[i]));
        let max = std::array::from_fn(|i| a[i].max(b[i]));
        Self::from_min_max(min, max)
    }

    /// Whether `p` lies inside the box (inclusive).
    pub fn contains(&self, p: [f32; 3]) -> bool {
        let max = self.max();
        (0..3).all(|i| p[i] >= self.offset[i] && p[i] <= max[i])
    }
}
