//! Convex polygon intersection via the separating axis theorem, on top of glam's `DVec2`.

use glam::DVec2;

/// Projection is the 1D interval covered by a polygon projected onto an axis.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub min: f64,
    pub max: f64,
}

impl Projection {
    /// Touching intervals do not count as overlapping.
    pub fn intersects(&self, other: &Projection) -> bool {
        self.max > other.min && other.max > self.min
    }
}

#[derive(Debug, Clone)]
pub struct Polygon {
    pub points: Vec<DVec2>,
    edges: Vec<DVec2>,
}

impl Polygon {
    /// new builds a polygon from its corner points given in winding order.
    pub fn new(points: Vec<DVec2>) -> Polygon {
        let n = points.len();
        let edges = (0..n).map(|i| points[(i + 1) % n] - points[i]).collect();
        Polygon { points, edges }
    }

    pub fn project_to_axis(&self, axis: DVec2) -> Projection {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in self.points.iter() {
            let p = point.dot(axis);
            min = min.min(p);
            max = max.max(p);
        }
        Projection { min, max }
    }

    /// intersects tests two convex polygons for overlap. The edge normals of both shapes are
    /// used as candidate separating axes; the polygons overlap only if no axis separates them.
    pub fn intersects(&self, other: &Polygon) -> bool {
        for edge in self.edges.iter().chain(other.edges.iter()) {
            let axis = edge.normalize_or_zero().perp();
            if axis == DVec2::ZERO {
                // degenerate edge
                continue;
            }

            let self_projection = self.project_to_axis(axis);
            let other_projection = other.project_to_axis(axis);

            if !self_projection.intersects(&other_projection) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(cx: f64, cy: f64, half: f64) -> Polygon {
        Polygon::new(vec![
            DVec2::new(cx - half, cy - half),
            DVec2::new(cx + half, cy - half),
            DVec2::new(cx + half, cy + half),
            DVec2::new(cx - half, cy + half),
        ])
    }

    #[test]
    fn projection_onto_unit_axis() {
        let proj = square(2.0, 0.0, 1.0).project_to_axis(DVec2::new(3.0, 4.0).normalize());
        assert_relative_eq!(proj.min, -0.2, epsilon = 1e-12);
        assert_relative_eq!(proj.max, 2.6, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_edges_are_skipped() {
        // repeated corner gives a zero length edge
        let wedge = Polygon::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
        ]);
        assert!(wedge.intersects(&square(0.2, 0.2, 0.1)));
        assert!(!wedge.intersects(&square(1.0, 1.0, 0.2)));
    }

    #[test]
    fn overlapping_squares_intersect() {
        assert!(square(0.0, 0.0, 1.0).intersects(&square(1.5, 0.5, 1.0)));
    }

    #[test]
    fn separated_squares_do_not_intersect() {
        assert!(!square(0.0, 0.0, 1.0).intersects(&square(3.0, 0.0, 1.0)));
        // touching edges are not an intersection
        assert!(!square(0.0, 0.0, 1.0).intersects(&square(2.0, 0.0, 1.0)));
    }

    #[test]
    fn rotated_square_separated_on_own_axis() {
        // A diamond whose corner points at the square but does not reach it. Only the
        // diamond's own edge normals separate the pair.
        let diamond = Polygon::new(vec![
            DVec2::new(1.9, 1.9 - 1.4),
            DVec2::new(1.9 + 1.4, 1.9),
            DVec2::new(1.9, 1.9 + 1.4),
            DVec2::new(1.9 - 1.4, 1.9),
        ]);
        assert!(!square(0.0, 0.0, 1.0).intersects(&diamond));
        assert!(!diamond.intersects(&square(0.0, 0.0, 1.0)));
    }
}
