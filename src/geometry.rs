//! Hit-testing over closed polygon outlines.

use crate::types::Vector2D;

/// Even-odd ray cast. Points exactly on an edge may land either way.
pub fn polygon_contains(polygon: &[Vector2D], point: Vector2D) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let crossing_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn segments_intersect(p1: Vector2D, p2: Vector2D, q1: Vector2D, q2: Vector2D) -> bool {
    fn cross(o: Vector2D, a: Vector2D, b: Vector2D) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > 0.0) != (d2 > 0.0)) && ((d3 > 0.0) != (d4 > 0.0))
}

fn edges(polygon: &[Vector2D]) -> impl Iterator<Item = (Vector2D, Vector2D)> + '_ {
    polygon
        .iter()
        .copied()
        .zip(polygon.iter().copied().cycle().skip(1))
}

/// True when the two outlines share any area. Symmetric in its arguments.
pub fn polygons_overlap(a: &[Vector2D], b: &[Vector2D]) -> bool {
    if a.iter().any(|&p| polygon_contains(b, p)) || b.iter().any(|&p| polygon_contains(a, p)) {
        return true;
    }
    // Crossing outlines with no vertex inside the other (e.g. a thin laser across a rock)
    edges(a).any(|(p1, p2)| edges(b).any(|(q1, q2)| segments_intersect(p1, p2, q1, q2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, half: f64) -> Vec<Vector2D> {
        vec![
            Vector2D::new(x - half, y - half),
            Vector2D::new(x + half, y - half),
            Vector2D::new(x + half, y + half),
            Vector2D::new(x - half, y + half),
        ]
    }

    #[test]
    fn contains_center_not_outside() {
        let sq = square(10.0, 10.0, 5.0);
        assert!(polygon_contains(&sq, Vector2D::new(10.0, 10.0)));
        assert!(!polygon_contains(&sq, Vector2D::new(20.0, 10.0)));
        assert!(!polygon_contains(&sq, Vector2D::new(10.0, -1.0)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // A "C" shape opening to the right
        let c = vec![
            Vector2D::new(0.0, 0.0),
            Vector2D::new(10.0, 0.0),
            Vector2D::new(10.0, 3.0),
            Vector2D::new(3.0, 3.0),
            Vector2D::new(3.0, 7.0),
            Vector2D::new(10.0, 7.0),
            Vector2D::new(10.0, 10.0),
            Vector2D::new(0.0, 10.0),
        ];
        assert!(polygon_contains(&c, Vector2D::new(1.5, 5.0)));
        assert!(!polygon_contains(&c, Vector2D::new(7.0, 5.0)));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = vec![Vector2D::new(0.0, 0.0), Vector2D::new(10.0, 10.0)];
        assert!(!polygon_contains(&line, Vector2D::new(5.0, 5.0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let big = square(0.0, 0.0, 10.0);
        let small = square(2.0, 2.0, 1.0);
        let far = square(50.0, 50.0, 1.0);
        assert!(polygons_overlap(&big, &small));
        assert!(polygons_overlap(&small, &big));
        assert!(!polygons_overlap(&big, &far));
        assert!(!polygons_overlap(&far, &big));
    }

    #[test]
    fn crossing_outlines_overlap_without_contained_vertices() {
        let tall = vec![
            Vector2D::new(-1.0, -10.0),
            Vector2D::new(1.0, -10.0),
            Vector2D::new(1.0, 10.0),
            Vector2D::new(-1.0, 10.0),
        ];
        let wide = vec![
            Vector2D::new(-10.0, -1.0),
            Vector2D::new(10.0, -1.0),
            Vector2D::new(10.0, 1.0),
            Vector2D::new(-10.0, 1.0),
        ];
        assert!(polygons_overlap(&tall, &wide));
        assert!(polygons_overlap(&wide, &tall));
    }
}
