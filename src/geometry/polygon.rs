//! Points and planar polygon helpers.

use serde::{Deserialize, Serialize};

/// A point or vector in model coordinates (metres).
///
/// Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }

    pub fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }

    pub fn scale(self, f: f64) -> Self {
        Self::new(self.x * f, self.y * f, self.z * f)
    }

    pub fn dot(self, o: Self) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    pub fn magnitude(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalize(self) -> Self {
        let m = self.magnitude();
        if m == 0.0 { self } else { self.scale(1.0 / m) }
    }

    /// IDF vertex text with three decimals.
    pub fn idf_text(self) -> String {
        format!("{:.3}, {:.3}, {:.3}", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Point3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3D> for [f64; 3] {
    fn from(p: Point3D) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Newell's method: a vector normal to the polygon whose length is twice its
/// area. Counter-clockwise vertices point it toward the viewer.
fn newell(vertices: &[Point3D]) -> Point3D {
    let mut n = Point3D::default();
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

/// Unit normal of a planar polygon.
pub fn normal(vertices: &[Point3D]) -> Point3D {
    newell(vertices).normalize()
}

pub fn area(vertices: &[Point3D]) -> f64 {
    newell(vertices).magnitude() / 2.0
}

/// Vertex average.
pub fn centroid(vertices: &[Point3D]) -> Point3D {
    if vertices.is_empty() {
        return Point3D::default();
    }
    vertices
        .iter()
        .fold(Point3D::default(), |acc, p| acc.add(*p))
        .scale(1.0 / vertices.len() as f64)
}

/// Vertices reordered to start at the upper-left corner as seen from the
/// side the normal points to, keeping their counter-clockwise order.
///
/// Up is +Z for tilted and vertical polygons and +Y for horizontal ones.
/// The starting vertex is the one nearest the upper-left corner of the
/// polygon's bounding rectangle in that view.
pub fn upper_left_vertices(vertices: &[Point3D]) -> Vec<Point3D> {
    let n = normal(vertices);
    let world_up = if n.x.abs() < 1e-9 && n.y.abs() < 1e-9 {
        Point3D::new(0.0, 1.0, 0.0)
    } else {
        Point3D::new(0.0, 0.0, 1.0)
    };
    let up = world_up.sub(n.scale(world_up.dot(n))).normalize();
    let right = up.cross(n);

    let view: Vec<(f64, f64)> = vertices.iter().map(|p| (p.dot(right), p.dot(up))).collect();
    let min_x = view.iter().map(|v| v.0).fold(f64::INFINITY, f64::min);
    let max_y = view.iter().map(|v| v.1).fold(f64::NEG_INFINITY, f64::max);
    let start = view
        .iter()
        .map(|(x, y)| (x - min_x).powi(2) + (y - max_y).powi(2))
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i);

    let mut ordered = vertices.to_vec();
    ordered.rotate_left(start);
    ordered
}

/// Volume enclosed by outward-facing planar polygons.
pub fn enclosed_volume<'a>(polygons: impl IntoIterator<Item = &'a [Point3D]>) -> f64 {
    polygons
        .into_iter()
        .filter_map(|poly| poly.first().map(|p| p.dot(newell(poly)) / 6.0))
        .sum::<f64>()
        .abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    fn south_wall() -> Vec<Point3D> {
        vec![p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 0.0, 3.0), p(0.0, 0.0, 3.0)]
    }

    #[test]
    fn normal_and_area() {
        let wall = south_wall();
        assert_eq!(normal(&wall), p(0.0, -1.0, 0.0));
        assert!((area(&wall) - 12.0).abs() < 1e-12);
        assert_eq!(centroid(&wall), p(2.0, 0.0, 1.5));
    }

    #[test]
    fn upper_left_of_south_wall() {
        let ordered = upper_left_vertices(&south_wall());
        assert_eq!(ordered[0], p(0.0, 0.0, 3.0));
        assert_eq!(ordered[1], p(0.0, 0.0, 0.0));
        assert_eq!(normal(&ordered), normal(&south_wall()));
    }

    #[test]
    fn upper_left_of_roof_uses_north() {
        let roof = vec![p(0.0, 0.0, 3.0), p(4.0, 0.0, 3.0), p(4.0, 5.0, 3.0), p(0.0, 5.0, 3.0)];
        assert_eq!(upper_left_vertices(&roof)[0], p(0.0, 5.0, 3.0));
    }

    #[test]
    fn idf_vertex_text() {
        assert_eq!(p(1.0, -2.5, 0.12345).idf_text(), "1.000, -2.500, 0.123");
    }

    #[test]
    fn json_as_triples() {
        let json = serde_json::to_string(&p(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0]");
        let back: Point3D = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p(1.0, 2.0, 3.0));
    }
}
