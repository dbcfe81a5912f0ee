//! Convex hull of rock point clouds.
//!
//! Incremental 3-D hull: start from a large tetrahedron spanned by extreme
//! points, then insert the remaining points one at a time, replacing the faces
//! each point can see with a fan of new faces around the horizon.

use crate::error::DataError;
use glam::DVec3;
use std::collections::HashSet;
use tracing::{debug, info};

/// Tolerance relative to the bounding-box diagonal of the cloud.
const RELATIVE_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy)]
struct Face {
    vertices: [usize; 3],
    normal: DVec3,
    offset: f64,
}

impl Face {
    fn new(vertices: [usize; 3], points: &[DVec3]) -> Self {
        let [a, b, c] = vertices.map(|i| points[i]);
        let normal = (b - a).cross(c - a).normalize_or_zero();
        Self {
            vertices,
            normal,
            offset: normal.dot(a),
        }
    }

    /// Signed distance of `p` above the face plane (positive = outside).
    fn distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Compute the convex hull of a point cloud.
///
/// Returns triangles as 0-based index triples into `points`, wound
/// counter-clockwise when seen from outside. Points strictly inside the hull
/// are not referenced.
///
/// Fails with [`DataError::DegenerateGeometry`] when the points do not span a
/// volume: fewer than 4 points, or all of them coincident, collinear or
/// coplanar.
pub fn convex_hull(points: &[DVec3]) -> Result<Vec<[usize; 3]>, DataError> {
    let degenerate = |reason| DataError::DegenerateGeometry {
        points: points.len(),
        reason,
    };

    if points.len() < 4 {
        return Err(degenerate("at least 4 points are required"));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(degenerate("point cloud contains non-finite coordinates"));
    }

    let (min, max) = points
        .iter()
        .fold((DVec3::splat(f64::MAX), DVec3::splat(f64::MIN)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let extent = (max - min).length();
    if extent == 0.0 {
        return Err(degenerate("all points coincide"));
    }
    let eps = extent * RELATIVE_EPSILON;

    let seed = initial_simplex(points, eps).map_err(degenerate)?;
    debug!("Hull seed tetrahedron: {:?}", seed);

    let interior = seed.iter().map(|&i| points[i]).sum::<DVec3>() / 4.0;
    let mut faces: Vec<Face> = [
        [seed[0], seed[1], seed[2]],
        [seed[0], seed[1], seed[3]],
        [seed[0], seed[2], seed[3]],
        [seed[1], seed[2], seed[3]],
    ]
    .into_iter()
    .map(|v| {
        let face = Face::new(v, points);
        if face.distance(interior) > 0.0 {
            Face::new([v[0], v[2], v[1]], points)
        } else {
            face
        }
    })
    .collect();

    for (index, &p) in points.iter().enumerate() {
        if seed.contains(&index) {
            continue;
        }

        let (visible, hidden): (Vec<Face>, Vec<Face>) =
            faces.into_iter().partition(|f| f.distance(p) > eps);
        faces = hidden;
        if visible.is_empty() {
            continue;
        }

        let visible_edges: HashSet<(usize, usize)> =
            visible.iter().flat_map(|f| f.edges()).collect();
        let horizon = visible
            .iter()
            .flat_map(|f| f.edges())
            .filter(|&(a, b)| !visible_edges.contains(&(b, a)));

        faces.extend(horizon.map(|(a, b)| Face::new([a, b, index], points)));
    }

    let triangles: Vec<[usize; 3]> = faces.iter().map(|f| f.vertices).collect();

    info!(
        "Convex hull: {} triangles from {} points",
        triangles.len(),
        points.len()
    );

    Ok(triangles)
}

/// Pick four affinely independent points spanning as much volume as possible.
fn initial_simplex(points: &[DVec3], eps: f64) -> Result<[usize; 4], &'static str> {
    // Extreme pair along the axis of largest spread.
    let mut best = (0usize, 0usize, -1.0f64);
    for axis in 0..3 {
        let (lo, hi) = points
            .iter()
            .enumerate()
            .fold((0, 0), |(lo, hi), (i, p)| {
                (
                    if p[axis] < points[lo][axis] { i } else { lo },
                    if p[axis] > points[hi][axis] { i } else { hi },
                )
            });
        let spread = points[hi][axis] - points[lo][axis];
        if spread > best.2 {
            best = (lo, hi, spread);
        }
    }
    let (i0, i1, _) = best;
    let a = points[i0];
    let dir = (points[i1] - a).normalize();

    let (i2, line_distance) = farthest(points, |p| (p - a).cross(dir).length());
    if line_distance <= eps {
        return Err("points are collinear");
    }

    let normal = (points[i1] - a).cross(points[i2] - a).normalize();
    let (i3, plane_distance) = farthest(points, |p| normal.dot(p - a).abs());
    if plane_distance <= eps {
        return Err("points are coplanar");
    }

    Ok([i0, i1, i2, i3])
}

fn farthest(points: &[DVec3], measure: impl Fn(DVec3) -> f64) -> (usize, f64) {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (i, measure(p)))
        .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
}
