//! Tube meshes built from rings of swept cross-sections

use glam::DVec3;

/// A vertex with position and smoothed normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: DVec3,
    pub normal: DVec3,
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, `None` if there are none
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Self::new(p, p)),
            Some(b) => Some(Self::new(b.min.min(p), b.max.max(p))),
        })
    }

    /// Merge two bounding boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

/// An immutable triangle mesh made of cross-section rings
///
/// Ring `i` occupies vertices `i * ring_size .. (i + 1) * ring_size`; cap
/// vertices, if any, follow the last ring. Consecutive rings are joined by
/// quads split into two triangles, and a mesh swept along a closed rail also
/// joins its last ring to its first.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    ring_count: usize,
    ring_size: usize,
    closed_path: bool,
    closed_profile: bool,
}

impl Mesh {
    /// Stitch rings of equal size into a tube
    ///
    /// `end_caps` fans a cap over the first and last ring of an open path;
    /// it is ignored for closed paths and open profiles.
    pub(crate) fn from_rings(
        rings: Vec<Vec<DVec3>>,
        closed_path: bool,
        closed_profile: bool,
        end_caps: bool,
    ) -> Self {
        let ring_count = rings.len();
        let ring_size = rings.first().map_or(0, Vec::len);
        let caps = end_caps && !closed_path && closed_profile && ring_count > 1;

        let cap_vertices = if caps { 2 * (ring_size + 1) } else { 0 };
        let mut mesh = Self {
            vertices: Vec::with_capacity(ring_count * ring_size + cap_vertices),
            indices: Vec::new(),
            ring_count,
            ring_size,
            closed_path,
            closed_profile,
        };

        let cap_rings = if caps {
            Some((rings[0].clone(), rings[ring_count - 1].clone()))
        } else {
            None
        };
        for ring in rings {
            mesh.vertices.extend(ring.into_iter().map(|position| Vertex {
                position,
                normal: DVec3::ZERO,
            }));
        }

        let segments = mesh.profile_segments();
        for (prev, cur) in mesh.ring_links() {
            let prev = (prev * ring_size) as u32;
            let cur = (cur * ring_size) as u32;
            for &(a, b) in &segments {
                let (a, b) = (a as u32, b as u32);
                mesh.indices
                    .extend_from_slice(&[cur + b, cur + a, prev + a, cur + b, prev + a, prev + b]);
            }
        }

        if let Some((first, last)) = cap_rings {
            mesh.add_cap(&first, &segments, false);
            mesh.add_cap(&last, &segments, true);
        }

        mesh.recalculate_normals();
        mesh
    }

    /// Index pairs of consecutive profile points, wrapping for closed profiles
    fn profile_segments(&self) -> Vec<(usize, usize)> {
        let n = self.ring_size;
        let mut segments: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
        if self.closed_profile && n > 2 {
            segments.push((n - 1, 0));
        }
        segments
    }

    /// Fan a cap over a ring; the end cap faces along the path, the start
    /// cap against it
    fn add_cap(&mut self, ring: &[DVec3], segments: &[(usize, usize)], facing_forward: bool) {
        let base = self.vertices.len() as u32;
        let centroid = ring.iter().copied().sum::<DVec3>() / ring.len() as f64;
        self.vertices.push(Vertex {
            position: centroid,
            normal: DVec3::ZERO,
        });
        self.vertices.extend(ring.iter().map(|&position| Vertex {
            position,
            normal: DVec3::ZERO,
        }));
        for &(a, b) in segments {
            let (a, b) = (base + 1 + a as u32, base + 1 + b as u32);
            if facing_forward {
                self.indices.extend_from_slice(&[base, a, b]);
            } else {
                self.indices.extend_from_slice(&[base, b, a]);
            }
        }
    }

    /// Area-weighted smooth normals
    fn recalculate_normals(&mut self) {
        for tri in self.indices.chunks(3) {
            let i0 = tri[0] as usize;
            let i1 = tri[1] as usize;
            let i2 = tri[2] as usize;

            let p0 = self.vertices[i0].position;
            let edge1 = self.vertices[i1].position - p0;
            let edge2 = self.vertices[i2].position - p0;
            let face_normal = edge1.cross(edge2);

            for &i in &[i0, i1, i2] {
                self.vertices[i].normal += face_normal;
            }
        }

        for v in &mut self.vertices {
            v.normal = v.normal.normalize_or_zero();
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn ring_count(&self) -> usize {
        self.ring_count
    }

    /// Number of vertices per ring
    pub fn ring_size(&self) -> usize {
        self.ring_size
    }

    /// Vertices of ring `index`
    pub fn ring(&self, index: usize) -> &[Vertex] {
        &self.vertices[index * self.ring_size..(index + 1) * self.ring_size]
    }

    /// Whether the rings wrap around into a seamless loop
    pub fn is_closed_path(&self) -> bool {
        self.closed_path
    }

    pub fn is_closed_profile(&self) -> bool {
        self.closed_profile
    }

    /// Pairs of rings joined by surface, in path order
    ///
    /// A mesh swept along a closed rail ends with `(ring_count - 1, 0)`.
    pub fn ring_links(&self) -> Vec<(usize, usize)> {
        let mut links: Vec<(usize, usize)> = (1..self.ring_count).map(|i| (i - 1, i)).collect();
        if self.closed_path && self.ring_count > 2 {
            links.push((self.ring_count - 1, 0));
        }
        links
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| v.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ring(z: f64) -> Vec<DVec3> {
        vec![
            DVec3::new(1.0, 0.0, z),
            DVec3::new(0.0, 1.0, z),
            DVec3::new(-1.0, 0.0, z),
            DVec3::new(0.0, -1.0, z),
        ]
    }

    #[test]
    fn open_tube_with_caps() {
        let rings = vec![square_ring(0.0), square_ring(1.0), square_ring(2.0)];
        let mesh = Mesh::from_rings(rings, false, true, true);

        assert_eq!(mesh.ring_count(), 3);
        assert_eq!(mesh.ring_links(), vec![(0, 1), (1, 2)]);
        // 2 links * 4 quads * 2 triangles + 2 caps * 4 triangles
        assert_eq!(mesh.triangle_count(), 24);
        assert_eq!(mesh.vertex_count(), 12 + 2 * 5);
    }

    #[test]
    fn side_normals_point_outward() {
        let mesh = Mesh::from_rings(vec![square_ring(0.0), square_ring(1.0)], false, true, false);
        for v in mesh.vertices() {
            let radial = DVec3::new(v.position.x, v.position.y, 0.0);
            assert!(v.normal.dot(radial) > 0.0);
        }
    }

    #[test]
    fn caps_face_away_from_tube() {
        let mesh = Mesh::from_rings(vec![square_ring(0.0), square_ring(1.0)], false, true, true);
        let start_center = mesh.vertices()[8];
        let end_center = mesh.vertices()[13];
        assert!(start_center.normal.z < -0.99);
        assert!(end_center.normal.z > 0.99);
    }

    #[test]
    fn closed_path_links_last_ring_to_first() {
        let rings = (0..4).map(|i| square_ring(f64::from(i))).collect();
        let mesh = Mesh::from_rings(rings, true, true, true);
        assert_eq!(mesh.ring_links().last(), Some(&(3, 0)));
        // No caps on a closed path
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 4 * 4 * 2);
    }

    #[test]
    fn bounds_cover_all_rings() {
        let mesh = Mesh::from_rings(vec![square_ring(-1.0), square_ring(3.0)], false, true, false);
        let bounds = mesh.bounds();
        assert_eq!(
            bounds,
            Some(Aabb::new(DVec3::new(-1.0, -1.0, -1.0), DVec3::new(1.0, 1.0, 3.0)))
        );
    }
}
