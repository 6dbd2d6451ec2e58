/// Surfaces of revolution swept from a (radius, height) profile
use std::f32::consts::TAU;
use std::ops::Range;

use crate::geometry::GeometryData;

/// Vertical normal bias applied to profile points with index below `end`.
///
/// Bands are checked in order; the first whose `end` exceeds the profile
/// index wins. Points past the last band get no bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalBand {
    pub end: usize,
    pub vertical_bias: f32,
}

impl NormalBand {
    pub const fn new(end: usize, vertical_bias: f32) -> Self {
        Self { end, vertical_bias }
    }
}

/// Ordered profile swept around the +Y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RevolutionProfile {
    /// `(radius, height)` pairs from bottom to top.
    pub points: Vec<(f32, f32)>,
    /// Number of angular steps around the axis.
    pub segments: u32,
    pub bands: Vec<NormalBand>,
}

impl RevolutionProfile {
    pub fn new(points: Vec<(f32, f32)>, segments: u32) -> Self {
        Self {
            points,
            segments,
            bands: Vec::new(),
        }
    }

    pub fn with_bands(mut self, bands: Vec<NormalBand>) -> Self {
        self.bands = bands;
        self
    }

    /// `(segments + 1) * points`; the seam column is duplicated.
    pub fn vertex_count(&self) -> usize {
        (self.segments as usize + 1) * self.points.len()
    }

    pub fn index_count(&self) -> usize {
        self.points.len().saturating_sub(1) * self.segments as usize * 6
    }

    pub fn vertical_bias(&self, profile_index: usize) -> f32 {
        self.bands
            .iter()
            .find(|band| profile_index < band.end)
            .map_or(0.0, |band| band.vertical_bias)
    }

    /// Index range covering the quads between profile points `j` and `j + 1`
    /// for every `j` in `profile_segments`.
    ///
    /// Indices are laid out one profile segment at a time, so any run of
    /// segments is a contiguous range.
    pub fn segment_index_range(&self, profile_segments: Range<usize>) -> Range<usize> {
        let per_segment = self.segments as usize * 6;
        profile_segments.start * per_segment..profile_segments.end * per_segment
    }

    /// Generate the swept surface.
    ///
    /// Normals are the radial direction tilted by the band's vertical bias and
    /// renormalized, not the analytic normal of the surface.
    pub fn sweep(&self) -> GeometryData {
        let rows = self.points.len();
        let segments = self.segments as usize;
        let mut data = GeometryData::with_capacity(self.vertex_count(), self.index_count());

        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for (j, &(radius, height)) in self.points.iter().enumerate() {
                let ny = self.vertical_bias(j);
                let length = (cos_theta * cos_theta + ny * ny + sin_theta * sin_theta).sqrt();

                data.push_vertex(
                    [radius * cos_theta, height, radius * sin_theta],
                    [cos_theta / length, ny / length, sin_theta / length],
                );
            }
        }

        for j in 0..rows.saturating_sub(1) {
            for i in 0..segments {
                let current = (i * rows + j) as u16;
                let next = ((i + 1) * rows + j) as u16;

                data.push_triangle(current, current + 1, next);
                data.push_triangle(next, current + 1, next + 1);
            }
        }

        log::debug!(
            "Swept {} profile points into {} vertices, {} triangles",
            rows,
            data.vertex_count(),
            data.triangle_count()
        );

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vase() -> RevolutionProfile {
        RevolutionProfile::new(
            vec![(0.0, -1.0), (0.5, -0.9), (0.6, 0.0), (0.3, 0.5), (0.0, 0.6)],
            12,
        )
        .with_bands(vec![NormalBand::new(2, -0.5), NormalBand::new(5, 0.25)])
    }

    #[test]
    fn test_vertex_and_index_counts() {
        let profile = vase();
        let data = profile.sweep();
        assert_eq!(data.vertex_count(), 13 * 5);
        assert_eq!(data.vertex_count(), profile.vertex_count());
        assert_eq!(data.index_count(), profile.index_count());
        assert_eq!(data.index_count(), 4 * 12 * 6);
        assert_eq!(data.normals.len(), data.positions.len());
        let max = data.vertex_count() as u16 - 1;
        assert!(data.indices.iter().all(|&i| i <= max));
    }

    #[test]
    fn test_triangle_indices_distinct() {
        let data = vase().sweep();
        for tri in data.indices.chunks(3) {
            assert_ne!(tri[0], tri[1]);
            assert_ne!(tri[1], tri[2]);
            assert_ne!(tri[0], tri[2]);
        }
    }

    #[test]
    fn test_seam_is_duplicated() {
        let profile = vase();
        let data = profile.sweep();
        let rows = profile.points.len();
        for j in 0..rows {
            let first = data.vertex(j).position;
            let last = data.vertex(12 * rows + j).position;
            assert_relative_eq!(first, last, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_banded_normals() {
        let profile = vase();
        let data = profile.sweep();
        for (index, n) in data.normals.chunks(3).enumerate() {
            let j = index % 5;
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(length, 1.0, epsilon = 1e-6);

            let bias: f32 = if j < 2 { -0.5 } else { 0.25 };
            let expected_y = bias / (1.0 + bias * bias).sqrt();
            assert_relative_eq!(n[1], expected_y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_unbanded_points_get_no_bias() {
        let profile = RevolutionProfile::new(vec![(1.0, 0.0), (1.0, 1.0)], 4);
        assert_eq!(profile.vertical_bias(0), 0.0);
        let data = profile.sweep();
        assert!(data.normals.iter().skip(1).step_by(3).all(|&y| y == 0.0));
        // First column points along +X
        assert_relative_eq!(data.normals[0], 1.0);
    }

    #[test]
    fn test_triangles_face_outward() {
        let data = vase().sweep();
        for triangle in data.triangles().filter(|t| !t.is_degenerate()) {
            let shading = triangle
                .vertices
                .iter()
                .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.normal);
            assert!(triangle.cross().dot(&shading) > 0.0);
        }
    }

    #[test]
    fn test_segment_index_range() {
        let profile = vase();
        assert_eq!(profile.segment_index_range(0..4), 0..profile.index_count());
        assert_eq!(profile.segment_index_range(3..4), 216..288);
    }

    #[test]
    fn test_sweep_is_deterministic() {
        assert_eq!(vase().sweep(), vase().sweep());
    }
}
