/// ASCII rasterizer backend for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use std::ops::Range;
use vitrine_core::geometry::Triangle;
use vitrine_core::projection::{clip_to_depth_range, clip_to_screen};
use vitrine_core::{
    FrameUniforms, GeometryData, Material, RenderBackend, RenderError, Transform,
};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Ambient term added to every lit face
const AMBIENT: f32 = 0.2;

/// Software backend that rasterizes triangles into a character grid.
///
/// Viewport heights are in half-cells: a terminal cell is roughly twice as
/// tall as it is wide, so a `w x h` viewport maps onto `w x h/2` cells and
/// the scene's aspect ratio stays undistorted.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    geometries: Vec<GeometryData>,
    frame: Option<FrameUniforms>,
    model: Matrix4<f32>,
    material: Material,
    bound: Option<usize>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            geometries: Vec::new(),
            frame: None,
            model: Matrix4::identity(),
            material: Material::solid([1.0, 1.0, 1.0, 1.0]),
            bound: None,
        }
    }

    /// Grid size in cells.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Number of cells covered by geometry this frame.
    pub fn covered_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    fn render_triangle(&mut self, triangle: &Triangle, mvp: &Matrix4<f32>, frame: &FrameUniforms) {
        let mut world = triangle.clone();
        for vertex in &mut world.vertices {
            vertex.position = self.model.transform_point(&vertex.position);
        }
        if world.is_degenerate() {
            return;
        }
        let normal = world.calculate_normal();
        let [a, b, c] = world.vertices.map(|v| v.position.coords);
        let centroid = Point3::from((a + b + c) / 3.0);

        // Back faces point away from the eye
        if normal.dot(&(frame.eye_position - centroid)) <= 0.0 {
            return;
        }

        // Clip against the near and far planes before the perspective divide
        let clip = triangle
            .vertices
            .map(|v| mvp * v.position.to_homogeneous());
        let polygon = clip_to_depth_range(&clip);
        if polygon.len() < 3 || polygon.iter().any(|v| v.w < 1e-6) {
            return;
        }

        let light_dir: Vector3<f32> = (frame.light_position - centroid).normalize();
        let brightness = (AMBIENT + normal.dot(&light_dir).max(0.0)).min(1.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        let [r, g, b, _] = self.material.base_color;
        let channel = |c: f32| (c * brightness * 255.0).clamp(0.0, 255.0) as u8;
        let color = Color::Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        };

        let (width, height) = (self.width as u32, self.height as u32);
        let screen: Vec<_> = polygon
            .iter()
            .map(|v| clip_to_screen(v, width, height))
            .collect();

        // Fan out from the first vertex; the clipped polygon is convex
        for pair in screen[1..].windows(2) {
            self.rasterize_triangle(&[screen[0], pair[0], pair[1]], character, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.color_buffer[idx] = color;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            let mut current = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    type Buffers = usize;

    fn upload(&mut self, geometry: &GeometryData) -> Result<usize, RenderError> {
        self.geometries.push(geometry.clone());
        Ok(self.geometries.len() - 1)
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        let (width, height) = (width as usize, (height / 2).max(1) as usize);
        if (width, height) == (self.width, self.height) {
            return;
        }
        *self = Self {
            geometries: std::mem::take(&mut self.geometries),
            ..Self::new(width, height)
        };
    }

    fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    fn set_frame_uniforms(&mut self, frame: &FrameUniforms) {
        self.frame = Some(*frame);
    }

    fn set_model_matrix(&mut self, model: &Matrix4<f32>) {
        self.model = *model;
    }

    fn set_material(&mut self, material: &Material) {
        self.material = *material;
    }

    fn bind_buffers(&mut self, buffers: &usize) {
        self.bound = Some(*buffers);
    }

    fn draw_indexed(&mut self, range: Range<usize>) {
        let (Some(frame), Some(bound)) = (self.frame, self.bound) else {
            return;
        };
        if bound >= self.geometries.len() {
            log::warn!("Draw with unknown buffers #{}", bound);
            return;
        }

        // Taken for the draw and restored below
        let geometries = std::mem::take(&mut self.geometries);
        let geometry = &geometries[bound];
        let mvp = Transform::mvp_matrix(&self.model, &frame.view, &frame.projection);

        for n in (range.start / 3..range.end / 3).filter(|&n| n < geometry.triangle_count()) {
            self.render_triangle(&geometry.triangle(n), &mvp, &frame);
        }

        self.geometries = geometries;
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vitrine_core::{props, Scene, SceneConfig};

    #[test]
    fn test_barycentric() {
        let (w0, w1, w2) =
            barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert_relative_eq!(w0, 0.5);
        assert_relative_eq!(w1, 0.25);
        assert_relative_eq!(w2, 0.25);

        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 0.0)).is_none());
    }

    #[test]
    fn test_viewport_is_half_height_in_cells() {
        let mut renderer = AsciiRenderer::new(1, 1);
        renderer.upload(&GeometryData::new()).unwrap();
        renderer.set_viewport(80, 48);
        assert_eq!(renderer.size(), (80, 24));
        assert_eq!(renderer.cell(79, 23), Some(' '));
        assert_eq!(renderer.cell(80, 0), None);
        assert_eq!(renderer.geometries.len(), 1);
    }

    #[test]
    fn test_draw_without_frame_is_noop() {
        let mut renderer = AsciiRenderer::new(20, 10);
        let floor = props::floor();
        let handle = renderer.upload(floor.geometry()).unwrap();
        renderer.bind_buffers(&handle);
        renderer.draw_indexed(0..6);
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_showroom_renders_and_clears() {
        let renderer = AsciiRenderer::new(1, 1);
        let mut scene = Scene::new(renderer, &SceneConfig::default(), 80, 48);
        props::populate(&mut scene).unwrap();

        scene.render_frame();
        let covered = scene.backend().covered_cells();
        assert!(covered > 0);
        assert!(covered < 80 * 24);

        scene.backend_mut().clear();
        assert_eq!(scene.backend().covered_cells(), 0);
    }

    #[test]
    fn test_draw_output_has_one_line_per_row() {
        let mut renderer = AsciiRenderer::new(4, 3);
        renderer.clear();
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_floor_stays_visible_when_crossing_near_plane() {
        // Eye just above the floor; the nearest floor corners lie behind it
        let renderer = AsciiRenderer::new(1, 1);
        let mut scene = Scene::new(renderer, &SceneConfig::default(), 80, 48);
        scene.add_mesh(props::floor()).unwrap();
        scene.camera_mut().look_from(&Point3::new(1.755, 0.3, 1.755));

        scene.render_frame();
        let renderer = scene.backend();
        let bottom_half = (12..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.cell(x, y) != Some(' '))
            .count();
        assert!(bottom_half > 80 * 12 / 4, "bottom half covered {}", bottom_half);
    }

    #[test]
    fn test_repeated_draws_reuse_uploaded_geometry() {
        let renderer = AsciiRenderer::new(1, 1);
        let mut scene = Scene::new(renderer, &SceneConfig::default(), 80, 48);
        props::populate(&mut scene).unwrap();

        scene.render_frame();
        let first = scene.backend().covered_cells();
        scene.render_frame();
        assert_eq!(scene.backend().covered_cells(), first);
        assert_eq!(scene.backend().geometries.len(), 3);
    }

    #[test]
    fn test_draw_with_unknown_buffers_is_noop() {
        let renderer = AsciiRenderer::new(1, 1);
        let mut scene = Scene::new(renderer, &SceneConfig::default(), 80, 48);
        scene.add_mesh(props::floor()).unwrap();
        scene.render_frame();

        let renderer = scene.backend_mut();
        renderer.clear();
        renderer.bind_buffers(&7);
        renderer.draw_indexed(0..6);
        assert_eq!(renderer.covered_cells(), 0);
        assert_eq!(renderer.geometries.len(), 1);
    }
}
