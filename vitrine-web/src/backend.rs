/// WebGL 2 implementation of the scene backend
use std::ops::Range;

use js_sys::{Float32Array, Uint16Array};
use nalgebra::Matrix4;
use vitrine_core::mesh::TextureId;
use vitrine_core::{FrameUniforms, GeometryData, Material, RenderBackend, RenderError};
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlTexture};

use crate::shader::{build_program, ProgramLocations};

/// Device buffers holding one mesh's geometry.
#[derive(Debug)]
pub struct GlBuffers {
    positions: WebGlBuffer,
    normals: WebGlBuffer,
    indices: WebGlBuffer,
}

/// Draws through a single shared shader program.
///
/// If the program failed to build the backend still accepts uploads but
/// every draw is skipped.
pub struct WebGlBackend {
    gl: Gl,
    program: Option<(WebGlProgram, ProgramLocations)>,
    clear_color: [f32; 4],
    textures: Vec<WebGlTexture>,
}

impl WebGlBackend {
    pub fn new(gl: Gl, clear_color: [f32; 4]) -> Self {
        gl.enable(Gl::DEPTH_TEST);
        gl.enable(Gl::CULL_FACE);
        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);

        let program = match build_program(&gl) {
            Ok(program) => {
                let locations = ProgramLocations::lookup(&gl, &program);
                Some((program, locations))
            }
            Err(err) => {
                log::error!("{}", err);
                None
            }
        };

        Self {
            gl,
            program,
            clear_color,
            textures: Vec::new(),
        }
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    /// Make a loaded texture available to textured materials.
    pub fn register_texture(&mut self, texture: WebGlTexture) -> TextureId {
        self.textures.push(texture);
        (self.textures.len() - 1) as TextureId
    }

    fn locations(&self) -> Option<&ProgramLocations> {
        self.program.as_ref().map(|(_, locations)| locations)
    }

    fn create_buffer(&self) -> Result<WebGlBuffer, RenderError> {
        self.gl
            .create_buffer()
            .ok_or_else(|| RenderError::BufferAllocation("createBuffer returned null".to_string()))
    }

    fn bind_attribute(&self, buffer: &WebGlBuffer, location: Option<u32>) {
        let Some(location) = location else {
            return;
        };
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl.vertex_attrib_pointer_with_i32(location, 3, Gl::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(location);
    }
}

impl RenderBackend for WebGlBackend {
    type Buffers = GlBuffers;

    fn upload(&mut self, geometry: &GeometryData) -> Result<GlBuffers, RenderError> {
        let positions = self.create_buffer()?;
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&positions));
        self.gl.buffer_data_with_array_buffer_view(
            Gl::ARRAY_BUFFER,
            &Float32Array::from(geometry.positions.as_slice()),
            Gl::STATIC_DRAW,
        );

        let normals = self.create_buffer()?;
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&normals));
        self.gl.buffer_data_with_array_buffer_view(
            Gl::ARRAY_BUFFER,
            &Float32Array::from(geometry.normals.as_slice()),
            Gl::STATIC_DRAW,
        );

        let indices = self.create_buffer()?;
        self.gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&indices));
        self.gl.buffer_data_with_array_buffer_view(
            Gl::ELEMENT_ARRAY_BUFFER,
            &Uint16Array::from(geometry.indices.as_slice()),
            Gl::STATIC_DRAW,
        );

        Ok(GlBuffers {
            positions,
            normals,
            indices,
        })
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn clear(&mut self) {
        let [r, g, b, a] = self.clear_color;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    fn set_frame_uniforms(&mut self, frame: &FrameUniforms) {
        let Some((program, locations)) = &self.program else {
            log::warn!("No shader program; skipping frame");
            return;
        };

        self.gl.use_program(Some(program));
        self.gl.uniform_matrix4fv_with_f32_array(
            locations.view.as_ref(),
            false,
            frame.view.as_slice(),
        );
        self.gl.uniform_matrix4fv_with_f32_array(
            locations.projection.as_ref(),
            false,
            frame.projection.as_slice(),
        );

        let light = frame.light_position;
        self.gl
            .uniform3f(locations.light_position.as_ref(), light.x, light.y, light.z);
        let eye = frame.eye_position;
        self.gl
            .uniform3f(locations.view_position.as_ref(), eye.x, eye.y, eye.z);
    }

    fn set_model_matrix(&mut self, model: &Matrix4<f32>) {
        let Some(locations) = self.locations() else {
            return;
        };
        self.gl
            .uniform_matrix4fv_with_f32_array(locations.model.as_ref(), false, model.as_slice());
    }

    fn set_material(&mut self, material: &Material) {
        let Some(locations) = self.locations() else {
            return;
        };

        self.gl
            .uniform4fv_with_f32_array(locations.base_color.as_ref(), &material.base_color);
        self.gl
            .uniform1f(locations.shininess.as_ref(), material.shininess_or_default());

        let texture = material
            .texture
            .and_then(|id| self.textures.get(id as usize));
        match texture {
            Some(texture) if material.use_texture => {
                self.gl.active_texture(Gl::TEXTURE0);
                self.gl.bind_texture(Gl::TEXTURE_2D, Some(texture));
                self.gl.uniform1i(locations.texture.as_ref(), 0);
                self.gl.uniform1i(locations.use_texture.as_ref(), 1);
            }
            _ => self.gl.uniform1i(locations.use_texture.as_ref(), 0),
        }
    }

    fn bind_buffers(&mut self, buffers: &GlBuffers) {
        let Some(locations) = self.locations() else {
            return;
        };
        let (position, normal, tex_coord) =
            (locations.position, locations.normal, locations.tex_coord);

        self.bind_attribute(&buffers.positions, position);
        self.bind_attribute(&buffers.normals, normal);
        // Generated geometry carries no UVs; the shader reads a constant
        if let Some(tex_coord) = tex_coord {
            self.gl.disable_vertex_attrib_array(tex_coord);
        }
        self.gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffers.indices));
    }

    fn draw_indexed(&mut self, range: Range<usize>) {
        if self.program.is_none() {
            return;
        }
        // Offsets are in bytes; indices are u16
        self.gl.draw_elements_with_i32(
            Gl::TRIANGLES,
            range.len() as i32,
            Gl::UNSIGNED_SHORT,
            (range.start * 2) as i32,
        );
    }
}
