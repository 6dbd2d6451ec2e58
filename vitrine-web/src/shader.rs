/// GLSL sources and program compilation
use vitrine_core::RenderError;
use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader, WebGlUniformLocation};

pub const VERTEX_SHADER: &str = r#"
attribute vec3 aPosition;
attribute vec3 aNormal;
attribute vec2 aTexCoord;

uniform mat4 uModelMatrix;
uniform mat4 uViewMatrix;
uniform mat4 uProjMatrix;

varying vec3 vNormal;
varying vec3 vPosition;
varying vec2 vTexCoord;
varying vec3 vLocalPosition;

void main() {
    vNormal = mat3(uModelMatrix) * aNormal;
    vec4 worldPos = uModelMatrix * vec4(aPosition, 1.0);
    vPosition = worldPos.xyz;
    vTexCoord = aTexCoord;
    vLocalPosition = aPosition;
    gl_Position = uProjMatrix * uViewMatrix * worldPos;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
precision highp float;

varying vec3 vNormal;
varying vec3 vPosition;
varying vec2 vTexCoord;
varying vec3 vLocalPosition;

uniform vec3 uLightPos;
uniform vec3 uViewPos;
uniform vec4 uBaseColor;
uniform sampler2D uTexture;
uniform bool uUseTexture;
uniform float uShininess;

void main() {
    vec3 normal = normalize(vNormal);
    vec3 lightDir = normalize(uLightPos - vPosition);
    vec3 viewDir = normalize(uViewPos - vPosition);
    vec3 halfDir = normalize(lightDir + viewDir);

    float ambient = 0.2;
    float diffuse = max(dot(normal, lightDir), 0.0);
    float specular = pow(max(dot(normal, halfDir), 0.0), uShininess);
    float fresnel = pow(1.0 - max(dot(normal, viewDir), 0.0), 4.0);

    vec4 baseColor = uUseTexture ? texture2D(uTexture, vTexCoord) : uBaseColor;

    // Brighten toward the top of the model
    baseColor.rgb += (vLocalPosition.y + 1.0) * 0.1;

    vec3 color = baseColor.rgb * (ambient + diffuse)
        + vec3(1.0) * specular * baseColor.a
        + vec3(0.5, 0.7, 1.0) * fresnel * baseColor.a;

    gl_FragColor = vec4(color, baseColor.a);
}
"#;

pub fn compile_shader(gl: &Gl, stage: u32, source: &str) -> Result<WebGlShader, RenderError> {
    let shader = gl
        .create_shader(stage)
        .ok_or_else(|| RenderError::ShaderCompile("unable to create shader object".to_string()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown error".to_string());
        gl.delete_shader(Some(&shader));
        Err(RenderError::ShaderCompile(info))
    }
}

pub fn link_program(
    gl: &Gl,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, RenderError> {
    let program = gl
        .create_program()
        .ok_or_else(|| RenderError::ShaderLink("unable to create program object".to_string()))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown error".to_string());
        gl.delete_program(Some(&program));
        Err(RenderError::ShaderLink(info))
    }
}

/// Compile both stages of the scene shader and link them.
pub fn build_program(gl: &Gl) -> Result<WebGlProgram, RenderError> {
    let vertex = compile_shader(gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
    let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
    let program = link_program(gl, &vertex, &fragment);

    // The linked program keeps its own copy
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));
    program
}

/// Attribute and uniform locations, looked up once after linking.
///
/// Attributes the compiler optimized away are `None`, as are missing
/// uniforms; setters skip them.
#[derive(Debug, Clone)]
pub struct ProgramLocations {
    pub position: Option<u32>,
    pub normal: Option<u32>,
    pub tex_coord: Option<u32>,
    pub model: Option<WebGlUniformLocation>,
    pub view: Option<WebGlUniformLocation>,
    pub projection: Option<WebGlUniformLocation>,
    pub light_position: Option<WebGlUniformLocation>,
    pub view_position: Option<WebGlUniformLocation>,
    pub base_color: Option<WebGlUniformLocation>,
    pub texture: Option<WebGlUniformLocation>,
    pub use_texture: Option<WebGlUniformLocation>,
    pub shininess: Option<WebGlUniformLocation>,
}

impl ProgramLocations {
    pub fn lookup(gl: &Gl, program: &WebGlProgram) -> Self {
        let attribute = |name: &str| u32::try_from(gl.get_attrib_location(program, name)).ok();
        let uniform = |name: &str| gl.get_uniform_location(program, name);

        Self {
            position: attribute("aPosition"),
            normal: attribute("aNormal"),
            tex_coord: attribute("aTexCoord"),
            model: uniform("uModelMatrix"),
            view: uniform("uViewMatrix"),
            projection: uniform("uProjMatrix"),
            light_position: uniform("uLightPos"),
            view_position: uniform("uViewPos"),
            base_color: uniform("uBaseColor"),
            texture: uniform("uTexture"),
            use_texture: uniform("uUseTexture"),
            shininess: uniform("uShininess"),
        }
    }
}
