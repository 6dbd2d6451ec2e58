/// Failures reported by a rendering backend or its collaborators.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The rendering context could not be created. Nothing can be drawn.
    #[error("Rendering device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A shader stage failed to compile.
    #[error("Shader compilation error: {0}")]
    ShaderCompile(String),

    /// The compiled stages failed to link into a program.
    #[error("Program linking error: {0}")]
    ShaderLink(String),

    /// The context refused to allocate a buffer object.
    #[error("Buffer allocation failed: {0}")]
    BufferAllocation(String),

    /// An image could not be fetched or decoded into a texture.
    #[error("Failed to load texture: {0}")]
    TextureLoad(String),
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
