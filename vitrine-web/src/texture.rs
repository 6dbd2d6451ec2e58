/// Asynchronous image texture loading
use js_sys::Promise;
use vitrine_core::texture::TextureSampling;
use vitrine_core::RenderError;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, WebGl2RenderingContext as Gl, WebGlTexture};

/// Fetch the image at `url` and upload it as an RGBA texture.
///
/// Power-of-two images get mipmaps; anything else is clamped to the edge
/// and filtered linearly.
pub async fn load_texture(gl: &Gl, url: &str) -> Result<WebGlTexture, RenderError> {
    let failed = || RenderError::TextureLoad(url.to_string());

    let image = HtmlImageElement::new().map_err(|_| failed())?;
    image.set_cross_origin(Some("anonymous"));

    let loaded = Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(url);

    let result = JsFuture::from(loaded).await;
    image.set_onload(None);
    image.set_onerror(None);
    result.map_err(|_| failed())?;

    let texture = gl.create_texture().ok_or_else(failed)?;
    gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
    gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        Gl::TEXTURE_2D,
        0,
        Gl::RGBA as i32,
        Gl::RGBA,
        Gl::UNSIGNED_BYTE,
        &image,
    )
    .map_err(|_| failed())?;

    let (width, height) = (image.natural_width(), image.natural_height());
    match TextureSampling::for_dimensions(width, height) {
        TextureSampling::Mipmapped => gl.generate_mipmap(Gl::TEXTURE_2D),
        TextureSampling::ClampLinear => {
            gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
            gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);
            gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
        }
    }

    log::debug!("Loaded texture {} ({}x{})", url, width, height);
    Ok(texture)
}
