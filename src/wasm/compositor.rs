use js_sys::Float32Array;
use web_sys::{
    HtmlImageElement, HtmlVideoElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::RevealError;
use crate::shader;
use crate::stage::FrameUniforms;
use crate::viewport::DeviceRect;

const HAVE_CURRENT_DATA: u16 = 2;

/// Owns the quad program and the base video texture; frame textures are
/// owned by the frame sequence and only borrowed per draw.
pub struct Compositor {
    gl: GL,
    program: Option<WebGlProgram>,
    vao: Option<WebGlVertexArrayObject>,
    quad: Option<WebGlBuffer>,
    base: Option<WebGlTexture>,
    u_mouse: WebGlUniformLocation,
    u_zone: WebGlUniformLocation,
    u_bias: WebGlUniformLocation,
}

impl Compositor {
    pub fn new(gl: GL, parallax_base: f32) -> Result<Self, RevealError> {
        let program = compile_program(
            &gl,
            shader::VERTEX_SHADER,
            &shader::fragment_shader(parallax_base),
        )?;
        let uniform = |name: &'static str| {
            gl.get_uniform_location(&program, name)
                .ok_or(RevealError::MissingUniform(name))
        };
        let u_base = uniform(shader::U_BASE)?;
        let u_chest = uniform(shader::U_CHEST)?;
        let u_mouse = uniform(shader::U_MOUSE)?;
        let u_zone = uniform(shader::U_ZONE)?;
        let u_bias = uniform(shader::U_BIAS)?;

        gl.use_program(Some(&program));
        gl.uniform1i(Some(&u_base), 0);
        gl.uniform1i(Some(&u_chest), 1);

        let vao = gl
            .create_vertex_array()
            .ok_or(RevealError::GlCreate("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let quad = gl.create_buffer().ok_or(RevealError::GlCreate("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
        let vertices = Float32Array::from(&shader::QUAD_VERTICES[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(shader::ATTR_POSITION);
        gl.vertex_attrib_pointer_with_i32(
            shader::ATTR_POSITION,
            2,
            GL::FLOAT,
            false,
            shader::QUAD_STRIDE,
            0,
        );
        gl.enable_vertex_attrib_array(shader::ATTR_UV);
        gl.vertex_attrib_pointer_with_i32(
            shader::ATTR_UV,
            2,
            GL::FLOAT,
            false,
            shader::QUAD_STRIDE,
            shader::QUAD_UV_OFFSET,
        );
        gl.bind_vertex_array(None);

        // Video and image sources are top-down; the quad's uv origin is bottom-left.
        gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
        let base = create_texture(&gl)?;

        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.enable(GL::SCISSOR_TEST);

        Ok(Compositor {
            gl,
            program: Some(program),
            vao: Some(vao),
            quad: Some(quad),
            base: Some(base),
            u_mouse,
            u_zone,
            u_bias,
        })
    }

    pub fn set_viewport(&self, rect: DeviceRect) {
        self.gl.viewport(rect.x, rect.y, rect.width, rect.height);
        self.gl.scissor(rect.x, rect.y, rect.width, rect.height);
    }

    /// Copy the current video frame into the base texture, if one is decoded.
    pub fn upload_video(&self, video: &HtmlVideoElement) {
        let Some(base) = self.base.as_ref() else {
            return;
        };
        if video.ready_state() < HAVE_CURRENT_DATA {
            return;
        }
        self.gl.bind_texture(GL::TEXTURE_2D, Some(base));
        if let Err(err) = self.gl.tex_image_2d_with_u32_and_u32_and_html_video_element(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            video,
        ) {
            log::debug!("video upload skipped: {err:?}");
        }
    }

    /// One draw of the quad. `overlay = None` samples the base texture in the zone.
    pub fn draw(&self, uniforms: &FrameUniforms, overlay: Option<&WebGlTexture>) {
        let (Some(program), Some(vao), Some(base)) = (&self.program, &self.vao, &self.base) else {
            return;
        };
        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(program));

        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(base));
        gl.active_texture(GL::TEXTURE1);
        gl.bind_texture(GL::TEXTURE_2D, Some(overlay.unwrap_or(base)));

        gl.uniform2f(Some(&self.u_mouse), uniforms.mouse.x, uniforms.mouse.y);
        let z = uniforms.zone;
        gl.uniform4f(Some(&self.u_zone), z.x, z.y, z.z, z.w);
        gl.uniform1f(Some(&self.u_bias), uniforms.bias);

        gl.bind_vertex_array(Some(vao));
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, shader::QUAD_VERTEX_COUNT);
        gl.bind_vertex_array(None);
        gl.active_texture(GL::TEXTURE0);
    }

    pub fn destroy(&mut self) {
        let gl = &self.gl;
        gl.delete_texture(self.base.take().as_ref());
        gl.delete_buffer(self.quad.take().as_ref());
        gl.delete_vertex_array(self.vao.take().as_ref());
        gl.delete_program(self.program.take().as_ref());
    }

    #[cfg(test)]
    pub(super) fn base_texture(&self) -> Option<WebGlTexture> {
        self.base.clone()
    }
}

/// Linear, clamped, mip-free 2D texture.
pub fn create_texture(gl: &GL) -> Result<WebGlTexture, RevealError> {
    let texture = gl.create_texture().ok_or(RevealError::GlCreate("texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        1,
        1,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&[0, 0, 0, 255]),
    )?;
    Ok(texture)
}

pub fn upload_image(
    gl: &GL,
    texture: &WebGlTexture,
    image: &HtmlImageElement,
) -> Result<(), RevealError> {
    gl.bind_texture(GL::TEXTURE_2D, Some(texture));
    gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        image,
    )?;
    Ok(())
}

fn compile_program(gl: &GL, vert_src: &str, frag_src: &str) -> Result<WebGlProgram, RevealError> {
    let vs = gl
        .create_shader(GL::VERTEX_SHADER)
        .ok_or(RevealError::GlCreate("vertex shader"))?;
    gl.shader_source(&vs, vert_src);
    gl.compile_shader(&vs);
    if !compile_status(gl, &vs) {
        let log = gl.get_shader_info_log(&vs).unwrap_or_default();
        gl.delete_shader(Some(&vs));
        return Err(RevealError::VertexCompile(log));
    }

    let fs = gl
        .create_shader(GL::FRAGMENT_SHADER)
        .ok_or(RevealError::GlCreate("fragment shader"))?;
    gl.shader_source(&fs, frag_src);
    gl.compile_shader(&fs);
    if !compile_status(gl, &fs) {
        let log = gl.get_shader_info_log(&fs).unwrap_or_default();
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        return Err(RevealError::FragmentCompile(log));
    }

    let program = gl
        .create_program()
        .ok_or(RevealError::GlCreate("program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);

    gl.detach_shader(&program, &vs);
    gl.detach_shader(&program, &fs);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !linked {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(RevealError::Link(log));
    }

    Ok(program)
}

fn compile_status(gl: &GL, shader: &web_sys::WebGlShader) -> bool {
    gl.get_shader_parameter(shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
}
