use super::helpers::{link_program, uniform};
use super::{QuadGeometry, QUAD_VERT};
use ar_core::constants::SHADOW_DISCARD_ALPHA;
use ar_core::OvalShadowParams;
use glam::Mat4;
use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlUniformLocation};

pub static SHADOW_FRAG: &str = include_str!("../../shaders/shadow.frag");

pub struct ShadowResources {
    program: WebGlProgram,
    u_mvp: WebGlUniformLocation,
    u_half_axes: WebGlUniformLocation,
    u_exponent: WebGlUniformLocation,
    u_opacity: WebGlUniformLocation,
    u_discard_alpha: WebGlUniformLocation,
}

pub fn create_shadow_resources(gl: &Gl) -> anyhow::Result<ShadowResources> {
    let program = link_program(gl, "shadow", QUAD_VERT, SHADOW_FRAG)?;
    Ok(ShadowResources {
        u_mvp: uniform(gl, &program, "u_mvp")?,
        u_half_axes: uniform(gl, &program, "u_half_axes")?,
        u_exponent: uniform(gl, &program, "u_exponent")?,
        u_opacity: uniform(gl, &program, "u_opacity")?,
        u_discard_alpha: uniform(gl, &program, "u_discard_alpha")?,
        program,
    })
}

impl ShadowResources {
    pub fn draw(&self, gl: &Gl, quad: &QuadGeometry, mvp: Mat4, params: &OvalShadowParams) {
        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(Some(&self.u_mvp), false, &mvp.to_cols_array());
        gl.uniform2fv_with_f32_array(Some(&self.u_half_axes), &params.half_axes.to_array());
        gl.uniform1f(Some(&self.u_exponent), params.exponent);
        gl.uniform1f(Some(&self.u_opacity), params.opacity);
        gl.uniform1f(Some(&self.u_discard_alpha), SHADOW_DISCARD_ALPHA);
        quad.draw(gl);
    }
}
