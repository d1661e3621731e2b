use super::helpers::{link_program, uniform};
use super::{QuadGeometry, QUAD_VERT};
use ar_core::constants::{KEY_DISCARD_ALPHA, SPILL_GAIN};
use ar_core::ChromaKeyParams;
use glam::Mat4;
use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlTexture, WebGlUniformLocation};

pub static CHROMA_FRAG: &str = include_str!("../../shaders/chroma.frag");

/// Keyed video plane: samples the video texture and drops the key colour.
pub struct ChromaResources {
    program: WebGlProgram,
    u_mvp: WebGlUniformLocation,
    u_map: WebGlUniformLocation,
    u_key_color: WebGlUniformLocation,
    u_similarity: WebGlUniformLocation,
    u_smoothness: WebGlUniformLocation,
    u_spill: WebGlUniformLocation,
    u_spill_gain: WebGlUniformLocation,
    u_discard_alpha: WebGlUniformLocation,
}

pub fn create_chroma_resources(gl: &Gl) -> anyhow::Result<ChromaResources> {
    let program = link_program(gl, "chroma", QUAD_VERT, CHROMA_FRAG)?;
    Ok(ChromaResources {
        u_mvp: uniform(gl, &program, "u_mvp")?,
        u_map: uniform(gl, &program, "u_map")?,
        u_key_color: uniform(gl, &program, "u_key_color")?,
        u_similarity: uniform(gl, &program, "u_similarity")?,
        u_smoothness: uniform(gl, &program, "u_smoothness")?,
        u_spill: uniform(gl, &program, "u_spill")?,
        u_spill_gain: uniform(gl, &program, "u_spill_gain")?,
        u_discard_alpha: uniform(gl, &program, "u_discard_alpha")?,
        program,
    })
}

impl ChromaResources {
    pub fn draw(
        &self,
        gl: &Gl,
        quad: &QuadGeometry,
        texture: &WebGlTexture,
        mvp: Mat4,
        params: &ChromaKeyParams,
    ) {
        gl.use_program(Some(&self.program));
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(texture));
        gl.uniform1i(Some(&self.u_map), 0);
        gl.uniform_matrix4fv_with_f32_array(Some(&self.u_mvp), false, &mvp.to_cols_array());
        gl.uniform3fv_with_f32_array(Some(&self.u_key_color), &params.key_color().to_array());
        gl.uniform1f(Some(&self.u_similarity), params.similarity());
        gl.uniform1f(Some(&self.u_smoothness), params.smoothness());
        gl.uniform1f(Some(&self.u_spill), params.spill());
        gl.uniform1f(Some(&self.u_spill_gain), SPILL_GAIN);
        gl.uniform1f(Some(&self.u_discard_alpha), KEY_DISCARD_ALPHA);
        quad.draw(gl);
    }
}
