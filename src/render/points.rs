use super::helpers::{create_array_buffer, float_attribute, link_program, uniform};
use anyhow::anyhow;
use ar_core::ply::PointCloud;
use glam::Mat4;
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

pub static POINTS_VERT: &str = include_str!("../../shaders/points.vert");
pub static POINTS_FRAG: &str = include_str!("../../shaders/points.frag");

struct PointBuffers {
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
    count: i32,
}

/// Coloured point cloud; empty until [`PointResources::upload`] succeeds.
pub struct PointResources {
    program: WebGlProgram,
    u_mvp: WebGlUniformLocation,
    u_point_size: WebGlUniformLocation,
    u_opacity: WebGlUniformLocation,
    buffers: Option<PointBuffers>,
}

pub fn create_point_resources(gl: &Gl) -> anyhow::Result<PointResources> {
    let program = link_program(gl, "points", POINTS_VERT, POINTS_FRAG)?;
    Ok(PointResources {
        u_mvp: uniform(gl, &program, "u_mvp")?,
        u_point_size: uniform(gl, &program, "u_point_size")?,
        u_opacity: uniform(gl, &program, "u_opacity")?,
        program,
        buffers: None,
    })
}

impl PointResources {
    pub fn upload(&mut self, gl: &Gl, cloud: &PointCloud) -> anyhow::Result<()> {
        let count = i32::try_from(cloud.len()).map_err(|_| anyhow!("point cloud too large"))?;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| anyhow!("points: create_vertex_array failed"))?;
        gl.bind_vertex_array(Some(&vao));
        let interleaved = cloud.interleaved();
        let vbo = create_array_buffer(
            gl,
            "points",
            bytemuck::cast_slice(&interleaved),
            Gl::STATIC_DRAW,
        )?;
        float_attribute(gl, 0, 3, 6, 0);
        float_attribute(gl, 1, 3, 6, 3);
        gl.bind_vertex_array(None);

        if let Some(old) = self.buffers.replace(PointBuffers { vao, vbo, count }) {
            gl.delete_vertex_array(Some(&old.vao));
            gl.delete_buffer(Some(&old.vbo));
        }
        log::info!("[gl] uploaded {} points", count);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.buffers.as_ref().is_some_and(|b| b.count > 0)
    }

    pub fn draw(&self, gl: &Gl, mvp: Mat4, opacity: f32, point_size: f32) {
        let Some(buffers) = &self.buffers else {
            return;
        };
        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(Some(&self.u_mvp), false, &mvp.to_cols_array());
        gl.uniform1f(Some(&self.u_point_size), point_size);
        gl.uniform1f(Some(&self.u_opacity), opacity);
        gl.bind_vertex_array(Some(&buffers.vao));
        gl.draw_arrays(Gl::POINTS, 0, buffers.count);
        gl.bind_vertex_array(None);
    }
}
