use crate::constants::{CLEAR_COLOR, POINT_SIZE_PX, VIDEO_HAVE_CURRENT_DATA};
use crate::xr::ViewCamera;
use anyhow::anyhow;
use ar_core::ply::PointCloud;
use ar_core::{PlacedContent, SceneFrame};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlTexture, WebGlVertexArrayObject};

mod chroma;
mod helpers;
mod points;
mod shadow;

pub use chroma::*;
pub use points::*;
pub use shadow::*;

pub static QUAD_VERT: &str = include_str!("../shaders/quad.vert");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

// triangle strip, uv origin bottom-left
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-0.5, -0.5], uv: [0.0, 0.0] },
    QuadVertex { position: [0.5, -0.5], uv: [1.0, 0.0] },
    QuadVertex { position: [-0.5, 0.5], uv: [0.0, 1.0] },
    QuadVertex { position: [0.5, 0.5], uv: [1.0, 1.0] },
];

/// Unit quad shared by the video plane and the shadow.
pub struct QuadGeometry {
    vao: WebGlVertexArrayObject,
    _vbo: WebGlBuffer,
}

impl QuadGeometry {
    pub fn draw(&self, gl: &Gl) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, QUAD_VERTICES.len() as i32);
        gl.bind_vertex_array(None);
    }
}

fn create_quad_geometry(gl: &Gl) -> anyhow::Result<QuadGeometry> {
    let vao = gl
        .create_vertex_array()
        .ok_or_else(|| anyhow!("quad: create_vertex_array failed"))?;
    gl.bind_vertex_array(Some(&vao));
    let vbo = helpers::create_array_buffer(
        gl,
        "quad",
        bytemuck::cast_slice(&QUAD_VERTICES),
        Gl::STATIC_DRAW,
    )?;
    helpers::float_attribute(gl, 0, 2, 4, 0);
    helpers::float_attribute(gl, 1, 2, 4, 2);
    gl.bind_vertex_array(None);
    Ok(QuadGeometry { vao, _vbo: vbo })
}

fn create_video_texture(gl: &Gl) -> anyhow::Result<WebGlTexture> {
    let texture = gl
        .create_texture()
        .ok_or_else(|| anyhow!("video: create_texture failed"))?;
    gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
    gl.bind_texture(Gl::TEXTURE_2D, None);
    Ok(texture)
}

/// WebGL2 context on `canvas` that an XR layer can render through.
pub fn create_xr_context(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Gl> {
    let attrs = Object::new();
    for (key, value) in [("xrCompatible", true), ("alpha", true), ("antialias", true)] {
        Reflect::set(&attrs, &key.into(), &JsValue::from_bool(value))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    canvas
        .get_context_with_context_options("webgl2", &attrs)
        .map_err(|e| anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow!("WebGL2 unavailable"))?
        .dyn_into::<Gl>()
        .map_err(|_| anyhow!("context is not WebGL2"))
}

/// Draws the placed content into the XR layer, once per view.
pub struct GlRenderer {
    gl: Gl,
    quad: QuadGeometry,
    chroma: ChromaResources,
    shadow: ShadowResources,
    points: PointResources,
    video_texture: WebGlTexture,
    video_uploaded: bool,
}

impl GlRenderer {
    pub fn new(gl: Gl) -> anyhow::Result<Self> {
        let quad = create_quad_geometry(&gl)?;
        let chroma = create_chroma_resources(&gl)?;
        let shadow = create_shadow_resources(&gl)?;
        let points = create_point_resources(&gl)?;
        let video_texture = create_video_texture(&gl)?;
        gl.pixel_storei(Gl::UNPACK_FLIP_Y_WEBGL, 1);
        Ok(Self {
            gl,
            quad,
            chroma,
            shadow,
            points,
            video_texture,
            video_uploaded: false,
        })
    }

    pub fn set_point_cloud(&mut self, cloud: &PointCloud) -> anyhow::Result<()> {
        self.points.upload(&self.gl, cloud)
    }

    pub fn has_point_cloud(&self) -> bool {
        self.points.is_loaded()
    }

    /// Copy the current video frame into the texture, if one is decoded.
    pub fn upload_video_frame(&mut self, video: &web::HtmlVideoElement) {
        if video.ready_state() < VIDEO_HAVE_CURRENT_DATA {
            return;
        }
        let gl = &self.gl;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.video_texture));
        match gl.tex_image_2d_with_u32_and_u32_and_html_video_element(
            Gl::TEXTURE_2D,
            0,
            Gl::RGBA as i32,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            video,
        ) {
            Ok(()) => self.video_uploaded = true,
            Err(e) => log::warn!("[gl] video upload failed: {:?}", e),
        }
        gl.bind_texture(Gl::TEXTURE_2D, None);
    }

    pub fn render(
        &self,
        framebuffer: Option<&web::WebGlFramebuffer>,
        cameras: &[ViewCamera],
        scene: &SceneFrame<'_>,
    ) {
        let gl = &self.gl;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, framebuffer);
        let [r, g, b, a] = CLEAR_COLOR;
        gl.clear_color(r, g, b, a);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let Some(content) = &scene.content else {
            return;
        };
        gl.enable(Gl::DEPTH_TEST);
        gl.enable(Gl::BLEND);
        // straight-alpha shaders into a premultiplied layer
        gl.blend_func_separate(
            Gl::SRC_ALPHA,
            Gl::ONE_MINUS_SRC_ALPHA,
            Gl::ONE,
            Gl::ONE_MINUS_SRC_ALPHA,
        );
        for camera in cameras {
            let vp = camera.viewport;
            gl.viewport(vp.x, vp.y, vp.width, vp.height);
            self.draw_content(camera.view_proj, content, scene);
        }
        gl.depth_mask(true);
    }

    // shadow, then video, then points
    fn draw_content(&self, view_proj: Mat4, content: &PlacedContent, scene: &SceneFrame<'_>) {
        let gl = &self.gl;
        gl.depth_mask(false);
        self.shadow
            .draw(gl, &self.quad, view_proj * content.shadow_model, scene.shadow);

        gl.depth_mask(true);
        if self.video_uploaded {
            self.chroma.draw(
                gl,
                &self.quad,
                &self.video_texture,
                view_proj * content.video_model,
                scene.chroma,
            );
        }

        if content.draws_point_cloud() {
            self.points.draw(
                gl,
                view_proj * content.point_cloud_model,
                content.point_cloud_opacity,
                POINT_SIZE_PX,
            );
        }
    }
}
