use anyhow::anyhow;
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

pub fn compile_shader(
    gl: &Gl,
    kind: u32,
    label: &str,
    source: &str,
) -> anyhow::Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| anyhow!("{}: create_shader failed", label))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !ok {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(anyhow!("{}: {}", label, info));
    }
    Ok(shader)
}

pub fn link_program(
    gl: &Gl,
    label: &str,
    vert_src: &str,
    frag_src: &str,
) -> anyhow::Result<WebGlProgram> {
    let vert = compile_shader(gl, Gl::VERTEX_SHADER, label, vert_src)?;
    let frag = compile_shader(gl, Gl::FRAGMENT_SHADER, label, frag_src)?;
    let program = gl
        .create_program()
        .ok_or_else(|| anyhow!("{}: create_program failed", label))?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);
    // shaders stay alive with the program
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    let ok = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !ok {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(anyhow!("{}: link failed: {}", label, info));
    }
    log::info!("[gl] program {} linked", label);
    Ok(program)
}

pub fn uniform(
    gl: &Gl,
    program: &WebGlProgram,
    name: &str,
) -> anyhow::Result<WebGlUniformLocation> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| anyhow!("uniform {} not found", name))
}

pub fn create_array_buffer(
    gl: &Gl,
    label: &str,
    data: &[u8],
    usage: u32,
) -> anyhow::Result<WebGlBuffer> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| anyhow!("{}: create_buffer failed", label))?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_u8_array(Gl::ARRAY_BUFFER, data, usage);
    Ok(buffer)
}

/// Bind `f32` attribute `location` to `components` floats at `offset_floats`
/// within a `stride_floats` interleaved record.
pub fn float_attribute(
    gl: &Gl,
    location: u32,
    components: i32,
    stride_floats: i32,
    offset_floats: i32,
) {
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(
        location,
        components,
        Gl::FLOAT,
        false,
        stride_floats * 4,
        offset_floats * 4,
    );
}
