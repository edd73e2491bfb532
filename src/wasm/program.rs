use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::config::{RippleConfig, MAX_RIPPLES};
use crate::driver::{FrameUniforms, RenderBackend};
use crate::error::{LayerError, LayerResult};
use crate::field::{BAND_WIDTH, CORE_RADIUS, CUTOFF_FEATHER};
use crate::viewport::Viewport;

use super::surface::lose_context;

const VERTEX_SHADER: &str = r"#version 300 es
layout(location = 0) in vec2 a_position;
void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

// Mirrors `crate::field`. Placeholders are filled in by `fragment_source`.
const FRAGMENT_SHADER: &str = r"#version 300 es
precision highp float;

#define MAX_RIPPLES @MAX_RIPPLES@
const float BAND_WIDTH = @BAND_WIDTH@;
const float CORE_RADIUS = @CORE_RADIUS@;
const float CUTOFF_FEATHER = @CUTOFF_FEATHER@;

const vec3 PURPLE = vec3(0.5, 0.2, 0.8);
const vec3 BLUE = vec3(0.2, 0.4, 1.0);
const vec3 LIGHT_BLUE = vec3(0.4, 0.6, 1.0);

uniform float u_time;
uniform vec2 u_resolution;
uniform vec2 u_ripple_pos[MAX_RIPPLES];
uniform float u_ripple_time[MAX_RIPPLES];
uniform int u_ripple_count;

uniform float u_speed;
uniform float u_frequency;
uniform float u_damping;
uniform float u_max_radius;
uniform float u_ripple_alpha;
uniform float u_intensity;
uniform vec3 u_color;
uniform int u_palette;

out vec4 frag_color;

float cutoff(float r) {
    if (u_max_radius <= 0.0) return 1.0;
    if (r >= u_max_radius) return 0.0;
    float feather = min(CUTOFF_FEATHER, u_max_radius);
    return 1.0 - smoothstep(u_max_radius - feather, u_max_radius, r);
}

float contribution(vec2 p, vec2 origin, float age) {
    if (age < 0.0) return 0.0;
    float r = length(p - origin);
    float d = r - age * u_speed;
    float rings = 0.5 + 0.5 * sin(d * u_frequency);
    float band = exp(-(d / BAND_WIDTH) * (d / BAND_WIDTH));
    float fade = exp(-u_damping * age);
    float inner = smoothstep(0.0, CORE_RADIUS, r);
    return rings * band * fade * inner * cutoff(r) * u_ripple_alpha;
}

void main() {
    vec2 p = gl_FragCoord.xy;
    if (p.x > u_resolution.x || p.y > u_resolution.y) discard;

    float sum = 0.0;
    for (int i = 0; i < MAX_RIPPLES; i++) {
        if (i >= u_ripple_count) break;
        sum += contribution(p, u_ripple_pos[i], u_time - u_ripple_time[i]);
    }
    float total = clamp(sum * u_intensity, 0.0, 1.0);

    vec3 color = u_color;
    if (u_palette == 1) {
        float phase = 0.5 + 0.5 * sin(u_time * 0.5 + total * 3.0);
        color = mix(mix(PURPLE, BLUE, phase), mix(BLUE, LIGHT_BLUE, phase), total);
    }
    frag_color = vec4(color, total);
}
";

/// One oversized triangle covering clip space.
const FULLSCREEN_TRIANGLE: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];

pub fn fragment_source() -> String {
    FRAGMENT_SHADER
        .replace("@MAX_RIPPLES@", &MAX_RIPPLES.to_string())
        .replace("@BAND_WIDTH@", &glsl_float(BAND_WIDTH))
        .replace("@CORE_RADIUS@", &glsl_float(CORE_RADIUS))
        .replace("@CUTOFF_FEATHER@", &glsl_float(CUTOFF_FEATHER))
}

// `{:?}` always keeps a decimal point, which GLSL ES needs for float literals.
fn glsl_float(v: f32) -> String {
    format!("{v:?}")
}

struct Uniforms {
    time: WebGlUniformLocation,
    resolution: WebGlUniformLocation,
    ripple_pos: WebGlUniformLocation,
    ripple_time: WebGlUniformLocation,
    ripple_count: WebGlUniformLocation,
}

/// The linked ripple program plus the geometry it draws.
pub struct GlBackend {
    gl: GL,
    canvas: HtmlCanvasElement,
    linked: Linked,
    vbo: WebGlBuffer,
    vao: WebGlVertexArrayObject,
    uniforms: Uniforms,
    released: bool,
}

impl GlBackend {
    /// Compile, link and set the per-layer uniforms, then size the canvas to
    /// `viewport`.
    pub fn new(
        gl: GL,
        canvas: HtmlCanvasElement,
        config: &RippleConfig,
        viewport: &Viewport,
    ) -> LayerResult<Self> {
        let linked = Linked::build(&gl, VERTEX_SHADER, &fragment_source())?;
        let (linked, uniforms, vao, vbo) = configure(&gl, linked, config)?;

        let mut backend = Self {
            gl,
            canvas,
            linked,
            vbo,
            vao,
            uniforms,
            released: false,
        };
        backend.resize(viewport);
        Ok(backend)
    }
}

/// A linked program and the two shaders attached to it.
struct Linked {
    program: WebGlProgram,
    shaders: [WebGlShader; 2],
}

impl Linked {
    fn build(gl: &GL, vertex: &str, fragment: &str) -> LayerResult<Self> {
        let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = match compile_shader(gl, GL::FRAGMENT_SHADER, fragment) {
            Ok(fs) => fs,
            Err(e) => {
                gl.delete_shader(Some(&vs));
                return Err(e);
            }
        };
        match link_program(gl, &vs, &fs) {
            Ok(program) => Ok(Self {
                program,
                shaders: [vs, fs],
            }),
            Err(e) => {
                gl.delete_shader(Some(&vs));
                gl.delete_shader(Some(&fs));
                Err(e)
            }
        }
    }

    fn delete(&self, gl: &GL) {
        for shader in &self.shaders {
            gl.detach_shader(&self.program, shader);
            gl.delete_shader(Some(shader));
        }
        gl.delete_program(Some(&self.program));
    }
}

/// Look up uniforms, set the per-layer ones and build the triangle geometry.
/// On failure everything created here and `linked` itself are deleted.
fn configure(
    gl: &GL,
    linked: Linked,
    config: &RippleConfig,
) -> LayerResult<(Linked, Uniforms, WebGlVertexArrayObject, WebGlBuffer)> {
    let program = &linked.program;
    let set_up = || -> LayerResult<Uniforms> {
        let uniform = |name: &'static str| {
            gl.get_uniform_location(program, name)
                .ok_or(LayerError::MissingUniform(name))
        };
        let uniforms = Uniforms {
            time: uniform("u_time")?,
            resolution: uniform("u_resolution")?,
            ripple_pos: uniform("u_ripple_pos")?,
            ripple_time: uniform("u_ripple_time")?,
            ripple_count: uniform("u_ripple_count")?,
        };

        gl.use_program(Some(program));
        gl.uniform1f(Some(&uniform("u_speed")?), config.speed);
        gl.uniform1f(Some(&uniform("u_frequency")?), config.frequency);
        gl.uniform1f(Some(&uniform("u_damping")?), config.damping);
        gl.uniform1f(Some(&uniform("u_max_radius")?), config.max_radius);
        gl.uniform1f(Some(&uniform("u_ripple_alpha")?), config.ripple_alpha);
        gl.uniform1f(Some(&uniform("u_intensity")?), config.intensity);
        let [r, g, b] = config.color;
        gl.uniform3f(Some(&uniform("u_color")?), r, g, b);
        gl.uniform1i(Some(&uniform("u_palette")?), config.palette.shader_index());
        Ok(uniforms)
    };
    let uniforms = match set_up() {
        Ok(u) => u,
        Err(e) => {
            gl.use_program(None);
            linked.delete(gl);
            return Err(e);
        }
    };

    let Some(vao) = gl.create_vertex_array() else {
        gl.use_program(None);
        linked.delete(gl);
        return Err(LayerError::ContextUnavailable);
    };
    let Some(vbo) = gl.create_buffer() else {
        gl.delete_vertex_array(Some(&vao));
        gl.use_program(None);
        linked.delete(gl);
        return Err(LayerError::ContextUnavailable);
    };
    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
    let vertices = js_sys::Float32Array::from(&FULLSCREEN_TRIANGLE[..]);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, 0, 0);
    gl.bind_vertex_array(None);

    gl.enable(GL::BLEND);
    gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
    gl.clear_color(0.0, 0.0, 0.0, 0.0);

    Ok((linked, uniforms, vao, vbo))
}

impl RenderBackend for GlBackend {
    fn resize(&mut self, viewport: &Viewport) {
        if self.released {
            return;
        }
        self.canvas.set_width(viewport.width_px);
        self.canvas.set_height(viewport.height_px);
        self.gl
            .viewport(0, 0, viewport.width_px as i32, viewport.height_px as i32);
    }

    fn draw(&mut self, frame: &FrameUniforms<'_>) {
        if self.released {
            return;
        }
        let gl = &self.gl;
        let u = &self.uniforms;
        gl.use_program(Some(&self.linked.program));
        gl.uniform1f(Some(&u.time), frame.time);
        gl.uniform2f(Some(&u.resolution), frame.resolution[0], frame.resolution[1]);
        gl.uniform2fv_with_f32_array(Some(&u.ripple_pos), frame.ripples.positions());
        gl.uniform1fv_with_f32_array(Some(&u.ripple_time), frame.ripples.spawn_times());
        gl.uniform1i(Some(&u.ripple_count), frame.ripples.count() as i32);

        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let gl = &self.gl;
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vbo));
        self.linked.delete(gl);
        lose_context(gl);
    }
}

impl Drop for GlBackend {
    fn drop(&mut self) {
        self.release();
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> LayerResult<WebGlShader> {
    let stage = if kind == GL::VERTEX_SHADER {
        "vertex"
    } else {
        "fragment"
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(LayerError::ContextUnavailable)?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(LayerError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

fn link_program(gl: &GL, vs: &WebGlShader, fs: &WebGlShader) -> LayerResult<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or(LayerError::ContextUnavailable)?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);

    if !gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(LayerError::ProgramLink(log));
    }
    Ok(program)
}
