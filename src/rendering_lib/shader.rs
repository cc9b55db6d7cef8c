// src/rendering_lib/shader.rs

pub const WGSL_SHADER_SOURCE: &str = r#"
struct Viewport {
    size: vec2<f32>,
    _padding: vec2<f32>, // uniform buffers are 16-byte aligned on webgl2
}

@group(0) @binding(0)
var<uniform> viewport: Viewport;

struct VertexInput {
    @location(0) position: vec2<f32>, // physical pixels, origin top-left
    @location(1) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(model: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.color = model.color;
    let ndc_x = model.position.x / (viewport.size.x * 0.5) - 1.0;
    let ndc_y = 1.0 - model.position.y / (viewport.size.y * 0.5);
    out.clip_position = vec4<f32>(ndc_x, ndc_y, 0.0, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
