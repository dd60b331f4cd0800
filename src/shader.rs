//! GLSL ES 3.00 sources for the compositor quad.

/// Interleaved `(x, y, u, v)` for a full-screen triangle strip.
pub const QUAD_VERTICES: [f32; 16] = [
    -1.0, -1.0, 0.0, 0.0, //
    1.0, -1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0, 1.0, //
    1.0, 1.0, 1.0, 1.0,
];

pub const QUAD_STRIDE: i32 = 4 * 4;
pub const QUAD_UV_OFFSET: i32 = 2 * 4;
pub const QUAD_VERTEX_COUNT: i32 = 4;

pub const ATTR_POSITION: u32 = 0;
pub const ATTR_UV: u32 = 1;

pub const U_BASE: &str = "tBase";
pub const U_CHEST: &str = "tChest";
pub const U_MOUSE: &str = "uMouse";
pub const U_ZONE: &str = "uZone";
pub const U_BIAS: &str = "uBias";

pub const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec2 aPosition;
layout(location = 1) in vec2 aUv;
out vec2 vUv;

void main() {
    vUv = aUv;
    gl_Position = vec4(aPosition, 0.0, 1.0);
}
"#;

/// Fragment stage with the base parallax strength baked in as a literal.
///
/// The zone test uses the unshifted `vUv` so the cut line stays put while the
/// sampled images drift with the pointer.
pub fn fragment_shader(parallax_base: f32) -> String {
    format!(
        r#"#version 300 es
precision highp float;

in vec2 vUv;
out vec4 outColor;

uniform sampler2D tBase;
uniform sampler2D tChest;
uniform vec2 uMouse;
uniform vec4 uZone;
uniform float uBias;

bool insideZone(vec2 uv) {{
    return uv.x > uZone.x && uv.x < uZone.y &&
           uv.y > uZone.z && uv.y < uZone.w;
}}

void main() {{
    vec2 p = uMouse * ({parallax_base:.4} + uBias);
    if (insideZone(vUv)) {{
        outColor = vec4(texture(tChest, vUv + p).rgb, 1.0);
    }} else {{
        outColor = vec4(texture(tBase, vUv + p).rgb, 1.0);
    }}
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallax_base_is_a_float_literal() {
        let src = fragment_shader(0.02);
        assert!(src.contains("uMouse * (0.0200 + uBias)"));
        assert!(src.starts_with("#version 300 es"));
    }

    #[test]
    fn every_uniform_is_declared() {
        let src = fragment_shader(0.0);
        for name in [U_BASE, U_CHEST, U_MOUSE, U_ZONE, U_BIAS] {
            assert!(src.contains(&format!(" {name};")), "{name} missing");
        }
    }
}
