/// WGSL shader for lit instanced boxes (the plane is drawn as a flat box).
pub const BOX_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    // w > 0.5 when the spot light is in the scene.
    spot_position: vec4<f32>,
    // w = cosine of the cone half-angle.
    spot_direction: vec4<f32>,
    spot_color: vec4<f32>,
    // w = intensity, zero when the light is not in the scene.
    point_positions: array<vec4<f32>, 4>,
    // w = reach.
    point_colors: array<vec4<f32>, 4>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    // Model is rotation * scale, so dividing by the squared column lengths
    // before transforming matches the inverse transpose.
    let inv_scale_sq = vec3<f32>(
        1.0 / dot(instance.model_0.xyz, instance.model_0.xyz),
        1.0 / dot(instance.model_1.xyz, instance.model_1.xyz),
        1.0 / dot(instance.model_2.xyz, instance.model_2.xyz),
    );
    out.world_normal = (model * vec4<f32>(vertex.normal * inv_scale_sq, 0.0)).xyz;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    var light = uniforms.ambient.rgb;

    if (uniforms.spot_position.w > 0.5) {
        let l = normalize(uniforms.spot_position.xyz - in.world_position);
        if (dot(-l, uniforms.spot_direction.xyz) > uniforms.spot_direction.w) {
            light += uniforms.spot_color.rgb * max(dot(n, l), 0.0);
        }
    }

    for (var i = 0u; i < 4u; i = i + 1u) {
        let p = uniforms.point_positions[i];
        let c = uniforms.point_colors[i];
        let to_light = p.xyz - in.world_position;
        let falloff = clamp(1.0 - length(to_light) / c.w, 0.0, 1.0);
        light += c.rgb * p.w * falloff * max(dot(n, normalize(to_light)), 0.0);
    }

    return vec4<f32>(in.color.rgb * light, in.color.a);
}
"#;

/// WGSL shader for helper lines (axis marker, spot-light frustum).
pub const LINE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
