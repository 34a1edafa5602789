/// WGSL for terrain tiles (flat shaded) and the character stand-in box.
///
/// Both passes share one uniform block: view-projection plus the light rig.
/// Light colours arrive pre-multiplied by intensity.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
    sky: vec4<f32>,
    ground: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

fn instance_model(m0: vec4<f32>, m1: vec4<f32>, m2: vec4<f32>, m3: vec4<f32>) -> mat4x4<f32> {
    return mat4x4<f32>(m0, m1, m2, m3);
}

fn shade(base: vec3<f32>, normal: vec3<f32>) -> vec3<f32> {
    let hemi = mix(uniforms.ground.rgb, uniforms.sky.rgb, normal.y * 0.5 + 0.5);
    let diffuse = max(dot(normal, normalize(uniforms.light_dir.xyz)), 0.0);
    let light = uniforms.ambient.rgb + hemi + uniforms.light_color.rgb * diffuse;
    return base * light;
}

// --- terrain tiles ---

struct TerrainOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_terrain(@location(0) position: vec3<f32>, instance: InstanceInput) -> TerrainOutput {
    let world_pos = instance_model(instance.model_0, instance.model_1, instance.model_2, instance.model_3) * vec4<f32>(position, 1.0);
    var out: TerrainOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_terrain(in: TerrainOutput) -> @location(0) vec4<f32> {
    // Face normal from screen-space derivatives; always faces the viewer.
    let normal = normalize(cross(dpdy(in.world_pos), dpdx(in.world_pos)));
    return vec4<f32>(shade(in.color.rgb, normal), in.color.a);
}

// --- character stand-in ---

struct BoxVertex {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct BoxOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_box(vertex: BoxVertex, instance: InstanceInput) -> BoxOutput {
    let model = instance_model(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    var out: BoxOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_box(in: BoxOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(shade(in.color.rgb, normalize(in.world_normal)), in.color.a);
}
"#;
