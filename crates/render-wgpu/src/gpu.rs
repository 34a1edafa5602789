use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use terrascroll_common::{Palette, Rgb, Transform};
use terrascroll_scene::{LightRig, SceneContext};
use terrascroll_terrain::{TerrainTileManager, TileMesh};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
    sky: [f32; 4],
    ground: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4, lights: &LightRig) -> Self {
        let dir = lights.directional.direction_to_light();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_dir: [dir.x, dir.y, dir.z, 0.0],
            light_color: lights
                .directional
                .color
                .scaled(lights.directional.intensity)
                .with_alpha(1.0),
            ambient: lights
                .ambient
                .color
                .scaled(lights.ambient.intensity)
                .with_alpha(1.0),
            sky: lights
                .hemisphere
                .sky
                .scaled(lights.hemisphere.intensity)
                .with_alpha(1.0),
            ground: lights
                .hemisphere
                .ground
                .scaled(lights.hemisphere.intensity)
                .with_alpha(1.0),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TerrainVertex {
    position: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct BoxVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(transform: &Transform, color: Rgb) -> Self {
        let cols = transform.matrix().to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: color.with_alpha(1.0),
        }
    }
}

const CHARACTER_COLOR: Rgb = Palette::LIGHT_CREAM;

/// Unit box vertices and indices for the character stand-in.
fn box_mesh() -> (Vec<BoxVertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        BoxVertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        BoxVertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        BoxVertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        BoxVertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        BoxVertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        BoxVertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        BoxVertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        BoxVertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        BoxVertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        BoxVertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        BoxVertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        BoxVertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        BoxVertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        BoxVertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        BoxVertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        BoxVertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        BoxVertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        BoxVertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        BoxVertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        BoxVertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        BoxVertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        BoxVertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        BoxVertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        BoxVertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

fn terrain_vertices(mesh: &TileMesh) -> Vec<TerrainVertex> {
    mesh.positions()
        .iter()
        .map(|p| TerrainVertex {
            position: p.to_array(),
        })
        .collect()
}

/// Per-frame instances: one per tile in id order, then the character.
fn frame_instances(scene: &SceneContext) -> Vec<InstanceData> {
    let terrain_color = scene.terrain_color();
    let mut instances: Vec<InstanceData> = scene
        .tile_transforms()
        .iter()
        .map(|t| InstanceData::new(t, terrain_color))
        .collect();
    instances.push(InstanceData::new(scene.character(), CHARACTER_COLOR));
    instances
}

fn clear_color(color: Rgb) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(color.r),
        g: f64::from(color.g),
        b: f64::from(color.b),
        a: 1.0,
    }
}

/// wgpu renderer for the terrain tiles and the character stand-in.
pub struct WgpuRenderer {
    terrain_pipeline: wgpu::RenderPipeline,
    box_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    tile_vertex_buffers: Vec<wgpu::Buffer>,
    tile_index_buffer: wgpu::Buffer,
    tile_index_count: u32,
    box_vertex_buffer: wgpu::Buffer,
    box_index_buffer: wgpu::Buffer,
    box_index_count: u32,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    /// Build pipelines and upload every tile mesh once.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        terrain: &TerrainTileManager,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::new(Mat4::IDENTITY, &LightRig::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                2 => Float32x4,
                3 => Float32x4,
                4 => Float32x4,
                5 => Float32x4,
                6 => Float32x4,
            ],
        };
        let color_targets = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let depth_stencil = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };

        // Terrain pipeline: both faces drawn, flat shading in the fragment stage.
        let terrain_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("terrain_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_terrain"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<TerrainVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    },
                    instance_layout.clone(),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_terrain"),
                compilation_options: Default::default(),
                targets: &color_targets,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let box_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("box_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_box"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BoxVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    instance_layout,
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_box"),
                compilation_options: Default::default(),
                targets: &color_targets,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Tile meshes: one vertex buffer per tile, indices shared (same grid).
        let tile_vertex_buffers: Vec<wgpu::Buffer> = terrain
            .tiles()
            .iter()
            .map(|tile| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(tile.name()),
                    contents: bytemuck::cast_slice(&terrain_vertices(tile.mesh())),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
            .collect();
        let tile_indices = terrain
            .tiles()
            .first()
            .map(|t| t.mesh().indices().to_vec())
            .unwrap_or_default();
        let tile_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tile_index_buffer"),
            contents: bytemuck::cast_slice(&tile_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let tile_index_count = tile_indices.len() as u32;

        let (box_verts, box_indices) = box_mesh();
        let box_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("box_vertex_buffer"),
            contents: bytemuck::cast_slice(&box_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let box_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("box_index_buffer"),
            contents: bytemuck::cast_slice(&box_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let box_index_count = box_indices.len() as u32;

        // Tiles plus the character; the tile count is fixed for the session.
        let instance_count = terrain.tile_count() + 1;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (instance_count * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::info!(
            tiles = tile_vertex_buffers.len(),
            vertices_per_tile = terrain.tiles().first().map(|t| t.mesh().vertex_count()),
            "terrain meshes uploaded"
        );

        Self {
            terrain_pipeline,
            box_pipeline,
            uniform_buffer,
            uniform_bind_group,
            tile_vertex_buffers,
            tile_index_buffer,
            tile_index_count,
            box_vertex_buffer,
            box_index_buffer,
            box_index_count,
            instance_buffer,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame. Only uniforms and instance transforms are written.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &SceneContext,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(
                scene.camera.view_projection(),
                scene.lights(),
            )),
        );

        let instances = frame_instances(scene);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        let character_instance = (instances.len() - 1) as u32;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.background())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            pass.set_pipeline(&self.terrain_pipeline);
            pass.set_index_buffer(self.tile_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            for (i, buffer) in self.tile_vertex_buffers.iter().enumerate() {
                let i = i as u32;
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw_indexed(0..self.tile_index_count, 0, i..i + 1);
            }

            pass.set_pipeline(&self.box_pipeline);
            pass.set_vertex_buffer(0, self.box_vertex_buffer.slice(..));
            pass.set_index_buffer(self.box_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(
                0..self.box_index_count,
                0,
                character_instance..character_instance + 1,
            );
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrascroll_scene::SceneConfig;
    use terrascroll_terrain::TerrainConfig;

    fn scene() -> SceneContext {
        SceneContext::new(SceneConfig {
            seed: Some(3),
            terrain: TerrainConfig {
                segments: 2,
                tile_length: 100.0,
                tile_width: 100.0,
                ..TerrainConfig::default()
            },
            ..SceneConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn uniform_block_is_std140_sized() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 144);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn instances_follow_tile_positions() {
        let mut scene = scene();
        scene.step(0.5);
        let instances = frame_instances(&scene);
        assert_eq!(instances.len(), 3);
        // Column 3 holds the translation.
        assert_eq!(instances[0].model_3, [0.0, -60.0, 30.0, 1.0]);
        assert_eq!(instances[1].model_3, [0.0, -60.0, -70.0, 1.0]);
        assert_eq!(instances[2].color, CHARACTER_COLOR.with_alpha(1.0));
    }

    #[test]
    fn terrain_vertices_mirror_mesh() {
        let scene = scene();
        let mesh = scene.terrain().tiles()[0].mesh();
        let verts = terrain_vertices(mesh);
        assert_eq!(verts.len(), mesh.vertex_count());
        assert_eq!(verts[4].position, mesh.positions()[4].to_array());
    }

    #[test]
    fn box_mesh_indices_in_range() {
        let (verts, indices) = box_mesh();
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }
}
