//! The sandbox application context.
//!
//! [`Sandbox`] owns every resource the frame loop touches. Platforms create
//! one after the GPU context exists and call [`Sandbox::frame`] once per
//! redraw.

use anyhow::Context as _;
use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3};

use crate::config::AppConfig;
use crate::error::RenderError;
use crate::gfx::camera::Camera;
use crate::gfx::geometry::{
    cube, cylinder, quad, CombinedGeometry, DiffuseVertex, MeshGeometry, SpriteVertex, Submesh,
};
use crate::gfx::rendering::{
    Capability, ClearMask, DrawCall, Frame, GpuContext, RenderPass, RenderTargets,
};
use crate::gfx::resources::{
    Buffer, BufferTarget, BufferUsage, Light, Material, MatrixBlock, Matrices, Program,
    ShaderSource, ShaderStage, StageKind, Texture, TextureParameter, VertexArray, VertexAttribute,
};
use crate::gfx::Transform;
use crate::importer::{MeshImporter, PixelData, TextureImporter};
use crate::physics::{CollisionWorld, RayHit};
use crate::platform::{Input, Key, MouseButton, Window};
use crate::time::Time;
use crate::ui::{
    CameraWindow, Editor, EditorTargets, FrameStats, LightWindow, MaterialWindow,
    RenderPassWindow, StatsWindow, TextureWindow,
};

const DIFFUSE_VERTEX: &str = include_str!("../shaders/diffuse.vert.wgsl");
const DIFFUSE_FRAGMENT: &str = include_str!("../shaders/diffuse.frag.wgsl");
const SPRITE_VERTEX: &str = include_str!("../shaders/sprite.vert.wgsl");
const SPRITE_FRAGMENT: &str = include_str!("../shaders/sprite.frag.wgsl");

const MATRICES_LOCATION: u32 = 0;
const MATERIAL_LOCATION: u32 = 1;
const LIGHT_LOCATION: u32 = 2;

const CUBE_COLLIDER: u32 = 1;
const PICK_DISTANCE: f32 = 50.0;
const SPRITE_SIZE: f32 = 256.0;

/// Compiles both stages, links them and detaches them again.
fn build_program(
    gpu: &GpuContext,
    label: &str,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<Program, RenderError> {
    let mut vertex = ShaderStage::new(&format!("{label}.vert"), StageKind::Vertex);
    vertex.source(ShaderSource::Text(vertex_source.to_owned()));
    vertex.compile(gpu)?;

    let mut fragment = ShaderStage::new(&format!("{label}.frag"), StageKind::Fragment);
    fragment.source(ShaderSource::Text(fragment_source.to_owned()));
    fragment.compile(gpu)?;

    let mut program = Program::new(label);
    program.attach(&vertex).attach(&fragment);
    program.link()?;
    program.detach(&vertex).detach(&fragment);
    Ok(program)
}

/// Vertex array over freshly uploaded `geometry`.
fn upload_geometry<V: bytemuck::Pod>(
    gpu: &GpuContext,
    label: &str,
    geometry: &MeshGeometry<V>,
    attributes: &[VertexAttribute],
) -> VertexArray {
    let mut vertices = Buffer::new(
        &format!("{label} vertices"),
        BufferTarget::Vertex,
        BufferUsage::Static,
    );
    vertices.data_of(gpu, geometry.vertices());
    let mut indices = Buffer::new(
        &format!("{label} indices"),
        BufferTarget::Index,
        BufferUsage::Static,
    );
    indices.data_of(gpu, geometry.faces());

    let mut array = VertexArray::new(label);
    array.attach_vertex_buffer(vertices).attach_index_buffer(indices);
    array.init_attributes_of_type::<V>(attributes);
    array
}

/// `data` on first use, `sub_data` afterwards.
fn upload_uniform<T: bytemuck::Pod>(gpu: &GpuContext, buffer: &mut Buffer, value: &T) {
    if buffer.raw().is_none() {
        buffer.data_of(gpu, std::slice::from_ref(value));
    } else {
        buffer.sub_data_of(gpu, value, 0);
    }
}

fn uniform_buffer(label: &str, location: u32) -> Buffer {
    let mut buffer = Buffer::new(label, BufferTarget::Uniform, BufferUsage::Dynamic);
    buffer.bind_at_location(location);
    buffer
}

/// Explicit application context: every resource the frame loop uses.
pub struct Sandbox {
    diffuse_program: Program,
    sprite_program: Program,

    objects: VertexArray,
    submeshes: Vec<Submesh>,
    square: VertexArray,
    square_submesh: Submesh,
    colliders: VertexArray,

    matrices: MatrixBlock,
    material_buffer: Buffer,
    light_buffer: Buffer,

    cube_material: Material,
    cylinder_material: Material,
    collider_material: Material,
    light: Light,
    texture: Texture,

    perspective_camera: Camera,
    ortho_camera: Camera,
    perspective_camera_transform: Transform,
    ortho_camera_transform: Transform,
    camera_position: Vector3<f32>,

    cube_transform: Transform,
    cylinder_transform: Transform,
    square_transform: Transform,
    cube_position: Vector3<f32>,

    physics: CollisionWorld,
    render_pass: RenderPass,
    targets: RenderTargets,
    time: Time,

    editor: Option<Editor>,
    show_colliders: bool,
    last_hit: Option<RayHit>,
    last_draw_calls: u32,
}

impl Sandbox {
    /// Creates every resource. Shader and asset failures abort startup.
    pub fn new(
        gpu: &GpuContext,
        config: &AppConfig,
        color_format: wgpu::TextureFormat,
    ) -> anyhow::Result<Self> {
        let diffuse_program = build_program(gpu, "diffuse", DIFFUSE_VERTEX, DIFFUSE_FRAGMENT)
            .context("building the diffuse program")?;
        let sprite_program = build_program(gpu, "sprite", SPRITE_VERTEX, SPRITE_FRAGMENT)
            .context("building the sprite program")?;

        let mut meshes = match &config.mesh_path {
            Some(path) => MeshImporter::load(path).context("loading meshes")?,
            None => Vec::new(),
        };
        meshes.extend([cube(2.0), cylinder(1.0, 2.0, 32)]);
        meshes.truncate(2);

        let combined = CombinedGeometry::combine(&meshes.iter().collect::<Vec<_>>());
        let objects = upload_geometry(
            gpu,
            "objects",
            combined.geometry(),
            &DiffuseVertex::attributes(),
        );
        let submeshes = combined.submeshes().to_vec();

        let square_geometry = quad(SPRITE_SIZE, SPRITE_SIZE);
        let square = upload_geometry(gpu, "square", &square_geometry, &SpriteVertex::attributes());
        let square_submesh = Submesh::whole(&square_geometry);

        let mut colliders = VertexArray::new("colliders");
        colliders
            .attach_vertex_buffer(Buffer::new(
                "collider vertices",
                BufferTarget::Vertex,
                BufferUsage::Dynamic,
            ))
            .attach_index_buffer(Buffer::new(
                "collider indices",
                BufferTarget::Index,
                BufferUsage::Dynamic,
            ));
        colliders.init_attributes_of_type::<DiffuseVertex>(&DiffuseVertex::attributes());

        let mut pixels = match &config.texture_path {
            Some(path) => TextureImporter::load(path).context("loading the sprite texture")?,
            None => PixelData::checker(256, 256, [180, 80, 60], [220, 210, 200]),
        };
        let mut texture = Texture::new("bricks");
        texture.source(gpu, &pixels);
        texture
            .parameter(TextureParameter::MinFilter(wgpu::FilterMode::Linear))
            .parameter(TextureParameter::MagFilter(wgpu::FilterMode::Linear));
        pixels.release();

        let mut render_pass = RenderPass::new(ClearMask::COLOR | ClearMask::DEPTH);
        render_pass
            .enable(Capability::DepthTest)
            .enable(Capability::Multisample)
            .clear_color(0.45, 0.55, 0.60);

        let camera_position = Vector3::new(0.0, 0.0, -12.0);
        let mut perspective_camera_transform = Transform::default();
        perspective_camera_transform.translate(camera_position);

        let cube_position = Vector3::new(-2.0, 0.0, 0.0);
        let mut cylinder_transform = Transform::default();
        cylinder_transform.translate(Vector3::new(2.0, 0.0, 0.0));
        let mut square_transform = Transform::default();
        square_transform.translate(Vector3::new(SPRITE_SIZE * 0.5, SPRITE_SIZE * 0.5, 0.0));

        let mut physics = CollisionWorld::new();
        physics.add_collision(CUBE_COLLIDER, Vector3::new(1.0, 1.0, 1.0), cube_position);

        let aspect = config.width as f32 / config.height.max(1) as f32;

        log::info!(
            "sandbox ready: {} objects, {}x{} texture",
            submeshes.len(),
            texture.size().0,
            texture.size().1
        );

        Ok(Self {
            diffuse_program,
            sprite_program,
            objects,
            submeshes,
            square,
            square_submesh,
            colliders,
            matrices: MatrixBlock::new("matrices", MATRICES_LOCATION),
            material_buffer: uniform_buffer("material", MATERIAL_LOCATION),
            light_buffer: uniform_buffer("light", LIGHT_LOCATION),
            cube_material: Material::new([1.0, 1.0, 0.0]),
            cylinder_material: Material::new([0.0, 1.0, 0.0]),
            collider_material: Material::new([1.0, 0.0, 0.0]),
            light: Light::new([0.0, 0.0, 5.0], [1.0, 1.0, 1.0]),
            texture,
            perspective_camera: Camera::perspective(60.0, aspect),
            ortho_camera: Camera::screen_ortho(),
            perspective_camera_transform,
            ortho_camera_transform: Transform::default(),
            camera_position,
            cube_transform: Transform::default(),
            cylinder_transform,
            square_transform,
            cube_position,
            physics,
            render_pass,
            targets: RenderTargets::new(color_format),
            time: Time::new(),
            editor: None,
            show_colliders: false,
            last_hit: None,
            last_draw_calls: 0,
        })
    }

    /// Installs the editor overlay with the default windows.
    pub fn attach_editor(&mut self, mut editor: Editor) {
        editor
            .add_window(Box::new(LightWindow))
            .add_window(Box::new(MaterialWindow))
            .add_window(Box::new(TextureWindow))
            .add_window(Box::new(CameraWindow))
            .add_window(Box::new(RenderPassWindow))
            .add_window(Box::new(StatsWindow));
        self.editor = Some(editor);
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.editor.as_mut()
    }

    pub fn last_hit(&self) -> Option<RayHit> {
        self.last_hit
    }

    pub fn frame_index(&self) -> u64 {
        self.time.frame_index()
    }

    /// Casts a ray through the pixel `point` of the perspective view.
    pub fn pick(&mut self, point: Vector2<f32>) -> Option<RayHit> {
        let ray = self
            .perspective_camera
            .screen_to_world(self.perspective_camera_transform.matrix(), point);
        let hit = self.physics.cast(&ray, PICK_DISTANCE);
        if let Some(hit) = hit {
            log::info!("hit collider {} at {:?}", hit.id, hit.point);
            self.last_hit = Some(hit);
        }
        hit
    }

    /// Runs one frame into `view`.
    pub fn frame(
        &mut self,
        gpu: &GpuContext,
        window: &mut dyn Window,
        input: &dyn Input,
        view: &wgpu::TextureView,
    ) -> Result<(), RenderError> {
        self.time.tick();
        let total_time = self.time.total_time();

        let (width, height) = window.size();
        if width == 0 || height == 0 {
            window.update();
            return Ok(());
        }
        self.perspective_camera.resize(width as f32, height as f32);
        self.ortho_camera.resize(width as f32, height as f32);

        if input.mouse_pressed(MouseButton::Left) {
            self.pick(input.mouse_position());
        }
        if input.key_pressed(Key::Escape) {
            window.close();
        }

        self.update_editor(width, height, total_time);

        self.render_pass.viewport([0, 0], [width, height]);
        self.targets
            .prepare(gpu, width, height, self.render_pass.sample_count());

        let mut frame = Frame::new(gpu, view, &self.targets, &self.render_pass);
        self.render_pass.clear_buffers(&mut frame);

        self.matrices.upload_all(
            gpu,
            &Matrices::new(
                self.square_transform.matrix(),
                self.ortho_camera_transform.matrix(),
                self.ortho_camera.projection(),
            ),
        );
        frame.draw(
            &mut self.sprite_program,
            DrawCall::new(&self.square, self.square_submesh, &[self.matrices.buffer()])
                .with_texture(&mut self.texture),
        )?;

        self.cube_transform
            .translate(self.cube_position)
            .rotate(Vector3::unit_y(), total_time);

        let view_matrix = self.perspective_camera_transform.matrix();
        let projection = self.perspective_camera.projection();
        self.matrices.upload_all(
            gpu,
            &Matrices::new(self.cube_transform.matrix(), view_matrix, projection),
        );
        upload_uniform(gpu, &mut self.material_buffer, &self.cube_material);
        upload_uniform(gpu, &mut self.light_buffer, &self.light);

        let uniforms = [
            self.matrices.buffer(),
            &self.material_buffer,
            &self.light_buffer,
        ];
        if let Some(&cube) = self.submeshes.first() {
            frame.draw(
                &mut self.diffuse_program,
                DrawCall::new(&self.objects, cube, &uniforms),
            )?;
        }

        if let Some(&cylinder) = self.submeshes.get(1) {
            self.matrices.upload_model(gpu, self.cylinder_transform.matrix());
            self.material_buffer
                .sub_data_of(gpu, &self.cylinder_material, 0);
            frame.draw(
                &mut self.diffuse_program,
                DrawCall::new(&self.objects, cylinder, &uniforms),
            )?;
        }

        if self.show_colliders {
            let geometry = self.physics.compute_debug_geometry();
            if let Some(vertices) = self.colliders.vertex_buffer_mut() {
                vertices.data_of(gpu, geometry.vertices());
            }
            if let Some(indices) = self.colliders.index_buffer_mut() {
                indices.data_of(gpu, geometry.faces());
            }
            self.matrices.upload_model(gpu, Matrix4::identity());
            self.material_buffer
                .sub_data_of(gpu, &self.collider_material, 0);
            frame.draw(
                &mut self.diffuse_program,
                DrawCall::new(&self.colliders, Submesh::whole(&geometry), &uniforms),
            )?;
        }

        if let Some(editor) = self.editor.as_mut() {
            editor.draw(&mut frame);
        }

        self.last_draw_calls = frame.draw_count();
        window.update();
        Ok(())
    }

    fn update_editor(&mut self, width: u32, height: u32, total_time: f32) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.begin(width, height, total_time);
        editor.end(EditorTargets {
            light: &mut self.light,
            material: &mut self.cube_material,
            camera: &mut self.perspective_camera,
            camera_transform: &mut self.perspective_camera_transform,
            camera_position: &mut self.camera_position,
            render_pass: &mut self.render_pass,
            texture: &mut self.texture,
            show_colliders: &mut self.show_colliders,
            stats: FrameStats {
                delta: self.time.delta(),
                total_time,
                frame_index: self.time.frame_index(),
                draw_calls: self.last_draw_calls,
                last_hit: self.last_hit,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::gpu::tests::gpu;
    use crate::platform::{HeadlessWindow, InputState};

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    fn sandbox(gpu: &GpuContext) -> Sandbox {
        let config = AppConfig::default().with_size(320, 240).with_editor(false);
        Sandbox::new(gpu, &config, FORMAT).expect("sandbox")
    }

    fn target(gpu: &GpuContext) -> wgpu::TextureView {
        gpu.device()
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("target"),
                size: wgpu::Extent3d {
                    width: 320,
                    height: 240,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    #[test]
    fn picking_hits_the_cube_collider() {
        let Some(gpu) = gpu() else { return };
        let mut sandbox = sandbox(&gpu);
        sandbox.perspective_camera.resize(320.0, 240.0);

        // The cube sits 2 units left of centre, 12 units in front of the camera.
        let hit = sandbox
            .pick(Vector2::new(125.0, 120.0))
            .expect("ray passes through the cube");
        assert_eq!(hit.id, CUBE_COLLIDER);
        assert_eq!(sandbox.last_hit(), Some(hit));

        assert!(sandbox.pick(Vector2::new(160.0, 10.0)).is_none());
        assert_eq!(sandbox.last_hit(), Some(hit));
    }

    #[test]
    fn escape_closes_the_window() {
        let Some(gpu) = gpu() else { return };
        let mut sandbox = sandbox(&gpu);
        let view = target(&gpu);
        let mut window = HeadlessWindow::new(320, 240, 100);
        let mut input = InputState::new();

        sandbox.frame(&gpu, &mut window, &input, &view).expect("frame");
        assert!(!window.closed());

        input.set_key(Key::Escape, true);
        sandbox.frame(&gpu, &mut window, &input, &view).expect("frame");
        assert!(window.closed());
        assert_eq!(sandbox.frame_index(), 2);
    }

    #[test]
    fn collider_overlay_adds_a_draw() {
        let Some(gpu) = gpu() else { return };
        let mut sandbox = sandbox(&gpu);
        let view = target(&gpu);
        let mut window = HeadlessWindow::new(320, 240, 100);
        let input = InputState::new();

        sandbox.frame(&gpu, &mut window, &input, &view).expect("frame");
        assert_eq!(sandbox.last_draw_calls, 3);

        sandbox.show_colliders = true;
        sandbox.frame(&gpu, &mut window, &input, &view).expect("frame");
        assert_eq!(sandbox.last_draw_calls, 4);
    }
}
