//! Shader stages and the programs linked from them.
//!
//! A [`ShaderStage`] owns one compiled `wgpu::ShaderModule`. A [`Program`]
//! collects stages, checks at [`Program::link`] that exactly one vertex and one
//! fragment stage are present, and keeps the linked modules so the stages may
//! be detached and dropped afterwards. Modules are looked up at link time, so a
//! stage may be attached before it is compiled. Render pipelines are created
//! from the linked modules on first use, one per [`PipelineKey`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ImportError, RenderError};
use crate::gfx::rendering::GpuContext;
use crate::gfx::resources::texture_resource::DEPTH_FORMAT;
use crate::gfx::resources::vertex_array::VertexLayout;

const SPIRV_MAGIC: u32 = 0x0723_0203;

static NEXT_STAGE_ID: AtomicU64 = AtomicU64::new(1);

/// A stage's compiled module, shared with every program it is attached to.
type ModuleSlot = Rc<RefCell<Option<wgpu::ShaderModule>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn default_entry_point(self) -> &'static str {
        match self {
            StageKind::Vertex => "vs_main",
            StageKind::Fragment => "fs_main",
        }
    }
}

/// Text for live editing, or a SPIR-V blob for shipped binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    Text(String),
    Binary(Vec<u8>),
}

impl ShaderSource {
    /// Reads `path`; files ending in `.spv` load as binary, anything else as text.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let io_error = |source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        };

        if path.extension().is_some_and(|ext| ext == "spv") {
            std::fs::read(path).map(ShaderSource::Binary).map_err(io_error)
        } else {
            std::fs::read_to_string(path)
                .map(ShaderSource::Text)
                .map_err(io_error)
        }
    }
}

/// One compiled shader stage.
#[derive(Debug)]
pub struct ShaderStage {
    id: u64,
    label: String,
    kind: StageKind,
    entry_point: String,
    source: Option<ShaderSource>,
    module: ModuleSlot,
}

impl ShaderStage {
    pub fn new(label: &str, kind: StageKind) -> Self {
        Self {
            id: NEXT_STAGE_ID.fetch_add(1, Ordering::Relaxed),
            label: label.to_owned(),
            kind,
            entry_point: kind.default_entry_point().to_owned(),
            source: None,
            module: ModuleSlot::default(),
        }
    }

    /// Replaces the source. A previously compiled module is discarded.
    pub fn source(&mut self, source: ShaderSource) -> &mut Self {
        self.source = Some(source);
        self.module.replace(None);
        self
    }

    pub fn with_entry_point(&mut self, entry_point: &str) -> &mut Self {
        self.entry_point = entry_point.to_owned();
        self
    }

    /// Creates the shader module from the current source.
    ///
    /// Errors carry the diagnostics reported by wgpu's validation.
    pub fn compile(&mut self, gpu: &GpuContext) -> Result<(), RenderError> {
        let source = match &self.source {
            Some(ShaderSource::Text(text)) => wgpu::ShaderSource::Wgsl(text.as_str().into()),
            Some(ShaderSource::Binary(bytes)) => {
                check_spirv(bytes).map_err(|log| self.compile_error(log))?;
                wgpu::util::make_spirv(bytes)
            }
            None => return Err(self.compile_error("no source set".to_owned())),
        };

        let module = gpu
            .validated(|device| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&self.label),
                    source,
                })
            })
            .map_err(|log| self.compile_error(log))?;

        log::debug!("compiled {:?} stage '{}'", self.kind, self.label);
        self.module.replace(Some(module));
        Ok(())
    }

    fn compile_error(&self, log: String) -> RenderError {
        log::error!("shader stage '{}' failed to compile:\n{log}", self.label);
        RenderError::ShaderCompile {
            label: self.label.clone(),
            log,
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_compiled(&self) -> bool {
        self.module.borrow().is_some()
    }
}

fn check_spirv(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() % 4 != 0 {
        return Err(format!("SPIR-V length {} is not a multiple of 4", bytes.len()));
    }
    let magic = bytes
        .get(..4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
    if magic != Some(SPIRV_MAGIC) {
        return Err("missing SPIR-V magic number".to_owned());
    }
    Ok(())
}

/// What a program remembers of an attached stage.
#[derive(Debug, Clone)]
struct AttachedStage {
    id: u64,
    label: String,
    kind: StageKind,
    entry_point: String,
    module: ModuleSlot,
}

impl From<&ShaderStage> for AttachedStage {
    fn from(stage: &ShaderStage) -> Self {
        Self {
            id: stage.id,
            label: stage.label.clone(),
            kind: stage.kind,
            entry_point: stage.entry_point.clone(),
            module: Rc::clone(&stage.module),
        }
    }
}

#[derive(Debug, Clone)]
struct LinkedStage {
    entry_point: String,
    module: wgpu::ShaderModule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Created,
    Linked,
}

/// Render state a pipeline is specialized for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub vertex_layout: VertexLayout,
    pub color_format: wgpu::TextureFormat,
    pub depth_test: bool,
    pub sample_count: u32,
    pub cull_mode: Option<wgpu::Face>,
}

/// A linkable set of shader stages.
#[derive(Debug)]
pub struct Program {
    label: String,
    attached: Vec<AttachedStage>,
    linked: Option<(LinkedStage, LinkedStage)>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl Program {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            attached: Vec::new(),
            linked: None,
            pipelines: HashMap::new(),
        }
    }

    pub fn attach(&mut self, stage: &ShaderStage) -> &mut Self {
        self.attached.retain(|attached| attached.id != stage.id);
        self.attached.push(AttachedStage::from(stage));
        self
    }

    pub fn detach(&mut self, stage: &ShaderStage) -> &mut Self {
        self.attached.retain(|attached| attached.id != stage.id);
        self
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn state(&self) -> ProgramState {
        if self.linked.is_some() {
            ProgramState::Linked
        } else {
            ProgramState::Created
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Links the attached stages.
    ///
    /// Requires exactly one compiled vertex stage and one compiled fragment
    /// stage. A failed link leaves the program unlinked.
    pub fn link(&mut self) -> Result<(), RenderError> {
        self.pipelines.clear();
        self.linked = None;

        let vertex = self.single_stage(StageKind::Vertex);
        let fragment = self.single_stage(StageKind::Fragment);

        match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => {
                log::info!("linked program '{}'", self.label);
                self.linked = Some((vertex, fragment));
                Ok(())
            }
            (vertex, fragment) => {
                let log = [vertex.err(), fragment.err()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("\n");
                Err(self.link_error(log))
            }
        }
    }

    fn single_stage(&self, kind: StageKind) -> Result<LinkedStage, String> {
        let mut stages = self.attached.iter().filter(|stage| stage.kind == kind);
        let stage = stages
            .next()
            .ok_or_else(|| format!("no {kind:?} stage attached"))?;
        if stages.next().is_some() {
            return Err(format!("more than one {kind:?} stage attached"));
        }
        let module = stage
            .module
            .borrow()
            .clone()
            .ok_or_else(|| format!("{kind:?} stage '{}' is not compiled", stage.label))?;
        Ok(LinkedStage {
            entry_point: stage.entry_point.clone(),
            module,
        })
    }

    fn link_error(&self, log: String) -> RenderError {
        log::error!("program '{}' failed to link:\n{log}", self.label);
        RenderError::ShaderLink {
            label: self.label.clone(),
            log,
        }
    }

    /// The render pipeline for `key`, created on first request.
    ///
    /// Interface mismatches between the stages, or between the vertex stage
    /// and the vertex layout, are reported here as link errors.
    pub fn pipeline(
        &mut self,
        gpu: &GpuContext,
        key: &PipelineKey,
    ) -> Result<&wgpu::RenderPipeline, RenderError> {
        if !self.pipelines.contains_key(key) {
            let pipeline = self.create_pipeline(gpu, key)?;
            self.pipelines.insert(key.clone(), pipeline);
        }
        self.pipelines
            .get(key)
            .ok_or_else(|| self.link_error("pipeline cache miss".to_owned()))
    }

    /// Makes the program current on `pass`, realizing the pipeline for `key` if needed.
    pub fn bind(
        &mut self,
        gpu: &GpuContext,
        key: &PipelineKey,
        pass: &mut wgpu::RenderPass<'_>,
    ) -> Result<(), RenderError> {
        let pipeline = self.pipeline(gpu, key)?;
        pass.set_pipeline(pipeline);
        Ok(())
    }

    fn create_pipeline(
        &self,
        gpu: &GpuContext,
        key: &PipelineKey,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        let (vertex, fragment) = self
            .linked
            .as_ref()
            .ok_or_else(|| self.link_error("program used before a successful link".to_owned()))?;

        let targets = [Some(wgpu::ColorTargetState {
            format: key.color_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let pipeline = gpu
            .validated(|device| {
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(&self.label),
                    // Bind group layouts are derived from the shaders.
                    layout: None,
                    vertex: wgpu::VertexState {
                        module: &vertex.module,
                        entry_point: Some(&vertex.entry_point),
                        buffers: &[key.vertex_layout.buffer_layout()],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &fragment.module,
                        entry_point: Some(&fragment.entry_point),
                        targets: &targets,
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: key.cull_mode,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: key.depth_test.then(|| wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState {
                        count: key.sample_count,
                        mask: !0,
                        alpha_to_coverage_enabled: false,
                    },
                    multiview: None,
                    cache: None,
                })
            })
            .map_err(|log| self.link_error(log))?;

        log::debug!(
            "program '{}': created pipeline for {:?} x{} depth={}",
            self.label,
            key.color_format,
            key.sample_count,
            key.depth_test
        );
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::SpriteVertex;
    use crate::gfx::rendering::gpu::tests::gpu;

    const VERTEX: &str = "
        @vertex
        fn vs_main(@location(0) position: vec2<f32>, @location(1) uv: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position + uv * 0.0, 0.0, 1.0);
        }
    ";

    const FRAGMENT: &str = "
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 1.0, 1.0);
        }
    ";

    fn key() -> PipelineKey {
        PipelineKey {
            vertex_layout: VertexLayout {
                stride: std::mem::size_of::<SpriteVertex>() as u64,
                attributes: SpriteVertex::attributes()
                    .into_iter()
                    .map(|a| wgpu::VertexAttribute {
                        format: a.format(),
                        offset: a.offset,
                        shader_location: a.location,
                    })
                    .collect(),
            },
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_test: false,
            sample_count: 1,
            cull_mode: None,
        }
    }

    #[test]
    fn linking_without_stages_fails() {
        let mut program = Program::new("empty");
        let err = program.link().expect_err("nothing attached");
        let log = err.log().expect("link log");
        assert!(log.contains("no Vertex stage"));
        assert!(log.contains("no Fragment stage"));
        assert_eq!(program.state(), ProgramState::Created);
    }

    #[test]
    fn linking_a_vertex_stage_alone_fails() {
        // No device needed: the missing fragment stage is reported either way.
        let stage = ShaderStage::new("sprite_vert", StageKind::Vertex);
        let mut program = Program::new("sprite");
        program.attach(&stage);

        let err = program.link().expect_err("fragment stage missing");
        assert!(matches!(err, RenderError::ShaderLink { .. }));
        assert!(err.log().is_some_and(|log| log.contains("no Fragment stage")));
    }

    #[test]
    fn uncompiled_stages_do_not_link() {
        let vertex = ShaderStage::new("v", StageKind::Vertex);
        let fragment = ShaderStage::new("f", StageKind::Fragment);
        let mut program = Program::new("p");
        program.attach(&vertex).attach(&fragment);

        let err = program.link().expect_err("not compiled");
        assert!(err.log().is_some_and(|log| log.contains("is not compiled")));
    }

    #[test]
    fn detach_removes_only_that_stage() {
        let a = ShaderStage::new("a", StageKind::Vertex);
        let b = ShaderStage::new("b", StageKind::Fragment);
        let mut program = Program::new("p");
        program.attach(&a).attach(&b).attach(&a);
        assert_eq!(program.attached_count(), 2);

        program.detach(&a);
        assert_eq!(program.attached_count(), 1);
    }

    #[test]
    fn compile_without_source_fails() {
        let Some(gpu) = gpu() else { return };
        let mut stage = ShaderStage::new("blank", StageKind::Vertex);
        assert!(matches!(stage.compile(&gpu), Err(RenderError::ShaderCompile { .. })));
    }

    #[test]
    fn invalid_spirv_is_rejected_before_the_driver() {
        assert!(check_spirv(&[1, 2, 3]).is_err());
        assert!(check_spirv(&[0, 0, 0, 0]).is_err());
        assert!(check_spirv(&SPIRV_MAGIC.to_le_bytes()).is_ok());
    }

    /// SPIR-V for a WGSL module, as an offline shader compiler would emit it.
    fn spirv_bytes(wgsl: &str) -> Vec<u8> {
        let module = naga::front::wgsl::parse_str(wgsl).expect("valid WGSL");
        let info = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("module validates");
        let options = naga::back::spv::Options::default();
        let words =
            naga::back::spv::write_vec(&module, &info, &options, None).expect("SPIR-V output");
        bytemuck::cast_slice::<u32, u8>(&words).to_vec()
    }

    fn scratch_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("playground-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).expect("write scratch file");
        path
    }

    #[test]
    fn source_files_dispatch_on_extension() {
        let binary = spirv_bytes(FRAGMENT);
        let spv = scratch_file("dispatch.spv", &binary);
        let wgsl = scratch_file("dispatch.wgsl", FRAGMENT.as_bytes());

        assert_eq!(ShaderSource::from_file(&spv).expect("spv"), ShaderSource::Binary(binary));
        assert_eq!(
            ShaderSource::from_file(&wgsl).expect("wgsl"),
            ShaderSource::Text(FRAGMENT.to_owned())
        );
        assert!(matches!(
            ShaderSource::from_file(std::env::temp_dir().join("playground-missing.spv")),
            Err(ImportError::Io { .. })
        ));

        let _ = std::fs::remove_file(spv);
        let _ = std::fs::remove_file(wgsl);
    }

    #[test]
    fn precompiled_binaries_link() {
        let Some(gpu) = gpu() else { return };

        let vertex_path = scratch_file("sprite.vert.spv", &spirv_bytes(VERTEX));
        let fragment_path = scratch_file("sprite.frag.spv", &spirv_bytes(FRAGMENT));

        let mut vertex = ShaderStage::new("vert.spv", StageKind::Vertex);
        vertex.source(ShaderSource::from_file(&vertex_path).expect("vertex binary"));
        vertex.compile(&gpu).expect("vertex binary compiles");

        let mut fragment = ShaderStage::new("frag.spv", StageKind::Fragment);
        fragment.source(ShaderSource::from_file(&fragment_path).expect("fragment binary"));
        fragment.compile(&gpu).expect("fragment binary compiles");

        let mut program = Program::new("sprite.spv");
        program.attach(&vertex).attach(&fragment);
        program.link().expect("binary stages link");
        assert!(program.pipeline(&gpu, &key()).is_ok());

        let _ = std::fs::remove_file(vertex_path);
        let _ = std::fs::remove_file(fragment_path);
    }

    #[test]
    fn stages_compiled_after_attach_link() {
        let Some(gpu) = gpu() else { return };

        let mut vertex = ShaderStage::new("late.vert", StageKind::Vertex);
        let mut fragment = ShaderStage::new("late.frag", StageKind::Fragment);
        let mut program = Program::new("late");
        program.attach(&vertex).attach(&fragment);
        assert!(program.link().is_err());

        vertex.source(ShaderSource::Text(VERTEX.to_owned()));
        vertex.compile(&gpu).expect("vertex compiles");
        fragment.source(ShaderSource::Text(FRAGMENT.to_owned()));
        fragment.compile(&gpu).expect("fragment compiles");

        program.link().expect("modules are picked up at link");
        assert_eq!(program.state(), ProgramState::Linked);
    }

    #[test]
    fn compile_reports_diagnostics() {
        let Some(gpu) = gpu() else { return };
        let mut stage = ShaderStage::new("broken", StageKind::Fragment);
        stage.source(ShaderSource::Text("fn fs_main( {".to_owned()));

        let err = stage.compile(&gpu).expect_err("syntax error");
        assert!(err.log().is_some_and(|log| !log.is_empty()));
        assert!(!stage.is_compiled());
    }

    #[test]
    fn relink_with_fragment_stage_succeeds() {
        let Some(gpu) = gpu() else { return };

        let mut vertex = ShaderStage::new("vert", StageKind::Vertex);
        vertex.source(ShaderSource::Text(VERTEX.to_owned()));
        vertex.compile(&gpu).expect("vertex compiles");

        let mut program = Program::new("sprite");
        program.attach(&vertex);
        assert!(program.link().is_err());

        let mut fragment = ShaderStage::new("frag", StageKind::Fragment);
        fragment.source(ShaderSource::Text(FRAGMENT.to_owned()));
        fragment.compile(&gpu).expect("fragment compiles");

        program.attach(&fragment);
        program.link().expect("relink succeeds");
        assert_eq!(program.state(), ProgramState::Linked);

        // Stages may go away once linked.
        program.detach(&vertex).detach(&fragment);
        drop(vertex);
        drop(fragment);
        assert_eq!(program.attached_count(), 0);

        assert!(program.pipeline(&gpu, &key()).is_ok());
    }
}
