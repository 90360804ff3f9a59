use crate::device::DEPTH_FORMAT;
use crate::mesh::Vertex;
use crate::shader::ShaderProgram;

/// Straight (non-premultiplied) alpha blending.
fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Compiles `program` into a render pipeline.
///
/// The WGSL source must provide `vs_main` and `fs_main`, take [`Vertex`] at
/// locations 0..=2 and read its uniforms from `@group(0) @binding(0)`.
/// Parse and validation failures are captured and returned instead of
/// reaching the device's uncaptured-error handler.
pub(crate) fn build_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    uniforms: &wgpu::BindGroupLayout,
    program: &ShaderProgram,
) -> Result<wgpu::RenderPipeline, wgpu::Error> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = create_pipeline(device, surface_format, uniforms, program);

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(err),
        None => Ok(pipeline),
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    uniforms: &wgpu::BindGroupLayout,
    program: &ShaderProgram,
) -> wgpu::RenderPipeline {
    let label = format!("lucent {} shader", program.name());
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(program.source().into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&label),
        bind_group_layouts: &[uniforms],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        // LessEqual keeps draw order for coplanar geometry.
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::arena;
    use crate::render::testing::{noop_device, FLAT_WGSL};
    use crate::shader::{ShaderDesc, ShaderLibrary, UniformType};

    fn compile(source: &str) -> Result<wgpu::RenderPipeline, wgpu::Error> {
        let (device, _queue) = noop_device();
        let bgl = arena::bind_group_layout(&device);
        let mut lib = ShaderLibrary::new();
        let id = lib
            .register(ShaderDesc::new("case", source).uniform("u_tint", UniformType::Vec4))
            .unwrap();
        build_pipeline(&device, wgpu::TextureFormat::Rgba8UnormSrgb, &bgl, lib.get(id).unwrap())
    }

    #[test]
    fn valid_program_compiles() {
        assert!(compile(FLAT_WGSL).is_ok());
    }

    #[test]
    fn invalid_wgsl_is_returned_as_error() {
        let err = compile("this is not wgsl").unwrap_err();
        assert!(matches!(err, wgpu::Error::Validation { .. }), "{err}");
    }

    #[test]
    fn missing_entry_point_is_returned_as_error() {
        let source = FLAT_WGSL.replace("fn fs_main", "fn fs_other");
        assert!(compile(&source).is_err());
    }
}
