pub mod batch;
pub mod pipeline;
pub mod texture;

use std::sync::Arc;

use log::{debug, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use batch::{SpriteBatch, TextureId};
use pipeline::{QuadPipeline, create_quad_pipeline};
use texture::GpuTexture;

use crate::assets::SpriteImage;
use crate::camera::CameraUniform;
use crate::engine::TextureUploader;
use crate::error::RenderError;

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: QuadPipeline,
    /// Camera view-projection buffer, rewritten every frame.
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    /// Uploaded textures; `TextureId(n)` indexes this list. Slot 0 is white.
    textures: Vec<GpuTexture>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| RenderError::Adapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| RenderError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_quad_pipeline(&device, format);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::cast_slice(&[crate::camera::Camera::new(1.0, 1.0).build_view_proj()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let white = GpuTexture::from_image(
            &device,
            &queue,
            &pipeline.texture_bind_group_layout,
            "white",
            &SpriteImage::solid(1, 1, [255, 255, 255, 255]),
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            camera_buffer,
            camera_bind_group,
            textures: vec![white],
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`).
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload a new camera view-projection matrix to the GPU.
    /// Call once per frame before `render`.
    pub fn update_camera(&mut self, uniform: &CameraUniform) {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(std::slice::from_ref(uniform)),
        );
    }

    /// Render one frame: clear to black, then every draw call of `batch` in
    /// submission order.
    pub fn render(&mut self, batch: &SpriteBatch) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Vertex buffers must outlive the render pass that references them.
        let buffers: Vec<(TextureId, wgpu::Buffer, u32)> = batch
            .calls()
            .iter()
            .filter(|call| !call.vertices.is_empty())
            .map(|call| {
                let buf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("quad_vertex_buffer"),
                    contents: bytemuck::cast_slice(&call.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                (call.texture, buf, call.vertices.len() as u32)
            })
            .collect();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("world_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.pipeline.render_pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for (texture, buf, count) in &buffers {
                let Some(gpu) = self.textures.get(texture.0 as usize) else {
                    warn!("[Renderer] Unknown texture id {}; skipping draw", texture.0);
                    continue;
                };
                pass.set_bind_group(1, &gpu.bind_group, &[]);
                pass.set_vertex_buffer(0, buf.slice(..));
                pass.draw(0..*count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl TextureUploader for Renderer {
    fn upload(&mut self, label: &str, image: &SpriteImage) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        let texture = if image.width == 0 || image.height == 0 {
            warn!("[Renderer] Texture '{label}' is empty; uploading a blank pixel instead");
            GpuTexture::from_image(
                &self.device,
                &self.queue,
                &self.pipeline.texture_bind_group_layout,
                label,
                &SpriteImage::solid(1, 1, [0, 0, 0, 0]),
            )
        } else {
            GpuTexture::from_image(
                &self.device,
                &self.queue,
                &self.pipeline.texture_bind_group_layout,
                label,
                image,
            )
        };
        debug!("[Renderer] Uploaded '{label}' ({}x{}) as texture {}", texture.width, texture.height, id.0);
        self.textures.push(texture);
        id
    }
}
