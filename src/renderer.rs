use std::{path::PathBuf, ptr, time::Instant};

use anyhow::Result;
use gl::types::{GLint, GLsizei};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    buffer::{Buffer, VertexArray},
    context::Context,
    polygon::Mesh,
    shader::{Pipeline, ShaderProgram, ShaderSources, Stage},
    utils::check_gl_error,
};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 800;
pub const TITLE: &str = "TP - From Scratch";
pub const CLEAR_COLOR: [f32; 4] = [1., 1., 1., 1.];
pub const TIME_UNIFORM: &str = "time";

pub const DEFAULT_VERTEX_COUNT: usize = 30;
pub const DEFAULT_RADIUS: f32 = 0.5;
pub const DEFAULT_SPEED: f32 = 2.;

pub struct Options {
    pub vertex_count: usize,
    pub radius: f32,
    pub speed: f32,
    pub shader_dir: Option<PathBuf>,
    pub vsync: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            vertex_count: DEFAULT_VERTEX_COUNT,
            radius: DEFAULT_RADIUS,
            speed: DEFAULT_SPEED,
            shader_dir: None,
            vsync: true,
        }
    }
}

#[derive(Default)]
pub struct Renderer {
    pub options: Options,
    pub error: Option<anyhow::Error>,

    // dropped before the window it draws into
    ctx: Option<Context>,
    window: Option<Window>,

    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: GLsizei,
    vertex_array: VertexArray,

    vertex_program: ShaderProgram,
    fragment_program: ShaderProgram,
    pipeline: Pipeline,
    time_location: Option<GLint>,

    start: Option<Instant>,
}

impl Renderer {
    pub fn new(options: Options) -> Self {
        let mut renderer = Self::default();
        renderer.options = options;
        renderer
    }

    fn init(&mut self) -> Result<()> {
        unsafe {
            let [r, g, b, a] = CLEAR_COLOR;
            gl::ClearColor(r, g, b, a);
        }

        self.create_buffers()?;
        self.create_pipeline()?;
        check_gl_error()?;

        self.time_location = self.vertex_program.uniform_location(TIME_UNIFORM)?;
        self.start = Some(Instant::now());

        Ok(())
    }

    fn create_buffers(&mut self) -> Result<()> {
        let mesh = Mesh::fan(self.options.vertex_count, self.options.radius)?;

        self.vertex_buffer = Buffer::new(&mesh.vertices)?;
        self.index_buffer = Buffer::new(&mesh.indices)?;
        self.index_count = GLsizei::try_from(mesh.index_count())?;
        self.vertex_array = VertexArray::new(&self.vertex_buffer, &self.index_buffer);

        log::debug!(
            "Uploaded {} vertices ({} bytes) and {} triangles ({} bytes)",
            mesh.vertices.len(),
            self.vertex_buffer.size(),
            mesh.indices.len(),
            self.index_buffer.size()
        );

        Ok(())
    }

    fn create_pipeline(&mut self) -> Result<()> {
        let sources = match &self.options.shader_dir {
            Some(dir) => ShaderSources::load(dir)?,
            None => ShaderSources::embedded(),
        };

        self.vertex_program = ShaderProgram::new(Stage::Vertex, &sources.vertex)?;
        self.fragment_program = ShaderProgram::new(Stage::Fragment, &sources.fragment)?;
        self.pipeline = Pipeline::new(&self.vertex_program, &self.fragment_program)?;

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let Some(ctx) = self.ctx.as_ref() else {
            return Ok(());
        };

        let elapsed = self.start.map_or(0., |start| start.elapsed().as_secs_f32());

        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        self.vertex_program
            .set_f32(self.time_location, elapsed * self.options.speed);
        self.pipeline.bind();
        self.vertex_array.bind();

        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_count,
                gl::UNSIGNED_INT,
                ptr::null(),
            );
        }

        ctx.swap_buffers()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.error = Some(error);
        event_loop.exit();
    }

    fn free(&mut self) {
        self.vertex_array.free();
        self.vertex_buffer.free();
        self.index_buffer.free();
        self.pipeline.free();
        self.vertex_program.free();
        self.fragment_program.free();
    }
}

impl ApplicationHandler for Renderer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(WIDTH, HEIGHT));

        let (window, ctx) = match Context::new(event_loop, attributes, self.options.vsync) {
            Ok(created) => created,
            Err(e) => return self.fail(event_loop, e),
        };

        let size = window.inner_size();
        ctx.resize(size.width, size.height);

        self.window = Some(window);
        self.ctx = Some(ctx);

        if let Err(e) = self.init() {
            return self.fail(event_loop, e);
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key: Key::Named(NamedKey::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(ctx) = &self.ctx {
                    ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.draw() {
                    return self.fail(event_loop, e);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if self.ctx.is_some() {
            self.free();
        }
    }
}
