use std::{ffi::CString, num::NonZeroU32};

use anyhow::{anyhow, Context as AnyhowContext, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{Display, GetGlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use winit::{
    event_loop::ActiveEventLoop,
    raw_window_handle::HasWindowHandle,
    window::{Window, WindowAttributes},
};

use crate::{debug::Debug, utils::gl_config_picker};

pub const GL_VERSION: Version = Version::new(4, 6);

pub struct Context {
    debug: Option<Debug>,
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    _display: Display,
}

impl Context {
    /// Creates the window along with a current 4.6 core context drawing into it.
    pub fn new(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
        vsync: bool,
    ) -> Result<(Window, Self)> {
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), gl_config_picker)
            .map_err(|e| anyhow!("Couldn't create a GL display: {e}"))?;
        let window = window.context("The display builder created no window")?;

        let display = config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(GL_VERSION)))
            .with_profile(GlProfile::Core)
            .with_debug(crate::debug::DEBUG_ENABLED)
            .build(Some(window.window_handle()?.as_raw()));

        let not_current = unsafe { display.create_context(&config, &context_attributes) }
            .context("Couldn't create an OpenGL 4.6 core context")?;

        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => display.get_proc_address(&symbol),
            Err(_) => std::ptr::null(),
        });

        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("Couldn't set swap interval: {e}");
        }

        log::info!(
            "OpenGL context {:?} on {}",
            GL_VERSION,
            display.version_string()
        );

        Ok((
            window,
            Self {
                debug: Debug::install(),
                context,
                surface,
                _display: display,
            },
        ))
    }

    pub fn resize(&self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };

        self.surface.resize(&self.context, w, h);
        unsafe { gl::Viewport(0, 0, width as _, height as _) };
    }

    pub fn swap_buffers(&self) -> Result<()> {
        Ok(self.surface.swap_buffers(&self.context)?)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        drop(self.debug.take());
    }
}
