//! Rendering surfaces the manager listens on, and the renderer that owns them.

use std::{rc::Rc, sync::Arc};

use winit::window::Window;

/// Displayed placement of a surface, in the same logical units as the client
/// coordinates of incoming events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

pub trait Surface {
    /// Where the surface is displayed and how large it appears.
    fn bounding_rect(&self) -> SurfaceRect;

    /// Size of the backing framebuffer in physical pixels.
    fn backing_size(&self) -> (u32, u32);
}

/// Anything that draws into a surface and can hand it to the manager.
pub trait Renderer {
    fn surface(&self) -> Option<Rc<dyn Surface>>;
}

/// Fixed-size surface for offscreen targets and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSurface {
    pub rect: SurfaceRect,
    pub backing: (u32, u32),
}

impl StaticSurface {
    /// Surface at the origin whose backing store matches its displayed size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rect: SurfaceRect::new(0.0, 0.0, width as f32, height as f32),
            backing: (width, height),
        }
    }

    pub fn with_rect(mut self, rect: SurfaceRect) -> Self {
        self.rect = rect;
        self
    }
}

impl Surface for StaticSurface {
    fn bounding_rect(&self) -> SurfaceRect {
        self.rect
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }
}

/// The inner area of a winit window.
///
/// The rect is reported in logical pixels, the backing size in physical
/// pixels, so HiDPI scaling is handled by the hit tester.
pub struct WindowSurface {
    window: Arc<Window>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl Surface for WindowSurface {
    fn bounding_rect(&self) -> SurfaceRect {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f32>(self.window.scale_factor());
        SurfaceRect::new(0.0, 0.0, logical.width, logical.height)
    }

    fn backing_size(&self) -> (u32, u32) {
        self.window.inner_size().into()
    }
}

/// Renderer stand-in that owns nothing but its target surface.
pub struct SurfaceRenderer {
    surface: Rc<dyn Surface>,
}

impl SurfaceRenderer {
    pub fn new(surface: Rc<dyn Surface>) -> Self {
        Self { surface }
    }
}

impl Renderer for SurfaceRenderer {
    fn surface(&self) -> Option<Rc<dyn Surface>> {
        Some(self.surface.clone())
    }
}
