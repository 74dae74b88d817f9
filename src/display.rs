//! SDL2 Presentation Layer
//!
//! A thin host shell: window, streaming texture, and event polling. The
//! renderer itself never touches SDL; it hands over its finished pixel
//! buffer (and dirty rects, if the host wants partial uploads) and this
//! module puts it on screen.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use crate::context::Context;
use crate::pixel::PixelFormat;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

fn map_format(format: PixelFormat) -> PixelFormatEnum {
    match format {
        // Byte order r,g,b,a on little-endian
        PixelFormat::Rgba8888 => PixelFormatEnum::ABGR8888,
        PixelFormat::Argb8888 => PixelFormatEnum::ARGB8888,
        PixelFormat::Rgb565 => PixelFormatEnum::RGB565,
    }
}

impl Display {
    /// Create a window sized to the renderer's framebuffer
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Upload the context's color buffer and flip
    pub fn present(&mut self, target: &mut RenderTarget, gl: &Context) -> Result<(), String> {
        let pitch = gl.width() as usize * gl.pixel_format().bytes_per_pixel();
        target
            .texture
            .update(None, gl.pixels(), pitch)
            .map_err(|e| e.to_string())?;
        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {}
            }
        }
        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Streaming texture matching the renderer's pixel format
    pub fn new(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(map_format(format), width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self { texture })
    }
}
