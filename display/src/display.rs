use std::ffi::NulError;

use log::debug;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::TextureValueError;
use sdl2::video::WindowBuildError;
use sdl2::IntegerOrSdlError;
use thiserror::Error;

use emu8_core::{FrameBuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};

const TITLE: &str = "Emu-8";
const BUZZING_TITLE: &str = "Emu-8 \u{266A}";

/// Failures while setting up or drawing to the window
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("sdl error: {0}")]
    Sdl(String),
    #[error("unable to build window: {0}")]
    Window(#[from] WindowBuildError),
    #[error("unable to build canvas: {0}")]
    Canvas(#[from] IntegerOrSdlError),
    #[error("unable to create texture: {0}")]
    Texture(#[from] TextureValueError),
    #[error("invalid window title: {0}")]
    Title(#[from] NulError),
}

impl From<String> for DisplayError {
    fn from(message: String) -> Self {
        DisplayError::Sdl(message)
    }
}

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// Lit pixels arrive as 0xFF and unlit ones as 0x00 in a flat row-major FrameBuffer.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
///
/// The window title doubles as the buzzer: it carries a note while the sound timer is running.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    buzzing: bool,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, DisplayError> {
        let video_subsystem = sdl.video()?;
        let width = DISPLAY_WIDTH as u32 * scale;
        let height = DISPLAY_HEIGHT as u32 * scale;
        let window = video_subsystem
            .window(TITLE, width, height)
            .position_centered()
            .opengl()
            .build()?;
        let canvas = window.into_canvas().build()?;
        debug!("opened {width}x{height} window");

        Ok(Display {
            canvas,
            buzzing: false,
        })
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;

        let rgb = frame_to_sdl_texture(frame);
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            // rows may be padded past 3 bytes per pixel
            for (row, pixels) in rgb.chunks_exact(DISPLAY_WIDTH * 3).enumerate() {
                buffer[row * pitch..row * pitch + pixels.len()].copy_from_slice(pixels);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Shows or hides the buzzer marker in the title; only touches the window on a change
    pub fn set_buzzer(&mut self, buzzing: bool) -> Result<(), DisplayError> {
        if buzzing != self.buzzing {
            let title = if buzzing { BUZZING_TITLE } else { TITLE };
            self.canvas.window_mut().set_title(title)?;
            debug!("buzzer {}", if buzzing { "on" } else { "off" });
            self.buzzing = buzzing;
        }
        Ok(())
    }
}

/// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
///
/// An SDL2 RGB24 texture is a 1D array of bytes that represent concatenated rows of RGB pixels,
/// so each pixel intensity is triplicated into its red, green and blue channels.
pub fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
    frame
        .pixels()
        .iter()
        .flat_map(|&intensity| [intensity; 3])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_sdl_texture() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(1, 0, true);
        frame.set_pixel(0, 1, true);
        let texture = frame_to_sdl_texture(&frame);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(texture, expected);
    }

    #[test]
    fn test_sdl_string_errors_convert() {
        let error: DisplayError = String::from("no video device").into();
        assert_eq!(error.to_string(), "sdl error: no video device");
    }
}
