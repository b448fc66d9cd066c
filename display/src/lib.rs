pub use display::{frame_to_sdl_texture, Display, DisplayError};

mod display;
