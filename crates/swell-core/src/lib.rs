pub mod color;
pub mod config;
pub mod constants;
pub mod control;
pub mod envelope;
pub mod error;
pub mod hardware;
pub mod lights;
pub mod mapping;
pub mod voice;
pub mod waveform;

pub use color::*;
pub use config::*;
pub use constants::*;
pub use control::*;
pub use envelope::*;
pub use error::*;
pub use hardware::*;
pub use lights::*;
pub use mapping::*;
pub use voice::*;
pub use waveform::{generate as generate_waveform, Wavetable};
