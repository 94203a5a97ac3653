//! Audio output encoding

mod encoder;

pub use encoder::AudioEncoder;
