//! Stream reader: response bytes to text fragments.

pub mod decoder;
pub mod reader;

pub use decoder::Utf8Decoder;
pub use reader::{read_text_stream, TextStream};
