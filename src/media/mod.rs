/// Image file handling
///
/// This module handles:
/// - Reading a picked or dropped file and detecting its MIME type
/// - Rendering a downscaled preview of the staged file
/// - Decoding the base64 payloads the gallery server inlines

pub mod preview;
pub mod source;
pub mod thumbnail;
