mod dart;

pub use dart::{create_dart_parts, DartParts};
