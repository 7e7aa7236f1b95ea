pub mod for_json_options;
pub use for_json_options::*;

pub mod json_text_fallback;
pub use json_text_fallback::*;

pub mod json_shape_extractor;
pub use json_shape_extractor::*;
