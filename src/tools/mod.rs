mod canvas;
mod ffprobe_info;
mod font_loader;
mod path_validator;
mod safe_eval;
mod sample_selector;
mod template;
mod time_converter;

pub use canvas::{BitmapFont, Canvas, create_page, parse_colour};
pub use ffprobe_info::{FfprobeProber, MediaMetadata, MediaProber, parse_probe_output};
pub use font_loader::{FontLayer, FontLoader, TIME_FONT_NAME, TITLE_FONT_NAME};
pub use path_validator::{ensure_directory_exists, validate_file_exists};
pub use safe_eval::evaluate as evaluate_condition;
pub use sample_selector::{calculate_by_count, calculate_by_interval};
pub use template::{TemplateContext, interpolate, is_template, is_truthy, render_value};
pub use time_converter::convert_time_to_readable;
