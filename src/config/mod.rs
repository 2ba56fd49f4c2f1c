pub mod defaults;
pub mod load;
pub mod types;

pub use load::{load_options, load_options_or_default};
pub use types::{
    Align, FontInput, FontLayerInput, HeaderItemInput, HeaderRowInput, HeaderRowsInput,
    RawOptions, defined,
};
