//! Feature components
//!
//! Each submodule implements one feature, with its main logic and its own helpers.

pub mod contact_sheet_generator;

pub use contact_sheet_generator::ContactSheetGenerator;
