use crate::error::{LayoutError, LayoutResult};
use crate::tools::{TemplateContext, interpolate, is_template, is_truthy};
use serde_json::Value;
use std::path::Path;

pub const DEFAULT_PAGE_COUNT_PROPERTY: &str = "pageCount";

/// Output file names for each page of a sheet.
///
/// A base name containing `${...}` is always filled in, with `pageNumber` added to the
/// context. A literal base name is used as is for a single page; otherwise `_<page>` goes
/// before the extension.
#[derive(Debug, Clone)]
pub struct PageFilenameGenerator {
    base: String,
    details: TemplateContext,
    page_count: Value,
    templated: bool,
}

impl PageFilenameGenerator {
    pub fn new(
        base: impl Into<String>,
        details: TemplateContext,
        page_count_property: &str,
    ) -> LayoutResult<Self> {
        let page_count = details
            .get(page_count_property)
            .filter(|value| is_truthy(value))
            .cloned()
            .ok_or_else(|| LayoutError::PageCountMissing(page_count_property.to_string()))?;
        let base = base.into();
        let templated = is_template(&base);

        Ok(Self {
            base,
            details,
            page_count,
            templated,
        })
    }

    #[must_use]
    pub fn filename(&self, page: u32) -> String {
        if self.templated {
            let mut context = self.details.clone();
            context.insert("pageNumber".to_string(), Value::from(page));
            return interpolate(&self.base, &context);
        }
        if self.page_count.as_f64() == Some(1.0) && page == 1 {
            return self.base.clone();
        }
        numbered(&self.base, page)
    }
}

/// `dir/name.ext` becomes `dir/name_<page>.ext`.
fn numbered(base: &str, page: u32) -> String {
    let path = Path::new(base);
    let Some(stem) = path.file_stem() else {
        return format!("{base}_{page}");
    };

    let mut name = stem.to_os_string();
    name.push(format!("_{page}"));
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name).to_string_lossy().into_owned()
}
