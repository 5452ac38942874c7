//! Rendered files
//!
//! A file is a template paired with a context. Files are never stored; they are
//! computed on demand from a composite id or a filter set.

use crate::context::{Context, ContextSource};
use crate::error::ApiError;
use crate::render::render;
use crate::template::{Template, TemplateStore};
use serde::Serialize;
use tracing::debug;

pub mod filter;
pub mod id;
pub mod selector;

pub use filter::{FileFilters, UnknownFilterKey, FILTER_KEYS};
pub use id::{ContextRef, FileId, ParseIdError, TemplateId};
pub use selector::FileSelector;

/// A (context, template) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResource {
    pub context: Context,
    pub template: Template,
}

impl FileResource {
    pub fn new(context: Context, template: Template) -> Self {
        Self { context, template }
    }

    pub fn file_id(&self) -> FileId {
        FileId::new(self.template.template_id(), ContextRef::from(&self.context))
    }

    pub fn id(&self) -> String {
        self.file_id().to_string()
    }

    /// The template payload with the context's params substituted
    pub fn payload(&self) -> String {
        render(&self.template.payload, self.context.params())
    }
}

/// Resolve a composite file id
///
/// `None` when the id does not parse or when either the template or the
/// context it names is absent.
pub fn resolve_file(
    templates: &TemplateStore,
    contexts: &ContextSource,
    id: &str,
) -> Result<Option<FileResource>, ApiError> {
    let file_id = match id.parse::<FileId>() {
        Ok(file_id) => file_id,
        Err(e) => {
            debug!("{}", e);
            return Ok(None);
        }
    };

    let template = match templates.load(&file_id.template.name, &file_id.template.template_type)? {
        Some(template) => template,
        None => return Ok(None),
    };

    let context = match &file_id.context {
        ContextRef::Node(name) => contexts.nodes().find(name)?.map(Context::from),
        ContextRef::Group(name) => contexts.groups().find(name)?.map(Context::from),
        ContextRef::Cluster => contexts.default_cluster()?.map(Context::from),
    };

    Ok(context.map(|context| FileResource::new(context, template)))
}
