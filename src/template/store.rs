//! Filesystem-backed template storage
//!
//! Layout: `{root}/{type}/{name}` with the raw payload as file content.

use super::{is_valid_identifier, Template};
use crate::error::TemplateError;
use crate::files::TemplateId;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Template storage rooted at a configured directory
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    /// Create a store at `root`. The directory is created lazily on first save.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the `(name, type)` template. Never touches the filesystem.
    pub fn path(&self, name: &str, template_type: &str) -> PathBuf {
        self.root.join(template_type).join(name)
    }

    /// Load a template
    ///
    /// Returns `None` when no file backs `(name, type)`. Identifiers that fail
    /// the safety pattern can never have been saved and also resolve to `None`.
    pub fn load(&self, name: &str, template_type: &str) -> Result<Option<Template>, TemplateError> {
        if !is_valid_identifier(name) || !is_valid_identifier(template_type) {
            return Ok(None);
        }

        let path = self.path(name, template_type);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(Template::new(name, template_type, payload))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Template not found");
                Ok(None)
            }
            Err(e) => Err(TemplateError::Io(e)),
        }
    }

    /// Load a template from its `<name>.<type>` id; unparseable ids are absent
    pub fn load_by_id(&self, id: &str) -> Result<Option<Template>, TemplateError> {
        match id.parse::<TemplateId>() {
            Ok(id) => self.load(&id.name, &id.template_type),
            Err(_) => Ok(None),
        }
    }

    /// All templates whose name and type match the glob patterns
    ///
    /// Payloads are loaded eagerly. Results are ordered by type then name.
    pub fn glob(&self, name_pattern: &str, type_pattern: &str) -> Result<Vec<Template>, TemplateError> {
        check_pattern("name pattern", name_pattern)?;
        check_pattern("type pattern", type_pattern)?;

        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{}/{}/{}", root, type_pattern, name_pattern);

        let mut templates = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("Failed to read template entry: {}", e);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }

            let name = path.file_name().and_then(|s| s.to_str());
            let template_type = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str());
            if let (Some(name), Some(template_type)) = (name, template_type) {
                if let Some(template) = self.load(name, template_type)? {
                    templates.push(template);
                }
            }
        }

        templates.sort_by(|a, b| {
            (&a.template_type, &a.name).cmp(&(&b.template_type, &b.name))
        });
        Ok(templates)
    }

    /// Persist a template, replacing any existing payload
    ///
    /// Writes go to a temporary sibling file which is then renamed into place.
    pub fn save(&self, template: &Template) -> Result<(), TemplateError> {
        template.validate()?;

        let path = self.path(&template.name, &template.template_type);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_file_name(format!(".{}.tmp", template.name));
        fs::write(&temp_path, template.payload.as_bytes())?;
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TemplateError::Io(e)
        })?;

        info!(template = %template.id(), path = %path.display(), "Saved template");
        Ok(())
    }

    /// Remove a template's backing file. Removing an absent template is a no-op.
    ///
    /// Identifiers that fail the safety pattern name nothing in the store, so
    /// deleting them is also a no-op.
    pub fn delete(&self, template: &Template) -> Result<(), TemplateError> {
        if !is_valid_identifier(&template.name) || !is_valid_identifier(&template.template_type) {
            return Ok(());
        }

        let path = self.path(&template.name, &template.template_type);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(template = %template.id(), "Deleted template");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TemplateError::Io(e)),
        }
    }
}

fn check_pattern(field: &'static str, pattern: &str) -> Result<(), TemplateError> {
    if pattern.is_empty() || pattern.contains('/') || pattern.contains('\\') || pattern.contains("..") {
        return Err(TemplateError::Validation {
            field,
            message: format!("'{}' is not a single path segment", pattern),
        });
    }
    glob::Pattern::new(pattern)?;
    Ok(())
}
