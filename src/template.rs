//! Templates
//!
//! A template is a named, typed payload with `%key%` markers. Identity is the
//! `(name, type)` pair; persisted templates live at `<root>/<type>/<name>`.

use crate::error::TemplateError;
use crate::files::TemplateId;
use serde::{Deserialize, Serialize};

mod store;

pub use store::TemplateStore;

/// A template held in memory
///
/// Unsaved templates (e.g. for previews) may carry any name or type; only
/// [`TemplateStore::save`] enforces [`is_valid_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: String,
    #[serde(default)]
    pub payload: String,
}

impl Template {
    pub fn new(
        name: impl Into<String>,
        template_type: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            template_type: template_type.into(),
            payload: payload.into(),
        }
    }

    /// Replace the payload, keeping identity
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// The `<name>.<type>` identifier
    pub fn template_id(&self) -> TemplateId {
        TemplateId::new(self.name.clone(), self.template_type.clone())
    }

    pub fn id(&self) -> String {
        self.template_id().to_string()
    }

    /// Check `name` and `type` against the identifier-safety pattern
    pub fn validate(&self) -> Result<(), TemplateError> {
        validate_field("name", &self.name)?;
        validate_field("type", &self.template_type)
    }
}

/// `[A-Za-z0-9_-]+`
pub fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn validate_field(field: &'static str, value: &str) -> Result<(), TemplateError> {
    if value.is_empty() {
        return Err(TemplateError::Validation {
            field,
            message: "can't be blank".to_string(),
        });
    }
    if !is_valid_identifier(value) {
        return Err(TemplateError::Validation {
            field,
            message: format!(
                "'{}' may only contain letters, digits, underscores and hyphens",
                value
            ),
        });
    }
    Ok(())
}
