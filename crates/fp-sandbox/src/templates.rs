//! Minimal `{{variable}}` template registry and renderer.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use fp_api::{HostError, HostResult, TemplateService};
use serde_json::Value;

use crate::relock;

/// Template service substituting `{{name}}` placeholders from a JSON
/// object context. String values substitute verbatim; other values
/// substitute as compact JSON; null substitutes as the empty string.
#[derive(Default)]
pub struct SandboxTemplates {
    templates: RwLock<HashMap<String, String>>,
}

impl SandboxTemplates {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TemplateService for SandboxTemplates {
    fn register(&self, path: &str, source: &str) {
        relock(self.templates.write()).insert(path.to_string(), source.to_string());
    }

    async fn render(&self, path: &str, context: &Value) -> HostResult<String> {
        let source = relock(self.templates.read())
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::TemplateNotFound(path.to_string()))?;

        let mut out = String::with_capacity(source.len());
        let mut rest = source.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                // Unterminated placeholder stays literal.
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            let name = after[..end].trim();
            let value = context
                .get(name)
                .ok_or_else(|| HostError::TemplateVar {
                    template: path.to_string(),
                    variable: name.to_string(),
                })?;
            out.push_str(&value_text(value));
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
