use handlebars::{no_escape, Handlebars};
use serde_json::json;

use crate::change_set::ServiceCode;
use crate::error::{CrustError, Result};
use crate::markup::Tag;

pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Security,
    Explain,
    Cost,
}

impl PromptKind {
    pub fn template_name(self) -> &'static str {
        match self {
            PromptKind::Security => "security",
            PromptKind::Explain => "explain",
            PromptKind::Cost => "cost",
        }
    }
}

/// System instructions for each analysis, rendered from built-in templates.
pub struct PromptLibrary {
    handlebars: Handlebars<'static>,
    language: String,
}

impl PromptLibrary {
    pub fn new(language: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(no_escape);

        let templates = [
            ("security", include_str!("../templates/security.hbs")),
            ("explain", include_str!("../templates/explain.hbs")),
            ("cost", include_str!("../templates/cost.hbs")),
        ];
        for (name, content) in templates {
            handlebars
                .register_template_string(name, content)
                .map_err(|e| CrustError::Prompt(format!("template '{}': {}", name, e)))?;
        }

        let language = match language.trim() {
            "" => DEFAULT_LANGUAGE.to_string(),
            language => language.to_string(),
        };

        Ok(Self { handlebars, language })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn render(&self, kind: PromptKind) -> Result<String> {
        let service_codes = ServiceCode::ALL
            .iter()
            .map(|code| code.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let data = json!({
            "language": self.language,
            "tags": Tag::advertised_list(),
            "service_codes": service_codes,
        });

        self.handlebars
            .render(kind.template_name(), &data)
            .map_err(|e| CrustError::Prompt(format!("failed to render '{}' prompt: {}", kind.template_name(), e)))
    }
}
