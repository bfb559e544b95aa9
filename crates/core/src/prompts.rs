//! Prompt Templates
//!
//! Prompts are markdown files keyed by file stem. The compiled-in set covers
//! every required key; a prompts directory on disk overrides them one by one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const GENERATE_RESOURCE: &str = "generate_resource";
pub const GENERATE_RESOURCE_FALLBACK: &str = "generate_resource_fallback";
pub const CURATE_PROBLEMS: &str = "curate_problems";

/// Every key the orchestrator renders.
pub const REQUIRED_PROMPTS: [&str; 3] = [GENERATE_RESOURCE, GENERATE_RESOURCE_FALLBACK, CURATE_PROBLEMS];

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Prompt template '{0}' is not defined")]
    Missing(String),
    #[error("Failed to read prompts from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct PromptLibrary {
    templates: HashMap<String, String>,
}

impl PromptLibrary {
    /// The templates shipped with the crate.
    pub fn builtin() -> Self {
        let templates = [
            (GENERATE_RESOURCE, include_str!("../prompts/generate_resource.md")),
            (
                GENERATE_RESOURCE_FALLBACK,
                include_str!("../prompts/generate_resource_fallback.md"),
            ),
            (CURATE_PROBLEMS, include_str!("../prompts/curate_problems.md")),
        ]
        .into_iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect();

        Self { templates }
    }

    /// Builds a library from explicit templates and checks the required keys.
    pub fn from_map(templates: HashMap<String, String>) -> Result<Self, PromptError> {
        let library = Self { templates };
        library.validate()?;
        Ok(library)
    }

    /// Loads `*.md` files from `dir` on top of the built-in templates.
    ///
    /// A directory that does not exist leaves the built-ins untouched.
    pub fn load(dir: &Path) -> Result<Self, PromptError> {
        let mut templates = Self::builtin().templates;
        if !dir.is_dir() {
            info!(path = %dir.display(), "Prompts directory not found, using built-in prompts");
            return Self::from_map(templates);
        }

        let io_err = |source| PromptError::Io {
            path: dir.to_path_buf(),
            source,
        };
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("md") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let content = fs::read_to_string(&path).map_err(|source| PromptError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(prompt = %key, "Loaded prompt override");
            templates.insert(key, content);
        }

        Self::from_map(templates)
    }

    fn validate(&self) -> Result<(), PromptError> {
        match REQUIRED_PROMPTS
            .iter()
            .find(|key| !self.templates.contains_key(**key))
        {
            Some(key) => Err(PromptError::Missing((*key).to_string())),
            None => Ok(()),
        }
    }

    /// Fills the `{topic}` and `{difficulty}` placeholders of a template.
    pub fn render(&self, key: &str, topic: &str, difficulty: &str) -> Result<String, PromptError> {
        let template = self
            .templates
            .get(key)
            .ok_or_else(|| PromptError::Missing(key.to_string()))?;
        Ok(fill_placeholders(template, topic, difficulty))
    }
}

/// Single left-to-right pass, so placeholder text inside a substituted value
/// is never expanded again.
fn fill_placeholders(template: &str, topic: &str, difficulty: &str) -> String {
    let mut out = String::with_capacity(template.len() + topic.len() + difficulty.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{topic}") {
            out.push_str(topic);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{difficulty}") {
            out.push_str(difficulty);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}
