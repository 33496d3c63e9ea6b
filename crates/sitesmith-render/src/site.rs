//! Template site backed by minijinja.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use minijinja::{path_loader, AutoEscape, Environment};
use walkdir::WalkDir;

use crate::context::{context_for, ContextRule, RenderContext};
use crate::renderer::{RenderError, RenderReport, Renderer};

/// Configuration for a template site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Directory containing templates
    pub source_dir: PathBuf,

    /// Directory rendered files are written to
    pub output_dir: PathBuf,
}

/// Whether a template name refers to a partial.
///
/// Partials can be included or extended by other templates but are never
/// written to the output directory.
pub fn is_partial(name: &str) -> bool {
    name.split('/').any(|part| part.starts_with('_'))
}

/// Whether a template name refers to a hidden file that is skipped entirely.
pub fn is_ignored(name: &str) -> bool {
    name.split('/').any(|part| part.starts_with('.'))
}

/// A directory of templates rendered into an output directory.
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    rules: Vec<ContextRule>,
}

impl Site {
    /// Create a site with no context rules.
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            rules: Vec::new(),
        }
    }

    /// Register a context factory for templates whose name matches `pattern`.
    pub fn with_context<F>(mut self, pattern: &str, factory: F) -> Result<Self, RenderError>
    where
        F: Fn() -> RenderContext + Send + Sync + 'static,
    {
        self.rules.push(ContextRule::new(pattern, factory)?);
        Ok(self)
    }

    /// Context a template is rendered with.
    pub fn context_for(&self, name: &str) -> RenderContext {
        context_for(&self.rules, name)
    }

    /// Names of all templates that are rendered, sorted.
    pub fn templates(&self) -> Result<Vec<String>, RenderError> {
        let source_dir = &self.config.source_dir;
        if !source_dir.is_dir() {
            return Err(RenderError::ReadError(format!(
                "Template directory not found: {}",
                source_dir.display()
            )));
        }

        let output_name = self.output_name();
        let mut names = Vec::new();

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !(e.file_name().to_string_lossy().starts_with('.')
                        || (output_name.is_some() && self.template_name(e.path()) == output_name))
            })
        {
            let entry = entry.map_err(|e| RenderError::ReadError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            match self.template_name(entry.path()) {
                Some(name) if !is_partial(&name) => names.push(name),
                Some(_) => {}
                None => {
                    tracing::warn!(
                        "Skipping template with non UTF-8 path: {}",
                        entry.path().display()
                    );
                }
            }
        }

        Ok(names)
    }

    /// Fresh environment per pass so edited templates are always reloaded.
    ///
    /// Values are inserted verbatim, as in Jinja's default configuration;
    /// templates opt into escaping with the `escape` filter.
    fn environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_loader(path_loader(&self.config.source_dir));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env
    }

    /// Render one template and write it to the output directory.
    fn render_template(&self, env: &Environment<'_>, name: &str) -> Result<PathBuf, RenderError> {
        let template_error = |e: minijinja::Error| RenderError::TemplateError {
            name: name.to_string(),
            message: e.to_string(),
        };

        let tmpl = env.get_template(name).map_err(template_error)?;
        let html = tmpl.render(self.context_for(name)).map_err(template_error)?;

        let output_path = self.config.output_dir.join(name);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RenderError::WriteError(format!("{}: {}", parent.display(), e)))?;
        }

        fs::write(&output_path, html)
            .map_err(|e| RenderError::WriteError(format!("{}: {}", output_path.display(), e)))?;

        tracing::debug!("Rendered {}", name);

        Ok(output_path)
    }

    /// Map a path under the source directory to its template name.
    ///
    /// Watcher paths may be absolute while the configured source directory is
    /// relative, so the canonical source directory is tried as well.
    fn template_name(&self, path: &Path) -> Option<String> {
        let source_dir = &self.config.source_dir;
        let relative = path.strip_prefix(source_dir).ok().map(Path::to_path_buf).or_else(|| {
            let canonical = fs::canonicalize(source_dir).ok()?;
            path.strip_prefix(canonical).ok().map(Path::to_path_buf)
        })?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// Template name of the output directory when it lies inside the source.
    fn output_name(&self) -> Option<String> {
        let output_dir = &self.config.output_dir;
        self.template_name(output_dir).or_else(|| {
            let canonical = fs::canonicalize(output_dir).ok()?;
            self.template_name(&canonical)
        })
    }

    /// Whether `name` is the output directory or something written into it.
    fn is_output(&self, name: &str) -> bool {
        self.output_name().is_some_and(|out| {
            name.strip_prefix(out.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

impl Renderer for Site {
    fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    fn render(&self) -> Result<RenderReport, RenderError> {
        let start = Instant::now();

        let env = self.environment();
        let rendered = self
            .templates()?
            .iter()
            .map(|name| self.render_template(&env, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RenderReport {
            rendered,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn rerender(&self, changed: &[PathBuf]) -> Result<RenderReport, RenderError> {
        let start = Instant::now();
        let mut names = BTreeSet::new();

        for path in changed {
            let Some(name) = self.template_name(path) else {
                tracing::debug!("Ignoring change outside templates: {}", path.display());
                continue;
            };

            if is_ignored(&name) || self.is_output(&name) {
                continue;
            }

            if is_partial(&name) {
                tracing::info!("Partial {} changed, re-rendering all templates", name);
                return self.render();
            }

            names.insert(name);
        }

        let env = self.environment();
        let mut rendered = Vec::new();

        for name in names {
            if !self.config.source_dir.join(&name).is_file() {
                tracing::info!("Template {} no longer exists, skipping", name);
                continue;
            }
            rendered.push(self.render_template(&env, &name)?);
        }

        Ok(RenderReport {
            rendered,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
