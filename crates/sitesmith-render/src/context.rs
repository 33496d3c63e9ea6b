//! Context rules: which variables a template is rendered with.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::renderer::RenderError;

/// Variables available to a template while it renders.
pub type RenderContext = BTreeMap<String, String>;

/// Produces the context for every template matched by a rule.
pub type ContextFactory = Arc<dyn Fn() -> RenderContext + Send + Sync>;

/// A template name pattern paired with the context factory it selects.
#[derive(Clone)]
pub struct ContextRule {
    pattern: Regex,
    factory: ContextFactory,
}

impl ContextRule {
    /// Create a rule. The pattern is a regular expression matched against
    /// the start of the `/`-separated template name.
    pub fn new<F>(pattern: &str, factory: F) -> Result<Self, RenderError>
    where
        F: Fn() -> RenderContext + Send + Sync + 'static,
    {
        let anchored = format!("^(?:{})", pattern);
        let pattern = Regex::new(&anchored).map_err(|e| RenderError::PatternError {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            pattern,
            factory: Arc::new(factory),
        })
    }

    /// Whether this rule applies to the named template.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    /// Build the context this rule contributes.
    pub fn context(&self) -> RenderContext {
        (self.factory)()
    }
}

impl fmt::Debug for ContextRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextRule")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Merge the contexts of every rule matching `name`, in order.
///
/// Later rules override keys set by earlier ones.
pub fn context_for(rules: &[ContextRule], name: &str) -> RenderContext {
    let mut context = RenderContext::new();
    for rule in rules.iter().filter(|r| r.matches(name)) {
        context.extend(rule.context());
    }
    context
}
