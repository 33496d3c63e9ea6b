//! Site-wide template variables.
//!
//! The environment is read once at startup; rendering only ever sees the
//! resulting [`SiteContext`].

use sitesmith_render::RenderContext;

/// A template variable backed by an environment variable.
#[derive(Debug, Clone, Copy)]
pub struct Variable {
    /// Name used inside templates
    pub key: &'static str,
    /// Environment variable that overrides it
    pub env: &'static str,
    /// Value used when neither the environment nor the config file set it
    pub default: &'static str,
}

/// Variables every template receives.
pub const VARIABLES: [Variable; 3] = [
    Variable {
        key: "github_url",
        env: "SJP_GITHUB_URL",
        default: "https://github.com/AndreyBychenkow",
    },
    Variable {
        key: "github_title",
        env: "SJP_GITHUB_TITLE",
        default: "Мой GitHub",
    },
    Variable {
        key: "title",
        env: "SJP_TITLE",
        default: "Мой сайт",
    },
];

/// Resolved template variables for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    vars: RenderContext,
}

impl SiteContext {
    /// Resolve variables from the process environment.
    ///
    /// `file_vars` are the `[context]` entries from the config file.
    pub fn from_env(file_vars: &RenderContext) -> Self {
        Self::resolve(|name| std::env::var(name).ok(), file_vars)
    }

    /// Resolve variables with a custom environment lookup.
    ///
    /// Precedence: environment, then config file, then built-in default.
    pub fn resolve<F>(lookup: F, file_vars: &RenderContext) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = file_vars.clone();

        for var in VARIABLES {
            let value = lookup(var.env)
                .or_else(|| file_vars.get(var.key).cloned())
                .unwrap_or_else(|| var.default.to_string());
            vars.insert(var.key.to_string(), value);
        }

        Self { vars }
    }

    /// Look up a single variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Turn the context into a factory the renderer can call per template.
    pub fn into_factory(self) -> impl Fn() -> RenderContext + Send + Sync + 'static {
        move || self.vars.clone()
    }
}
