//! Handlebars template engine integration.

use handlebars::Handlebars;
use std::path::Path;
use tracing::debug;

use crate::{MailError, RenderedTemplate, Result, TemplateEngine};

const PARTS: [&str; 3] = ["html", "text", "subject"];

/// Handlebars-based template engine for emails.
///
/// Template identifiers use dotted view names: `campaigns.weekly` is loaded
/// from `campaigns/weekly/` below the template root.
///
/// Only the `html` part is HTML-escaped; `text` and `subject` render verbatim.
pub struct HandlebarsEngine {
    html: Handlebars<'static>,
    plain: Handlebars<'static>,
}

impl HandlebarsEngine {
    /// Create a new Handlebars engine.
    pub fn new() -> Self {
        let mut html = Handlebars::new();
        html.set_strict_mode(true);

        let mut plain = Handlebars::new();
        plain.set_strict_mode(true);
        plain.register_escape_fn(handlebars::no_escape);

        Self { html, plain }
    }

    fn registry(&self, part: &str) -> &Handlebars<'static> {
        if part == "html" {
            &self.html
        } else {
            &self.plain
        }
    }

    fn registry_mut(&mut self, part: &str) -> &mut Handlebars<'static> {
        if part == "html" {
            &mut self.html
        } else {
            &mut self.plain
        }
    }

    /// Load templates from a directory.
    ///
    /// Expected structure:
    /// ```text
    /// templates/
    ///   welcome/
    ///     subject.hbs      (optional)
    ///     html.hbs
    ///     text.hbs         (optional)
    ///   campaigns/
    ///     weekly/
    ///       html.hbs
    /// ```
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self> {
        let mut engine = Self::new();
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(MailError::Config(format!(
                "Template directory not found: {}",
                path.display()
            )));
        }

        engine.load_dir(path, None)?;
        Ok(engine)
    }

    fn load_dir(&mut self, dir: &Path, prefix: Option<&str>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry_path = entry?.path();
            if !entry_path.is_dir() {
                continue;
            }

            let dir_name = entry_path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| MailError::Config("Invalid template directory name".to_string()))?;

            let template_name = match prefix {
                Some(prefix) => format!("{}.{}", prefix, dir_name),
                None => dir_name.to_string(),
            };

            let mut loaded = false;
            for part in PARTS {
                let part_path = entry_path.join(format!("{}.hbs", part));
                if part_path.is_file() {
                    let content = std::fs::read_to_string(&part_path)?;
                    self.registry_mut(part)
                        .register_template_string(&part_key(&template_name, part), content)?;
                    loaded = true;
                }
            }

            if loaded {
                debug!(template = %template_name, "Loaded email template");
            }

            self.load_dir(&entry_path, Some(&template_name))?;
        }

        Ok(())
    }

    /// Register a helper for every part.
    pub fn register_helper<H: handlebars::HelperDef + Clone + Send + Sync + 'static>(
        mut self,
        name: &str,
        helper: H,
    ) -> Self {
        self.html.register_helper(name, Box::new(helper.clone()));
        self.plain.register_helper(name, Box::new(helper));
        self
    }

    /// Register a partial template.
    pub fn register_partial(mut self, name: &str, content: &str) -> Result<Self> {
        self.html.register_partial(name, content)?;
        self.plain.register_partial(name, content)?;
        Ok(self)
    }

    /// Register a single part (`html`, `text` or `subject`) of a template.
    pub fn register_part(&mut self, name: &str, part: &str, content: &str) -> Result<()> {
        if !PARTS.contains(&part) {
            return Err(MailError::Template(format!("Unknown template part: {}", part)));
        }
        self.registry_mut(part)
            .register_template_string(&part_key(name, part), content)?;
        Ok(())
    }

    fn render_part(
        &self,
        name: &str,
        part: &str,
        context: &serde_json::Value,
    ) -> Result<Option<String>> {
        let registry = self.registry(part);
        let key = part_key(name, part);
        if !registry.has_template(&key) {
            return Ok(None);
        }
        Ok(Some(registry.render(&key, context)?))
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<RenderedTemplate> {
        let html = self.render_part(name, "html", context)?;
        let text = self.render_part(name, "text", context)?;
        let subject = self
            .render_part(name, "subject", context)?
            .map(|s| s.trim().to_string());

        if html.is_none() && text.is_none() {
            return Err(MailError::TemplateNotFound(name.to_string()));
        }

        Ok(RenderedTemplate {
            html,
            text,
            subject,
        })
    }

    fn has_template(&self, name: &str) -> bool {
        self.html.has_template(&part_key(name, "html"))
            || self.plain.has_template(&part_key(name, "text"))
    }

    fn register_template(&mut self, name: &str, content: &str) -> Result<()> {
        self.register_part(name, "html", content)
    }
}

fn part_key(name: &str, part: &str) -> String {
    format!("{}/{}", name, part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handlebars_render() {
        let mut engine = HandlebarsEngine::new();
        engine.register_part("test", "html", "<h1>Hello, {{name}}!</h1>").unwrap();
        engine.register_part("test", "text", "Hello, {{name}}!").unwrap();
        engine.register_part("test", "subject", " Welcome {{name}}\n").unwrap();

        let result = engine.render("test", &json!({"name": "World"})).unwrap();

        assert_eq!(result.html.as_deref(), Some("<h1>Hello, World!</h1>"));
        assert_eq!(result.text.as_deref(), Some("Hello, World!"));
        assert_eq!(result.subject.as_deref(), Some("Welcome World"));
    }

    #[test]
    fn test_only_html_is_escaped() {
        let mut engine = HandlebarsEngine::new();
        engine.register_part("team", "html", "<p>Hi {{name}}</p>").unwrap();
        engine.register_part("team", "text", "Hi {{name}}").unwrap();
        engine.register_part("team", "subject", "News for {{name}}").unwrap();

        let result = engine
            .render("team", &json!({"name": "Tom & Jerry's <team>"}))
            .unwrap();

        assert_eq!(result.text.as_deref(), Some("Hi Tom & Jerry's <team>"));
        assert_eq!(result.subject.as_deref(), Some("News for Tom & Jerry's <team>"));
        assert_eq!(
            result.html.as_deref(),
            Some("<p>Hi Tom &amp; Jerry&#x27;s &lt;team&gt;</p>")
        );
    }

    #[test]
    fn test_helpers_and_partials_reach_every_part() {
        fn shout(
            h: &handlebars::Helper<'_>,
            _: &Handlebars<'_>,
            _: &handlebars::Context,
            _: &mut handlebars::RenderContext<'_, '_>,
            out: &mut dyn handlebars::Output,
        ) -> handlebars::HelperResult {
            let value = h.param(0).and_then(|v| v.value().as_str()).unwrap_or_default();
            out.write(&value.to_uppercase())?;
            Ok(())
        }

        let mut engine = HandlebarsEngine::new()
            .register_helper("shout", shout)
            .register_partial("sig", "-- {{team}}")
            .unwrap();
        engine.register_part("greet", "html", "<b>{{shout team}}</b>").unwrap();
        engine.register_part("greet", "text", "{{shout team}} {{> sig}}").unwrap();

        let result = engine.render("greet", &json!({"team": "ops"})).unwrap();
        assert_eq!(result.html.as_deref(), Some("<b>OPS</b>"));
        assert_eq!(result.text.as_deref(), Some("OPS -- ops"));
    }

    #[test]
    fn test_missing_template() {
        let engine = HandlebarsEngine::new();
        assert!(matches!(
            engine.render("nope", &json!({})),
            Err(MailError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_strict_mode_rejects_missing_variable() {
        let mut engine = HandlebarsEngine::new();
        engine.register_template("strict", "Hi {{name}}").unwrap();

        assert!(matches!(
            engine.render("strict", &json!({})),
            Err(MailError::Template(_))
        ));
    }

    #[test]
    fn test_from_directory_nested() {
        let dir = tempfile::tempdir().unwrap();
        let weekly = dir.path().join("campaigns").join("weekly");
        std::fs::create_dir_all(&weekly).unwrap();
        std::fs::write(weekly.join("html.hbs"), "<p>{{headline}}</p>").unwrap();
        std::fs::write(weekly.join("subject.hbs"), "Weekly: {{headline}}").unwrap();

        let engine = HandlebarsEngine::from_directory(dir.path()).unwrap();

        assert!(engine.has_template("campaigns.weekly"));
        assert!(!engine.has_template("campaigns"));

        let rendered = engine
            .render("campaigns.weekly", &json!({"headline": "News"}))
            .unwrap();
        assert_eq!(rendered.html.as_deref(), Some("<p>News</p>"));
        assert_eq!(rendered.subject.as_deref(), Some("Weekly: News"));
    }

    #[test]
    fn test_from_missing_directory() {
        assert!(matches!(
            HandlebarsEngine::from_directory("/definitely/not/here"),
            Err(MailError::Config(_))
        ));
    }
}
