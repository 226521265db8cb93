//! Code generation templates for the MassMailer CLI.

use clap::ValueEnum;
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// Template registry for code generation.
pub struct TemplateRegistry {
    hbs: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Create a new template registry with all templates registered.
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);

        hbs.register_template_string("attribute", ATTRIBUTE_TEMPLATE)
            .expect("Failed to register attribute template");

        Self { hbs }
    }

    /// Render a template with the given data.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> CliResult<String> {
        Ok(self.hbs.render(template, data)?)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of an attribute's declared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
}

/// A declared default, typed for literal rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl DefaultValue {
    /// Parse `raw` as `kind`, or infer the kind when none is given.
    ///
    /// Inference treats `true`/`false` as boolean, anything parsing as an
    /// integer as integer, and everything else as a string.
    pub fn parse(raw: &str, kind: Option<ValueKind>) -> CliResult<Self> {
        match kind {
            Some(ValueKind::String) => Ok(Self::String(raw.to_string())),
            Some(ValueKind::Integer) => raw.trim().parse().map(Self::Integer).map_err(|_| {
                CliError::InvalidArgument(format!("'{}' is not an integer", raw))
            }),
            Some(ValueKind::Boolean) => raw.trim().parse().map(Self::Boolean).map_err(|_| {
                CliError::InvalidArgument(format!("'{}' is not a boolean (true/false)", raw))
            }),
            None => Ok(raw
                .parse()
                .map(Self::Boolean)
                .or_else(|_| raw.parse().map(Self::Integer))
                .unwrap_or_else(|_| Self::String(raw.to_string()))),
        }
    }
}

/// Substitution variables of the attribute template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttributeData {
    pub namespace: String,
    pub class_name: String,
    pub has_value: bool,
    pub default_value: String,
    pub is_string: bool,
    pub is_integer: bool,
    pub is_boolean: bool,
}

impl AttributeData {
    /// Context for an attribute without a declared default.
    pub fn new(namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Set the declared default.
    ///
    /// String defaults are escaped so the emitted literal stays valid.
    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.has_value = true;
        self.is_string = false;
        self.is_integer = false;
        self.is_boolean = false;

        match value {
            DefaultValue::String(s) => {
                self.is_string = true;
                self.default_value = s.escape_default().to_string();
            }
            DefaultValue::Integer(i) => {
                self.is_integer = true;
                self.default_value = i.to_string();
            }
            DefaultValue::Boolean(b) => {
                self.is_boolean = true;
                self.default_value = b.to_string();
            }
        }
        self
    }
}

// =============================================================================
// ATTRIBUTE TEMPLATE
// =============================================================================

const ATTRIBUTE_TEMPLATE: &str = r#"//! {{class_name}} campaign attribute.
//!
//! Namespace: `{{namespace}}`

use massmailer::attributes::{AttributeParam, AttributeValue, ComputedValue, DeclaredDefault};

/// {{class_name}} campaign attribute.
#[derive(Debug, Default, Clone, Copy)]
pub struct {{class_name}};

impl DeclaredDefault for {{class_name}} {
    /// The key/default pair representing this attribute: `{{class_name}} => default`.
    fn get(&self) -> AttributeParam {
{{#if has_value}}
        AttributeParam::with_default::<Self>({{#if is_integer}}{{default_value}}i64{{else if is_boolean}}{{default_value}}{{else}}"{{default_value}}"{{/if}})
{{else}}
        AttributeParam::new::<Self>()
{{/if}}
    }
}

impl ComputedValue for {{class_name}} {
    /// Internally generated value, `false` unless replaced.
    ///
    /// If the declared param is `{ "{{class_name}}": true }`, this is the place to
    /// fetch whatever the campaign should embed.
    fn get_value(&self) -> AttributeValue {
        massmailer::attributes::no_value()
    }
}
"#;
