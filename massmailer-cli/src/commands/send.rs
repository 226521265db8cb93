//! Templated send command.

use colored::Colorize;
use massmailer_mail::{
    DefaultMailer, HandlebarsEngine, LogTransport, MailConfig, MailParams, MassMailer, Mailer,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// Options of `send`.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub template: String,
    pub to: Vec<String>,
    pub subject: String,
    pub from: Option<String>,
    pub from_name: Option<String>,
    pub vars: Vec<(String, Value)>,
    pub templates: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
}

/// Parse a `key=value` template variable. Values that are valid JSON keep
/// their type, anything else is a string.
pub fn parse_var(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Load configuration and send.
pub async fn run(options: SendOptions) -> CliResult<()> {
    let config = load_config(&options)?;
    dispatch(&options, &config).await
}

fn load_config(options: &SendOptions) -> CliResult<MailConfig> {
    if let Some(path) = &options.config {
        return Ok(MailConfig::from_file(path)?);
    }

    match MailConfig::from_env() {
        Ok(config) => Ok(config),
        // A sender on the command line doubles as the reply-to identity.
        Err(e) => match &options.from {
            Some(from) => {
                debug!(error = %e, "No mail configuration in environment, using --from");
                Ok(MailConfig::new(from.clone(), options.from_name.clone()))
            }
            None => Err(e.into()),
        },
    }
}

/// Send `options` with an already loaded configuration.
pub async fn dispatch(options: &SendOptions, config: &MailConfig) -> CliResult<()> {
    let templates = options
        .templates
        .as_ref()
        .or(config.templates.as_ref())
        .ok_or_else(|| {
            CliError::InvalidArgument(
                "no template directory; pass --templates or set MAIL_TEMPLATES".to_string(),
            )
        })?;
    let engine = HandlebarsEngine::from_directory(templates)?;

    let mailer = if options.dry_run {
        Mailer::new(LogTransport, engine)
    } else {
        Mailer::smtp(config.smtp.clone(), engine)?
    };
    let dispatcher = DefaultMailer::new(mailer, config)?;

    let sender_email = options.from.as_deref().unwrap_or(&config.from.address);
    let sender_name = options
        .from_name
        .as_deref()
        .or(config.from.name.as_deref())
        .unwrap_or_default();

    let params = MailParams::builder()
        .template(&options.template)
        .variables(&options.vars.iter().cloned().collect::<serde_json::Map<_, _>>())
        .recipients(&options.to)
        .subject(&options.subject)
        .sender(sender_email, sender_name)
        .build()?;

    let template = options.template.clone();
    let delivered = dispatcher
        .send(
            &params,
            Box::new(move || {
                debug!(template = %template, "Message built");
            }),
        )
        .await?;

    if !delivered {
        return Err(CliError::DeliveryFailed);
    }

    info!(recipients = params.recipients().len(), "Send complete");
    println!(
        "{} Sent {} to {} recipient(s){}",
        "✓".green().bold(),
        options.template.cyan(),
        params.recipients().len(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    Ok(())
}
