//! Code generation commands.

use colored::Colorize;
use heck::ToSnakeCase;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CliResult;
use crate::generators::{NameCases, ensure_dir, find_project_root, update_mod_file, write_file};
use crate::templates::{AttributeData, DefaultValue, TemplateRegistry, ValueKind};

/// Options of `generate attribute`.
#[derive(Debug, Clone)]
pub struct AttributeOptions {
    /// Attribute name, normalized to PascalCase for the type.
    pub name: String,
    /// Module path the attribute lives in (`attributes`, `app::attributes`).
    pub namespace: String,
    /// Raw declared default.
    pub default: Option<String>,
    /// Type of the declared default, inferred when absent.
    pub kind: Option<ValueKind>,
    /// Output directory, bypassing project lookup.
    pub path: Option<PathBuf>,
    /// Overwrite an existing file.
    pub force: bool,
}

/// Generate an attribute source file and register it in the directory's mod.rs.
///
/// Returns the path of the written file.
pub async fn attribute(options: &AttributeOptions) -> CliResult<PathBuf> {
    let names = NameCases::from(&options.name);

    let mut data = AttributeData::new(&options.namespace, &names.pascal);
    if let Some(raw) = &options.default {
        data = data.with_default(DefaultValue::parse(raw, options.kind)?);
    }

    let dir = output_dir(options, &std::env::current_dir()?)?;
    ensure_dir(&dir)?;

    let content = TemplateRegistry::new().render("attribute", &data)?;
    let file = dir.join(format!("{}.rs", names.snake));
    write_file(&file, &content, options.force)?;
    debug!(file = %file.display(), class_name = %names.pascal, "Rendered attribute");

    println!("  {} {}", "CREATE".green().bold(), file.display());

    if update_mod_file(&dir, &names.snake)? {
        println!(
            "  {} {}",
            "UPDATE".yellow().bold(),
            dir.join("mod.rs").display()
        );
    }

    println!(
        "\n{} Generated attribute {}{}",
        "✓".green().bold(),
        names.pascal,
        options
            .default
            .as_ref()
            .map(|_| format!(" (default: {})", data.default_value))
            .unwrap_or_default()
    );

    Ok(file)
}

/// Resolve where the attribute file goes: `--path`, else the namespace below
/// the project's `src/`.
fn output_dir(options: &AttributeOptions, cwd: &Path) -> CliResult<PathBuf> {
    if let Some(path) = &options.path {
        return Ok(path.clone());
    }

    let root = find_project_root(cwd)?;
    Ok(namespace_segments(&options.namespace)
        .into_iter()
        .fold(root.join("src"), |dir, segment| dir.join(segment)))
}

/// Split a namespace (`App\Attributes`, `app::attributes`, `app/attributes`)
/// into snake_case path segments.
fn namespace_segments(namespace: &str) -> Vec<String> {
    namespace
        .split(['\\', '/', '.'])
        .flat_map(|part| part.split("::"))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_snake_case())
        .collect()
}
