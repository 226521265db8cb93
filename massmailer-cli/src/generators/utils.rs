//! Utility functions for code generation.

use heck::{ToPascalCase, ToSnakeCase};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Convert a name to the case formats a generated file needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCases {
    pub pascal: String,
    pub snake: String,
}

impl NameCases {
    /// Create name cases from the original name.
    pub fn from(name: &str) -> Self {
        // Path-like names ("App/Attributes/Foo") keep only the last segment
        let base_name = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(name)
            .rsplit("::")
            .next()
            .unwrap_or(name);

        Self {
            pascal: base_name.to_pascal_case(),
            snake: base_name.to_snake_case(),
        }
    }
}

/// Find the project root by walking up from `start` to a Cargo.toml that
/// depends on massmailer.
pub fn find_project_root(start: &Path) -> CliResult<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let manifest = current.join("Cargo.toml");
        if manifest.exists() {
            let cargo_toml = std::fs::read_to_string(&manifest)?;
            if cargo_toml.contains("massmailer") {
                return Ok(current);
            }
        }

        if !current.pop() {
            return Err(CliError::NotInProject);
        }
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> CliResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write a file, checking if it already exists.
pub fn write_file(path: &Path, content: &str, overwrite: bool) -> CliResult<()> {
    if path.exists() && !overwrite {
        return Err(CliError::FileExists(path.display().to_string()));
    }

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    std::fs::write(path, content)?;
    Ok(())
}

/// Append `pub mod <module_name>;` to the directory's mod.rs unless already declared.
///
/// Returns whether the file changed.
pub fn update_mod_file(dir: &Path, module_name: &str) -> CliResult<bool> {
    let mod_file = dir.join("mod.rs");
    let mod_line = format!("pub mod {};\n", module_name);

    if !mod_file.exists() {
        std::fs::write(&mod_file, mod_line)?;
        return Ok(true);
    }

    let content = std::fs::read_to_string(&mod_file)?;
    let declared = content
        .lines()
        .any(|line| line.trim().trim_start_matches("pub ") == format!("mod {};", module_name));
    if declared {
        return Ok(false);
    }

    let separator = if content.is_empty() || content.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    std::fs::write(&mod_file, format!("{}{}{}", content, separator, mod_line))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_name_cases() {
        let names = NameCases::from("include_instagram");
        assert_eq!(names.pascal, "IncludeInstagram");
        assert_eq!(names.snake, "include_instagram");

        let names = NameCases::from("App/Attributes/MaxArticles");
        assert_eq!(names.pascal, "MaxArticles");
        assert_eq!(names.snake, "max_articles");

        let names = NameCases::from("app::attributes::footer-text");
        assert_eq!(names.pascal, "FooterText");
    }

    #[test]
    fn test_find_project_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Cargo.toml"),
            "[dependencies]\nmassmailer = \"0.1\"\n",
        )
        .unwrap();
        let nested = dir.path().join("src").join("attributes");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn test_find_project_root_outside_project() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"other\"\n").unwrap();

        // Parent directories of the temp dir may contain anything, so only
        // assert that the unrelated manifest is skipped.
        match find_project_root(dir.path()) {
            Ok(root) => assert_ne!(root, dir.path()),
            Err(e) => assert!(matches!(e, CliError::NotInProject)),
        }
    }

    #[test]
    fn test_write_file_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("foo.rs");

        write_file(&path, "one", false).unwrap();
        assert!(matches!(
            write_file(&path, "two", false),
            Err(CliError::FileExists(_))
        ));
        write_file(&path, "three", true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three");
    }

    #[test]
    fn test_update_mod_file() {
        let dir = TempDir::new().unwrap();

        assert!(update_mod_file(dir.path(), "foo").unwrap());
        assert!(!update_mod_file(dir.path(), "foo").unwrap());

        std::fs::write(dir.path().join("mod.rs"), "pub mod foo;\nmod helpers;").unwrap();
        assert!(!update_mod_file(dir.path(), "helpers").unwrap());
        assert!(update_mod_file(dir.path(), "bar").unwrap());

        let content = std::fs::read_to_string(dir.path().join("mod.rs")).unwrap();
        assert_eq!(content, "pub mod foo;\nmod helpers;\npub mod bar;\n");
    }
}
