//! Helpers shared by the code generators.

mod utils;

pub use utils::{NameCases, ensure_dir, find_project_root, update_mod_file, write_file};
