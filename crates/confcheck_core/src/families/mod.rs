//! Concrete document families.

mod github_actions;
mod yaml_doc;

pub use github_actions::GithubActionsFamily;
pub use yaml_doc::YamlFamily;

/// Extensions handled by the YAML-based families.
const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];
