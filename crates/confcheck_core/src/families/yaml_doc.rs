//! Generic YAML family.

use std::marker::PhantomData;
use std::path::Path;

use crate::document::{Node, ParsedFile, has_extension};
use crate::family::{CheckType, DocumentFamily, marker_line_range};
use crate::registry::CheckRegistry;
use crate::yaml::parse_yaml_file;

use super::YAML_EXTENSIONS;

/// Any `.yml` / `.yaml` document, checked by externally loaded checks only.
pub struct YamlFamily<R> {
    registry: PhantomData<fn() -> R>,
}

impl<R> YamlFamily<R> {
    pub fn new() -> Self {
        Self {
            registry: PhantomData,
        }
    }
}

impl<R> Default for YamlFamily<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CheckRegistry + Default> DocumentFamily for YamlFamily<R> {
    type Registry = R;

    fn parse_file(&self, path: &Path) -> Option<ParsedFile> {
        if !has_extension(path, YAML_EXTENSIONS) {
            return None;
        }
        parse_yaml_file(path)
    }

    fn import_registry(&self) -> R {
        R::default()
    }

    fn start_end_lines(&self, result_configuration: &Node) -> Option<(usize, usize)> {
        marker_line_range(result_configuration)
    }

    fn check_type(&self) -> CheckType {
        CheckType::Yaml
    }
}
