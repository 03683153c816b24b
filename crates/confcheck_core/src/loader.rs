//! Parallel document loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::document::ParsedFile;
use crate::family::DocumentFamily;
use crate::structure::RunMetadata;

/// Successfully parsed files keyed by path.
pub type LoadedFiles = BTreeMap<PathBuf, ParsedFile>;

/// Everything a load call produces.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub files: LoadedFiles,
    /// Metadata of the first pipeline document loaded by this call.
    pub metadata: Option<RunMetadata>,
}

/// Parses `paths` concurrently with the family's parser.
///
/// `filename_fn` maps each candidate to the path actually parsed. Files
/// the parser rejects are left out. Workers only parse; all bookkeeping
/// happens on the calling thread after every parse has finished, walking
/// results in input order.
pub fn load_files<F: DocumentFamily>(
    family: &F,
    paths: &[PathBuf],
    filename_fn: Option<&dyn Fn(&Path) -> PathBuf>,
) -> LoadOutcome {
    let targets: Vec<PathBuf> = paths
        .iter()
        .map(|path| match filename_fn {
            Some(f) => f(path),
            None => path.clone(),
        })
        .collect();

    let results: Vec<(PathBuf, Option<ParsedFile>)> = targets
        .into_par_iter()
        .map(|path| {
            let parsed = family.parse_file(&path);
            (path, parsed)
        })
        .collect();

    let capture_metadata = family.check_type().is_pipeline();
    let mut outcome = LoadOutcome::default();
    for (path, parsed) in results {
        let Some(parsed) = parsed else {
            debug!("Skipping {}: not a parsable document", path.display());
            continue;
        };

        if capture_metadata && outcome.metadata.is_none() {
            outcome.metadata = Some(RunMetadata::from_document(&parsed.document));
        }
        outcome.files.insert(path, parsed);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::CheckType;
    use crate::test_utils::StubFamily;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_files_empty() {
        let family = StubFamily::new(CheckType::Yaml);
        let outcome = load_files(&family, &[], None);
        assert!(outcome.files.is_empty());
        assert!(outcome.metadata.is_none());
    }

    #[test]
    fn test_load_files_omits_unparsable() {
        let family = StubFamily::new(CheckType::Yaml)
            .with_document("a.yml", "a: 1", StubFamily::named_document(None))
            .with_document("c.yml", "c: 1", StubFamily::named_document(None));

        let paths = vec![
            PathBuf::from("a.yml"),
            PathBuf::from("b.yml"),
            PathBuf::from("c.yml"),
        ];
        let outcome = load_files(&family, &paths, None);

        assert_eq!(
            outcome.files.keys().cloned().collect::<Vec<_>>(),
            vec![PathBuf::from("a.yml"), PathBuf::from("c.yml")]
        );
        assert_eq!(outcome.files[&PathBuf::from("a.yml")].lines.len(), 1);
        assert!(outcome.metadata.is_none(), "generic family records no metadata");
    }

    #[test]
    fn test_load_files_applies_filename_fn() {
        let family = StubFamily::new(CheckType::Yaml).with_document(
            "root/a.yml",
            "a: 1",
            StubFamily::named_document(None),
        );

        let join = |p: &Path| Path::new("root").join(p);
        let outcome = load_files(&family, &[PathBuf::from("a.yml")], Some(&join));

        assert!(outcome.files.contains_key(Path::new("root/a.yml")));
    }

    #[test]
    fn test_load_files_captures_first_pipeline_metadata() {
        let family = StubFamily::new(CheckType::GithubActions)
            .with_document("one.yml", "name: one", StubFamily::named_document(Some("one")))
            .with_document("two.yml", "name: two", StubFamily::named_document(Some("two")));

        let paths = vec![
            PathBuf::from("missing.yml"),
            PathBuf::from("one.yml"),
            PathBuf::from("two.yml"),
        ];
        let outcome = load_files(&family, &paths, None);

        assert_eq!(outcome.files.len(), 2);
        let metadata = outcome.metadata.unwrap();
        assert_eq!(metadata.workflow_name.as_deref(), Some("one"));
    }

    #[test]
    fn test_load_files_many_in_parallel() {
        let mut family = StubFamily::new(CheckType::Yaml);
        let mut paths = Vec::new();
        for i in 0..64 {
            let name = format!("f{:02}.yml", i);
            family = family.with_document(&name, "k: v", StubFamily::named_document(None));
            paths.push(PathBuf::from(name));
        }

        let outcome = load_files(&family, &paths, None);
        assert_eq!(outcome.files.len(), 64);
    }
}
