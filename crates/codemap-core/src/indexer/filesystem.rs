//! Source unit discovery and reading for scan passes.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::errors::{CodemapError, CodemapResult};

const DEFAULT_SOURCE_SUFFIX: &str = ".cs";

const SUFFIX_ENV: &str = "CODEMAP_SOURCE_SUFFIX";
const RESPECT_IGNORE_ENV: &str = "CODEMAP_RESPECT_IGNORE";

/// Where a source unit lives. Opaque to the analysis passes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceLocation {
    Path(PathBuf),
    Index(usize),
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
            SourceLocation::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// Host-side collection of source units.
pub trait SourceProvider {
    /// Enumerate unit locations in aggregation order.
    fn locate(&self) -> CodemapResult<Vec<SourceLocation>>;

    /// Read one unit as UTF-8 text.
    fn read(&self, location: &SourceLocation) -> CodemapResult<String>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// File-name suffix selecting source units, e.g. `.cs`.
    pub suffix: String,
    /// Honour `.gitignore` and friends while walking.
    pub respect_ignore_files: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            respect_ignore_files: true,
        }
    }
}

impl WorkspaceConfig {
    /// Defaults overridden by `CODEMAP_SOURCE_SUFFIX` and `CODEMAP_RESPECT_IGNORE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(suffix) = lookup(SUFFIX_ENV) {
            let suffix = suffix.trim();
            if !suffix.is_empty() {
                config.suffix = suffix.to_string();
            }
        }
        if let Some(val) = lookup(RESPECT_IGNORE_ENV) {
            let v = val.trim().to_lowercase();
            config.respect_ignore_files = !matches!(v.as_str(), "0" | "false" | "no" | "off");
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Filesystem provider
// ---------------------------------------------------------------------------

/// Source units under a directory tree whose file names end with a suffix.
pub struct FsWorkspace {
    root: PathBuf,
    config: WorkspaceConfig,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>, config: WorkspaceConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn matches_suffix(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.config.suffix))
            .unwrap_or(false)
    }
}

impl SourceProvider for FsWorkspace {
    fn locate(&self) -> CodemapResult<Vec<SourceLocation>> {
        std::fs::metadata(&self.root)?;
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(self.config.respect_ignore_files)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(error = %e, "skipping unwalkable entry");
                    continue;
                }
            };
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && self.matches_suffix(entry.path()) {
                found.push(SourceLocation::Path(entry.into_path()));
            }
        }
        debug!(root = %self.root.display(), units = found.len(), "located source units");
        Ok(found)
    }

    fn read(&self, location: &SourceLocation) -> CodemapResult<String> {
        match location {
            SourceLocation::Path(path) => Ok(std::fs::read_to_string(path)?),
            SourceLocation::Index(_) => Err(CodemapError::Source(format!(
                "{location} is not a filesystem location"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory provider
// ---------------------------------------------------------------------------

/// Units held in memory; `None` stands for a unit that cannot be read.
#[derive(Clone, Debug, Default)]
pub struct InMemorySources {
    units: Vec<Option<String>>,
}

impl InMemorySources {
    pub fn new(units: Vec<Option<String>>) -> Self {
        Self { units }
    }

    pub fn from_texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self {
            units: texts.into_iter().map(|t| Some(t.into())).collect(),
        }
    }
}

impl SourceProvider for InMemorySources {
    fn locate(&self) -> CodemapResult<Vec<SourceLocation>> {
        Ok((0..self.units.len()).map(SourceLocation::Index).collect())
    }

    fn read(&self, location: &SourceLocation) -> CodemapResult<String> {
        match location {
            SourceLocation::Index(index) => self
                .units
                .get(*index)
                .and_then(|unit| unit.clone())
                .ok_or_else(|| CodemapError::Source(format!("unit {location} is unreadable"))),
            SourceLocation::Path(_) => Err(CodemapError::Source(format!(
                "{location} is not an in-memory location"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    // -- Config -------------------------------------------------------------

    #[test]
    fn test_config_defaults() {
        let config = WorkspaceConfig::from_lookup(|_| None);
        assert_eq!(config, WorkspaceConfig::default());
        assert_eq!(config.suffix, ".cs");
        assert!(config.respect_ignore_files);
    }

    #[test]
    fn test_config_overrides() {
        let config = WorkspaceConfig::from_lookup(|key| match key {
            SUFFIX_ENV => Some(".java".to_string()),
            RESPECT_IGNORE_ENV => Some("Off".to_string()),
            _ => None,
        });
        assert_eq!(config.suffix, ".java");
        assert!(!config.respect_ignore_files);
    }

    #[test]
    fn test_config_blank_suffix_keeps_default() {
        let config =
            WorkspaceConfig::from_lookup(|key| (key == SUFFIX_ENV).then(|| "  ".to_string()));
        assert_eq!(config.suffix, ".cs");
    }

    // -- Filesystem ---------------------------------------------------------

    #[test]
    fn test_fs_workspace_filters_by_suffix_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b/Second.cs", "class Second {}");
        write(dir.path(), "a/First.cs", "class First {}");
        write(dir.path(), "notes.txt", "class Ignored {}");

        let ws = FsWorkspace::new(dir.path(), WorkspaceConfig::default());
        let located = ws.locate().unwrap();
        let names: Vec<String> = located
            .iter()
            .map(|loc| match loc {
                SourceLocation::Path(p) => p.file_name().unwrap().to_string_lossy().to_string(),
                SourceLocation::Index(_) => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["First.cs", "Second.cs"]);
        assert_eq!(ws.read(&located[0]).unwrap(), "class First {}");
    }

    #[test]
    fn test_fs_workspace_read_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ws = FsWorkspace::new(dir.path(), WorkspaceConfig::default());
        let missing = SourceLocation::Path(dir.path().join("Gone.cs"));
        assert!(matches!(ws.read(&missing), Err(CodemapError::Io(_))));
    }

    #[test]
    fn test_fs_workspace_read_non_utf8_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bad.cs");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let ws = FsWorkspace::new(dir.path(), WorkspaceConfig::default());
        assert!(ws.read(&SourceLocation::Path(path)).is_err());
    }

    #[test]
    fn test_fs_workspace_missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ws = FsWorkspace::new(dir.path().join("nope"), WorkspaceConfig::default());
        assert!(matches!(ws.locate(), Err(CodemapError::Io(_))));
    }

    // -- In-memory ----------------------------------------------------------

    #[test]
    fn test_in_memory_sources() {
        let sources = InMemorySources::new(vec![Some("a".to_string()), None]);
        let located = sources.locate().unwrap();
        assert_eq!(located.len(), 2);
        assert_eq!(sources.read(&located[0]).unwrap(), "a");
        assert!(matches!(
            sources.read(&located[1]),
            Err(CodemapError::Source(_))
        ));
    }
}
