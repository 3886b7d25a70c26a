use chrono::NaiveDateTime;
use std::fmt::Write as _;
use std::path::Path;

pub const MANIFEST_FILE_NAME: &str = "backup_manifest.txt";

const CREATED_PREFIX: &str = "Backup created: ";
const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
// Older manifests carry fractional seconds.
const CREATED_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const ENTRIES_HEADER: &str = "Files backed up:";
const ENTRY_MARKER: &str = "- ";
const SOURCE_SEPARATOR: &str = " <- ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Base name of the captured path; also its file name inside the archive.
    pub name: String,
    pub is_dir: bool,
    /// Home-relative source path, recorded only when it differs from `name`.
    pub source: Option<String>,
}

impl ManifestEntry {
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            source: None,
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.source = (source != self.name).then_some(source);
        self
    }

    /// Home-relative path the entry was captured from.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.name)
    }

    fn render(&self) -> String {
        let mut line = self.name.clone();
        if self.is_dir {
            line.push('/');
        }
        if let Some(source) = &self.source {
            line.push_str(SOURCE_SEPARATOR);
            line.push_str(source);
        }
        line
    }

    fn parse(raw: &str) -> Option<Self> {
        let (label, source) = match raw.split_once(SOURCE_SEPARATOR) {
            Some((label, source)) => (label, Some(source.trim().to_string())),
            None => (raw, None),
        };
        let label = label.trim();
        let (name, is_dir) = match label.strip_suffix('/') {
            Some(name) => (name, true),
            None => (label, false),
        };
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            is_dir,
            source: source.filter(|source| !source.is_empty()),
        })
    }
}

/// Plain-text sidecar describing what an archive holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub created: Option<NaiveDateTime>,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    #[must_use]
    pub fn new(created: NaiveDateTime, entries: Vec<ManifestEntry>) -> Self {
        Self {
            created: Some(created),
            entries,
        }
    }

    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Fold `older` into `self`, keeping entries of `older` first and
    /// dropping duplicates by name.
    pub fn merge_after(&mut self, older: Manifest) {
        let mut merged = older.entries;
        for entry in self.entries.drain(..) {
            if let Some(existing) = merged.iter_mut().find(|e| e.name == entry.name) {
                *existing = entry;
            } else {
                merged.push(entry);
            }
        }
        self.entries = merged;
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(created) = self.created {
            let _ = writeln!(out, "{CREATED_PREFIX}{}", created.format(CREATED_FORMAT));
        }
        let _ = writeln!(out, "{ENTRIES_HEADER}");
        for entry in &self.entries {
            let _ = writeln!(out, "  {ENTRY_MARKER}{}", entry.render());
        }
        out
    }

    /// Lenient parser: unknown lines are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut manifest = Self::default();
        for line in content.lines() {
            if let Some(created) = line.strip_prefix(CREATED_PREFIX) {
                manifest.created =
                    NaiveDateTime::parse_from_str(created.trim(), CREATED_PARSE_FORMAT).ok();
            } else if let Some(raw) = line.trim_start().strip_prefix(ENTRY_MARKER)
                && let Some(entry) = ManifestEntry::parse(raw)
            {
                manifest.entries.push(entry);
            }
        }
        manifest
    }

    pub fn write_to(&self, archive_root: &Path) -> std::io::Result<()> {
        std::fs::write(archive_root.join(MANIFEST_FILE_NAME), self.render())
    }
}
