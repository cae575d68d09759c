//! Analysis driver: turns a set of input files into one snapshot.
//!
//! All per-run state lives in `AnalyzerConfig`; nothing here reads
//! globals, so runs with identical configs over identical inputs produce
//! identical snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::aggregate::Aggregator;
use crate::common::relative_to_root;
use crate::diagnostics::SkipReason;
use crate::history::HistoryReader;
use crate::ingest::cpp::CppFlowParser;
use crate::ingest::python::PythonFlowParser;
use crate::ingest::{Language, SourceAnalyzer};
use crate::snapshot::Snapshot;

/// Per-run configuration, passed explicitly instead of held in globals.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// Root used to relativize file paths in emitted facts.
    pub root: Option<PathBuf>,
    /// Force one language instead of detecting by extension.
    pub language: Option<Language>,
    /// Extra compiler flags, reserved for C++ inputs.
    pub clang_args: Vec<String>,
    /// Override the snapshot timestamp, for reproducible output.
    pub generated_at: Option<String>,
}

impl AnalyzerConfig {
    fn timestamp(&self) -> String {
        match &self.generated_at {
            Some(ts) => ts.clone(),
            None => chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }
}

pub struct Analyzer {
    config: AnalyzerConfig,
    python: PythonFlowParser,
    cpp: CppFlowParser,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            python: PythonFlowParser::new()?,
            cpp: CppFlowParser::new()?,
            config,
        })
    }

    /// Analyze files on disk. Unreadable and unsupported inputs become
    /// skip markers rather than failing the whole run.
    pub fn analyze_files(&mut self, files: &[PathBuf]) -> Snapshot {
        let mut aggregator = Aggregator::new();
        for path in files {
            let display = relative_to_root(path, self.config.root.as_deref());
            if !path.is_file() {
                aggregator.skip_file(display, SkipReason::NotAFile);
                continue;
            }
            let Some(language) = self.language_for(path) else {
                aggregator.skip_file(display, SkipReason::UnsupportedLanguage);
                continue;
            };
            let Ok(source) = fs::read(path) else {
                aggregator.skip_file(display, SkipReason::NotAFile);
                continue;
            };
            self.ingest(&mut aggregator, language, &display, &source);
        }
        aggregator.finish(self.config.timestamp())
    }

    /// Analyze file contents pulled from a revision instead of disk.
    /// Paths missing in that revision become skip markers, as does the
    /// whole file set when the revision itself does not resolve.
    pub fn analyze_at_revision(
        &mut self,
        reader: &HistoryReader,
        rev: &str,
        files: &[PathBuf],
    ) -> anyhow::Result<Snapshot> {
        let mut aggregator = Aggregator::new();
        if !reader.revision_exists(rev) {
            eprintln!("Warning: revision {} does not resolve", rev);
            for path in files {
                let display = relative_to_root(path, self.config.root.as_deref());
                aggregator.skip_file(display, SkipReason::MissingInRevision);
            }
            return Ok(aggregator.finish(self.config.timestamp()));
        }
        for path in files {
            let display = relative_to_root(path, self.config.root.as_deref());
            let Some(language) = self.language_for(path) else {
                aggregator.skip_file(display, SkipReason::UnsupportedLanguage);
                continue;
            };
            match reader.file_at_revision(rev, path)? {
                Some(source) => self.ingest(&mut aggregator, language, &display, &source),
                None => aggregator.skip_file(display, SkipReason::MissingInRevision),
            }
        }
        Ok(aggregator.finish(self.config.timestamp()))
    }

    fn ingest(&mut self, aggregator: &mut Aggregator, language: Language, display: &str, source: &[u8]) {
        let walker: &mut dyn SourceAnalyzer = match language {
            Language::Python => &mut self.python,
            Language::Cpp => &mut self.cpp,
        };
        match walker.analyze(Path::new(display), source) {
            Some(facts) => aggregator.add_file(facts),
            None => aggregator.skip_file(display, SkipReason::ParseFailure),
        }
    }

    fn language_for(&self, path: &Path) -> Option<Language> {
        self.config.language.or_else(|| Language::from_path(path))
    }
}

/// Recursively discover analyzable files under `root`, sorted for a
/// stable input order. Hidden directories are skipped.
pub fn discover_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || entry
                    .file_name()
                    .to_str()
                    .map(|name| !name.starts_with('.'))
                    .unwrap_or(true)
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| Language::from_path(path).is_some())
        .collect();
    files.sort();
    files
}
