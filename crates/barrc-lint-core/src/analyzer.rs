//! Multi-file driver: discovers C sources and runs the rule engine on each.

use crate::config::Config;
use crate::context::FileContext;
use crate::engine::RuleEngine;
use crate::rule::{Rule, RuleBox};
use crate::types::{FileError, LintResult, Violation};

use rayon::prelude::*;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking the source tree.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    enabled: Option<Vec<String>>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds several boxed rules to the analyzer.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Restricts analysis to the given rule codes or names.
    #[must_use]
    pub fn enable_only<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut patterns = self.exclude_patterns;
        patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = patterns
            .iter()
            .map(String::as_str)
            .map(glob::Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut engine = RuleEngine::builder()
            .rules(self.rules)
            .config(config.clone());
        if let Some(enabled) = self.enabled {
            engine = engine.enable_only(enabled);
        }

        Ok(Analyzer {
            root,
            engine: engine.build(),
            exclude,
            extensions: config.analyzer.extensions.clone(),
            respect_gitignore: config.analyzer.respect_gitignore,
            parallelism: config.analyzer.parallelism,
        })
    }
}

/// Outcome of analyzing one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was analyzed.
    Checked(Vec<Violation>),
    /// The file could not be tokenized.
    Failed(FileError),
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    engine: RuleEngine,
    exclude: Vec<glob::Pattern>,
    extensions: Vec<String>,
    respect_gitignore: bool,
    parallelism: Option<usize>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory or file being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the rule engine.
    #[must_use]
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Analyzes all files and returns the results.
    ///
    /// A file that fails to tokenize is recorded in [`LintResult::errors`]
    /// and does not stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let outcomes = match self.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| self.analyze_all(&files)),
            None => self.analyze_all(&files),
        };

        let mut result = LintResult::new();
        for outcome in outcomes {
            result.files_checked += 1;
            match outcome? {
                FileOutcome::Checked(violations) => result.violations.extend(violations),
                FileOutcome::Failed(error) => result.errors.push(error),
            }
        }
        result.sort();

        info!(
            "Analysis complete: {} violations, {} file errors in {} files",
            result.violations.len(),
            result.errors.len(),
            result.files_checked
        );

        Ok(result)
    }

    fn analyze_all(&self, files: &[PathBuf]) -> Vec<Result<FileOutcome, AnalyzerError>> {
        files
            .par_iter()
            .map(|path| self.analyze_file(path))
            .collect()
    }

    /// Reads and analyzes a single file.
    ///
    /// Bytes that are not valid UTF-8 (Latin-1 comments, for instance) are
    /// replaced with U+FFFD before tokenizing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn analyze_file(&self, path: &Path) -> Result<FileOutcome, AnalyzerError> {
        debug!("Analyzing: {}", path.display());
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        if matches!(content, Cow::Owned(_)) {
            warn!("{} is not valid UTF-8, decoding lossily", path.display());
        }
        Ok(self.analyze_source(path, &content))
    }

    /// Analyzes source text as if read from `path`.
    #[must_use]
    pub fn analyze_source(&self, path: &Path, content: &str) -> FileOutcome {
        let ctx = FileContext::new(path, content, self.base_dir());
        match self.engine.check_source(&ctx) {
            Ok(violations) => FileOutcome::Checked(violations),
            Err(error) => {
                warn!("Failed to tokenize {}: {}", ctx.path.display(), error);
                FileOutcome::Failed(FileError::from_lex(ctx.path, error))
            }
        }
    }

    /// Directory that reported paths are relative to.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(self.root.as_path())
        } else {
            &self.root
        }
    }

    /// Discovers all C source files to analyze, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk fails.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut files = Vec::new();
        let walker = ignore::WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.has_extension(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(entry.into_path());
        }

        files.sort();
        Ok(files)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }

    /// Checks if a path should be excluded, matching both the full path and
    /// the path relative to the root.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{DeclKind, TranslationUnit};
    use crate::rule::Category;
    use crate::types::Severity;
    use std::fs;

    struct FlagFunctions;

    impl Rule for FlagFunctions {
        fn name(&self) -> &'static str {
            "flag-functions"
        }
        fn code(&self) -> &'static str {
            "FLAG_FUNCTIONS"
        }
        fn category(&self) -> Category {
            Category::Naming
        }
        fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
            unit.of_kind(DeclKind::Function)
                .map(|d| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        Severity::Error,
                        ctx.decl_location(d),
                        d.name.clone(),
                    )
                })
                .collect()
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("src/b.c"), "void B_Run(void) {}\n").unwrap();
        fs::write(dir.path().join("src/a.h"), "void A_Run(void);\n").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "void Not_C(void);\n").unwrap();
        fs::write(dir.path().join("build/gen.c"), "void Gen_Run(void);\n").unwrap();
        fs::write(dir.path().join("src/broken.c"), "void X_Y(void);\n/* open").unwrap();
        dir
    }

    #[test]
    fn test_analyze_directory() {
        let dir = project();
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .rule(FlagFunctions)
            .config(Config::default())
            .build()
            .unwrap();

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 3);

        let messages: Vec<_> = result.violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["A_Run", "B_Run"]);
        assert_eq!(result.violations[0].location.file, PathBuf::from("src/a.h"));

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file, PathBuf::from("src/broken.c"));
        assert_eq!((result.errors[0].line, result.errors[0].column), (2, 1));
    }

    #[test]
    fn test_single_file_root() {
        let dir = project();
        let analyzer = Analyzer::builder()
            .root(dir.path().join("src/b.c"))
            .rule(FlagFunctions)
            .build()
            .unwrap();

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations[0].location.file, PathBuf::from("b.c"));
    }

    #[test]
    fn test_parallelism_setting() {
        let dir = project();
        let mut config = Config::default();
        config.analyzer.parallelism = Some(2);
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .rule(FlagFunctions)
            .config(config)
            .build()
            .unwrap();
        assert_eq!(analyzer.analyze().unwrap().violations.len(), 2);
    }

    #[test]
    fn test_non_utf8_file_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.c"), "void Good_Run(void) {}\n").unwrap();
        fs::write(
            dir.path().join("latin1.c"),
            b"/* 25 \xB0C */\nvoid Temp_Read(void) {}\n",
        )
        .unwrap();
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .rule(FlagFunctions)
            .build()
            .unwrap();

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 2);
        assert!(result.errors.is_empty());
        let found: Vec<_> = result
            .violations
            .iter()
            .map(|v| (v.message.as_str(), v.location.line))
            .collect();
        assert_eq!(found, vec![("Good_Run", 1), ("Temp_Read", 2)]);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }
}
