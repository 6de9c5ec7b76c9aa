use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults loadable from a YAML file, merged under the command line.
///
/// Locations, in order of precedence:
/// 1. `.patscan.yaml` in the current directory
/// 2. `<config dir>/patscan/config.yaml`
///
/// Example:
/// ```yaml
/// ignore_case: true
/// line_number: true
/// before_context: 2
/// after_context: 2
/// ignore_patterns:
///   - "**/target/**"
/// file_extensions:
///   - "rs"
/// log_level: "debug"
/// ```
///
/// `ignore_patterns` and `file_extensions` only apply to recursive walks
/// and have no flag equivalents; everything else is a flag fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Fold case when matching.
    #[serde(default)]
    pub ignore_case: bool,

    /// Prefix output lines with their line number.
    #[serde(default)]
    pub line_number: bool,

    /// Leading context lines per match.
    #[serde(default)]
    pub before_context: usize,

    /// Trailing context lines per match.
    #[serde(default)]
    pub after_context: usize,

    /// Glob patterns pruned from recursive walks.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Extension allowlist for recursive walks; absent means all files.
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,

    /// Log level for the diagnostic subscriber (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchDefaults {
    fn default() -> Self {
        SearchDefaults {
            ignore_case: false,
            line_number: false,
            before_context: 0,
            after_context: 0,
            ignore_patterns: Vec::new(),
            file_extensions: None,
            log_level: default_log_level(),
        }
    }
}

impl SearchDefaults {
    /// Loads defaults from the standard locations; missing files are fine.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads defaults, preferring `path` when given. Later sources override
    /// earlier ones, so the working-directory file beats the global one.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let candidates = [
            dirs::config_dir().map(|dir| dir.join("patscan/config.yaml")),
            Some(PathBuf::from(".patscan.yaml")),
            path.map(Path::to_path_buf),
        ];

        for candidate in candidates.iter().flatten() {
            if candidate.exists() {
                builder = builder.add_source(File::from(candidate.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Lays command-line values over the file-provided defaults. Flags are
    /// additive and counts win when nonzero, so a flag can enable but never
    /// silently disable a configured default.
    pub fn merge_cli(
        mut self,
        ignore_case: bool,
        line_number: bool,
        before_context: usize,
        after_context: usize,
    ) -> Self {
        self.ignore_case |= ignore_case;
        self.line_number |= line_number;
        if before_context > 0 {
            self.before_context = before_context;
        }
        if after_context > 0 {
            self.after_context = after_context;
        }
        self
    }
}
