use crate::error::{GimmeError, Result};
use crate::model::OTHER_EXT;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "gimme.config.json";
pub const DEFAULT_MD_PATH: &str = "Readme.md";
pub const MAX_BAR_SIZE: usize = 4096;

/// Where the markdown report goes: `false`, `true` (default path) or an explicit path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkdownTarget {
    Toggle(bool),
    Path(PathBuf),
}

impl MarkdownTarget {
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            MarkdownTarget::Toggle(false) => None,
            MarkdownTarget::Toggle(true) => Some(PathBuf::from(DEFAULT_MD_PATH)),
            MarkdownTarget::Path(path) => Some(path.clone()),
        }
    }
}

impl Default for MarkdownTarget {
    fn default() -> Self {
        MarkdownTarget::Toggle(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    pub repositories: Vec<PathBuf>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub user_aliases: BTreeMap<String, String>,
    pub ignore_users: BTreeSet<String>,
    pub stat_extensions: Vec<String>,
    pub stat_ignore: Vec<String>,
    pub bar_size: usize,
    pub lmargin: usize,
    pub table: bool,
    pub append_to_md: MarkdownTarget,
    pub skip_malformed: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repositories: vec![PathBuf::from(".")],
            since: None,
            until: None,
            user_aliases: BTreeMap::new(),
            ignore_users: BTreeSet::new(),
            stat_extensions: ["rs", "js", "ts", "py", "go", "css", "html", "json", "md"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            stat_ignore: vec![
                r"(^|/)dist/".to_string(),
                r"\.min\.js$".to_string(),
                r"package-lock\.json$".to_string(),
            ],
            bar_size: 50,
            lmargin: 20,
            table: true,
            append_to_md: MarkdownTarget::default(),
            skip_malformed: false,
        }
    }
}

impl RunConfig {
    /// Loads `path` if given, else `gimme.config.json` from the working
    /// directory when present, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::read(default_path)?
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GimmeError::Config(format!("Cannot read {}: {e}", path.display()))
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_json_str(&text)
            .map_err(|e| GimmeError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.repositories.is_empty() {
            return Err(GimmeError::Config(
                "At least one repository must be configured".to_string(),
            ));
        }
        if self.bar_size > MAX_BAR_SIZE {
            return Err(GimmeError::Config(format!(
                "Bar size {} exceeds the maximum of {MAX_BAR_SIZE}",
                self.bar_size
            )));
        }
        for (flag, bound) in [("since", &self.since), ("until", &self.until)] {
            if bound.as_deref().is_some_and(|b| b.trim().is_empty()) {
                return Err(GimmeError::Config(format!("Empty --{flag} date")));
            }
        }
        Ok(())
    }

    /// Writes the default configuration as pretty JSON. Refuses to replace an
    /// existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(GimmeError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        let text = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(path, text + "\n")?;
        Ok(())
    }
}

/// Parse-time view of a [`RunConfig`]: normalized extensions, compiled path filters.
#[derive(Debug, Clone)]
pub struct ParseRules {
    pub extensions: Vec<String>,
    aliases: HashMap<String, String>,
    ignored_authors: HashSet<String>,
    ignored_paths: RegexSet,
}

impl ParseRules {
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let mut extensions: Vec<String> = Vec::with_capacity(config.stat_extensions.len());
        for ext in &config.stat_extensions {
            let ext = ext.trim().trim_start_matches('.').to_lowercase();
            if ext.is_empty() || ext == OTHER_EXT || extensions.contains(&ext) {
                continue;
            }
            extensions.push(ext);
        }

        Ok(Self {
            extensions,
            aliases: config
                .user_aliases
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            ignored_authors: config.ignore_users.iter().cloned().collect(),
            ignored_paths: RegexSet::new(&config.stat_ignore)?,
        })
    }

    pub fn canonical_author<'a>(&'a self, raw: &'a str) -> &'a str {
        self.aliases.get(raw).map(String::as_str).unwrap_or(raw)
    }

    pub fn is_ignored_author(&self, name: &str) -> bool {
        self.ignored_authors.contains(name)
    }

    pub fn is_ignored_path(&self, path: &str) -> bool {
        self.ignored_paths.is_match(path)
    }

    /// The first tracked extension `path` ends with, compared case-insensitively.
    pub fn tracked_extension(&self, path: &str) -> Option<&str> {
        let lower = path.to_lowercase();
        self.extensions
            .iter()
            .find(|ext| {
                lower
                    .strip_suffix(ext.as_str())
                    .and_then(|stem| stem.strip_suffix('.'))
                    .is_some_and(|stem| !stem.is_empty())
            })
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = RunConfig::from_json_str(
            r#"{ "repositories": ["../a", "../b"], "barSize": 10, "appendToMd": "STATS.md" }"#,
        )
        .unwrap();

        assert_eq!(config.repositories, [PathBuf::from("../a"), PathBuf::from("../b")]);
        assert_eq!(config.bar_size, 10);
        assert_eq!(config.lmargin, 20);
        assert!(config.table);
        assert_eq!(config.append_to_md.path(), Some(PathBuf::from("STATS.md")));
    }

    #[test]
    fn markdown_toggle_uses_default_path() {
        let on = RunConfig::from_json_str(r#"{ "appendToMd": true }"#).unwrap();
        let off = RunConfig::from_json_str(r#"{ "appendToMd": false }"#).unwrap();
        assert_eq!(on.append_to_md.path(), Some(PathBuf::from(DEFAULT_MD_PATH)));
        assert_eq!(off.append_to_md.path(), None);
    }

    #[test]
    fn unknown_value_type_is_a_config_error() {
        assert!(RunConfig::from_json_str(r#"{ "barSize": "wide" }"#).is_err());
    }

    #[test]
    fn missing_explicit_config_is_fatal() {
        let dir = tempdir().unwrap();
        let err = RunConfig::load(Some(dir.path().join("nope.json").as_path())).unwrap_err();
        assert!(matches!(err, GimmeError::Config(_)));
    }

    #[test]
    fn write_default_refuses_to_clobber() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        RunConfig::write_default(&path, false).unwrap();
        assert!(RunConfig::write_default(&path, false).is_err());
        RunConfig::write_default(&path, true).unwrap();

        let loaded = RunConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, RunConfig::default());
    }

    #[test]
    fn empty_repository_list_fails_validation() {
        let config = RunConfig {
            repositories: Vec::new(),
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_bar_fails_validation() {
        let at_limit = RunConfig {
            bar_size: MAX_BAR_SIZE,
            ..RunConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let huge = RunConfig {
            bar_size: usize::MAX,
            ..RunConfig::default()
        };
        assert!(matches!(huge.validate(), Err(GimmeError::Config(_))));
    }

    #[test]
    fn rules_normalize_extensions() {
        let config = RunConfig {
            stat_extensions: vec![".JS".into(), "js".into(), "Css".into(), "other".into(), "".into()],
            ..RunConfig::default()
        };
        let rules = ParseRules::from_config(&config).unwrap();
        assert_eq!(rules.extensions, ["js", "css"]);
    }

    #[test]
    fn tracked_extension_matches_suffix_only() {
        let config = RunConfig {
            stat_extensions: vec!["js".into(), "json".into()],
            ..RunConfig::default()
        };
        let rules = ParseRules::from_config(&config).unwrap();
        assert_eq!(rules.tracked_extension("src/App.JS"), Some("js"));
        assert_eq!(rules.tracked_extension("package.json"), Some("json"));
        assert_eq!(rules.tracked_extension("a.min.js"), Some("js"));
        assert_eq!(rules.tracked_extension("notes.jsx"), None);
        assert_eq!(rules.tracked_extension(".js"), None);
        assert_eq!(rules.tracked_extension("Makefile"), None);
    }

    #[test]
    fn aliases_and_ignores() {
        let mut config = RunConfig::default();
        config.user_aliases.insert("Bob".into(), "Robert".into());
        config.ignore_users.insert("ci-bot".into());
        let rules = ParseRules::from_config(&config).unwrap();

        assert_eq!(rules.canonical_author("Bob"), "Robert");
        assert_eq!(rules.canonical_author("Robert"), "Robert");
        assert!(rules.is_ignored_author("ci-bot"));
        assert!(!rules.is_ignored_author("Bob"));
    }

    #[test]
    fn invalid_ignore_pattern_is_rejected() {
        let config = RunConfig {
            stat_ignore: vec!["(unclosed".into()],
            ..RunConfig::default()
        };
        assert!(matches!(
            ParseRules::from_config(&config),
            Err(GimmeError::Pattern(_))
        ));
    }
}
