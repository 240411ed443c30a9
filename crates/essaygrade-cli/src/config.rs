//! CLI configuration: vocabulary, engine tunables, and display criteria.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use essaygrade_core::matcher::MatchMode;
use essaygrade_core::rubric::{Criterion, GradeScale, RubricTemplate};
use essaygrade_core::vocabulary::{EmbeddedVocabulary, FileVocabulary, VocabularySource};
use essaygrade_core::{Engine, EngineConfig};

/// Top-level essaygrade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssaygradeConfig {
    /// External vocabulary file; the embedded vocabulary when unset.
    #[serde(default)]
    pub vocabulary: Option<PathBuf>,
    /// How vocabulary phrases are matched.
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Max essays graded at once in `batch`.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for batch reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// How the final grade is displayed.
    #[serde(default)]
    pub grade_scale: GradeScale,
    /// Engine thresholds. `match_mode` here is ignored in favour of the
    /// top-level key.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Display criteria; the ENEM competencies when empty.
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./essaygrade-results")
}

impl Default for EssaygradeConfig {
    fn default() -> Self {
        Self {
            vocabulary: None,
            match_mode: MatchMode::default(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            grade_scale: GradeScale::default(),
            engine: EngineConfig::default(),
            criteria: Vec::new(),
        }
    }
}

impl EssaygradeConfig {
    /// Engine thresholds with the configured match mode applied.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            match_mode: self.match_mode,
            ..self.engine.clone()
        }
    }

    /// Build the engine from the configured vocabulary.
    pub fn build_engine(&self) -> Result<Engine> {
        let source: Box<dyn VocabularySource> = match &self.vocabulary {
            Some(path) => Box::new(FileVocabulary::new(path)),
            None => Box::new(EmbeddedVocabulary),
        };
        Engine::from_source(&*source, self.engine_config())
            .with_context(|| format!("failed to load vocabulary from {}", source.describe()))
    }

    /// Display criteria, with `rubric` taking precedence over the config file.
    pub fn criteria(&self, rubric: Option<&Path>) -> Result<Vec<Criterion>> {
        if let Some(path) = rubric {
            let template = RubricTemplate::load(path)
                .with_context(|| format!("failed to load rubric {}", path.display()))?;
            return Ok(template.criteria);
        }
        if self.criteria.is_empty() {
            Ok(RubricTemplate::enem().criteria)
        } else {
            Ok(self.criteria.clone())
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `essaygrade.toml` in the current directory
/// 2. `~/.config/essaygrade/config.toml`
///
/// `ESSAYGRADE_VOCABULARY` overrides the vocabulary path.
pub fn load_config_from(path: Option<&Path>) -> Result<EssaygradeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("essaygrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<EssaygradeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => EssaygradeConfig::default(),
    };

    if let Ok(vocabulary) = std::env::var("ESSAYGRADE_VOCABULARY") {
        if !vocabulary.is_empty() {
            config.vocabulary = Some(PathBuf::from(vocabulary));
        }
    }

    config.vocabulary = config.vocabulary.as_deref().map(resolve_path);
    config.output_dir = resolve_path(&config.output_dir);

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("essaygrade"))
}
