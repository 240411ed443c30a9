//! Rubric presentation adapter.
//!
//! A rubric template relabels and rescales the five competency scores for
//! display (e.g. a school that grades each criterion out of 10). Templates
//! never influence scoring.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RubricError;
use crate::model::{AnalysisResult, Band, CompetencyId};

/// One display criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Weight in percent of the final grade.
    pub weight: f64,
    /// Points the criterion is displayed out of.
    #[serde(default = "default_max_points")]
    pub max_points: u32,
}

fn default_max_points() -> u32 {
    200
}

/// A named list of criteria mapped positionally onto C1..C5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricTemplate {
    pub id: String,
    pub name: String,
    pub criteria: Vec<Criterion>,
}

/// Intermediate TOML structure for rubric files.
#[derive(Debug, Deserialize)]
struct TomlRubricFile {
    rubric: TomlRubricHeader,
    #[serde(default)]
    criteria: Vec<Criterion>,
}

#[derive(Debug, Deserialize)]
struct TomlRubricHeader {
    id: String,
    name: String,
}

impl RubricTemplate {
    /// The five ENEM competencies, 20% and 200 points each.
    pub fn enem() -> Self {
        Self {
            id: "enem".into(),
            name: "ENEM".into(),
            criteria: CompetencyId::ALL
                .iter()
                .map(|id| Criterion {
                    name: format!("Competência {}", id.index() + 1),
                    description: id.label().to_string(),
                    weight: 20.0,
                    max_points: 200,
                })
                .collect(),
        }
    }

    /// Parse a rubric from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RubricError> {
        let parsed: TomlRubricFile = toml::from_str(content)?;
        let template = Self {
            id: parsed.rubric.id,
            name: parsed.rubric.name,
            criteria: parsed.criteria,
        };
        template.check()?;
        Ok(template)
    }

    /// Load a rubric from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RubricError> {
        let content = std::fs::read_to_string(path).map_err(|source| RubricError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject templates that cannot be displayed at all.
    fn check(&self) -> Result<(), RubricError> {
        if self.criteria.is_empty() {
            return Err(RubricError::Empty(self.id.clone()));
        }
        for criterion in &self.criteria {
            if !criterion.weight.is_finite() || criterion.weight < 0.0 {
                return Err(RubricError::InvalidCriterion {
                    name: criterion.name.clone(),
                    reason: format!("weight {} must be a non-negative number", criterion.weight),
                });
            }
            if criterion.max_points == 0 {
                return Err(RubricError::InvalidCriterion {
                    name: criterion.name.clone(),
                    reason: "max_points must be greater than zero".into(),
                });
            }
        }
        Ok(())
    }
}

/// A competency score as shown under a caller's criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub name: String,
    /// The competency this criterion displays, `None` for extra criteria.
    pub competency: Option<CompetencyId>,
    /// Score rescaled to `max_points`.
    pub score: f64,
    pub max_points: u32,
    /// Weight as a fraction (20% becomes 0.2).
    pub weight: f64,
}

/// Map competency `i` onto criterion `i`; criteria beyond the fifth score 0.
pub fn present(result: &AnalysisResult, criteria: &[Criterion]) -> Vec<CriterionScore> {
    criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let competency = CompetencyId::ALL.get(i).copied();
            let raw = competency.map(|id| result.score(id).points()).unwrap_or(0);
            CriterionScore {
                name: criterion.name.clone(),
                competency,
                score: f64::from(raw) * f64::from(criterion.max_points)
                    / f64::from(Band::MAX.points()),
                max_points: criterion.max_points,
                weight: criterion.weight / 100.0,
            }
        })
        .collect()
}

/// How the final grade is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeScale {
    /// 0 to 1000, the native scale.
    #[default]
    Thousand,
    /// 0 to 10 with one decimal place.
    Decimal,
}

impl GradeScale {
    pub fn value(self, grade: u16) -> f64 {
        match self {
            GradeScale::Thousand => f64::from(grade),
            GradeScale::Decimal => f64::from(grade) / 100.0,
        }
    }

    pub fn format(self, grade: u16) -> String {
        match self {
            GradeScale::Thousand => format!("{grade}/1000"),
            GradeScale::Decimal => format!("{:.1}/10", self.value(grade)),
        }
    }
}

impl fmt::Display for GradeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeScale::Thousand => write!(f, "thousand"),
            GradeScale::Decimal => write!(f, "decimal"),
        }
    }
}

impl FromStr for GradeScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thousand" | "1000" => Ok(GradeScale::Thousand),
            "decimal" | "10" => Ok(GradeScale::Decimal),
            other => Err(format!("unknown grade scale: {other}")),
        }
    }
}

/// A warning from rubric validation.
#[derive(Debug, Clone)]
pub struct RubricWarning {
    /// Criterion the warning refers to, if any.
    pub criterion: Option<String>,
    pub message: String,
}

/// Check a rubric for issues that do not prevent display.
pub fn validate_rubric(template: &RubricTemplate) -> Vec<RubricWarning> {
    let mut warnings = Vec::new();

    let total: f64 = template.criteria.iter().map(|c| c.weight).sum();
    if (total - 100.0).abs() > 0.01 {
        warnings.push(RubricWarning {
            criterion: None,
            message: format!("weights sum to {total}, expected 100"),
        });
    }

    if template.criteria.len() != CompetencyId::ALL.len() {
        warnings.push(RubricWarning {
            criterion: None,
            message: format!(
                "{} criteria for {} competencies; extra criteria display 0 and missing ones are hidden",
                template.criteria.len(),
                CompetencyId::ALL.len()
            ),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for criterion in &template.criteria {
        if !seen.insert(criterion.name.as_str()) {
            warnings.push(RubricWarning {
                criterion: Some(criterion.name.clone()),
                message: format!("duplicate criterion name: {}", criterion.name),
            });
        }
    }

    warnings
}
