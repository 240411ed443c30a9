//! Core data model types for essaygrade.
//!
//! These are the value types every analysis produces: banded competency
//! scores with their observations, the extracted proposal elements, and the
//! complete analysis result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five rubric competencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompetencyId {
    C1,
    C2,
    C3,
    C4,
    C5,
}

impl CompetencyId {
    /// All competencies in rubric order.
    pub const ALL: [CompetencyId; 5] = [
        CompetencyId::C1,
        CompetencyId::C2,
        CompetencyId::C3,
        CompetencyId::C4,
        CompetencyId::C5,
    ];

    /// Zero-based position in rubric order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Full rubric wording.
    pub fn label(self) -> &'static str {
        match self {
            CompetencyId::C1 => {
                "Demonstrar domínio da modalidade escrita formal da língua portuguesa."
            }
            CompetencyId::C2 => {
                "Compreender a proposta de redação e aplicar conceitos das várias áreas de conhecimento."
            }
            CompetencyId::C3 => {
                "Selecionar, relacionar, organizar e interpretar informações, fatos, opiniões e argumentos em defesa de um ponto de vista."
            }
            CompetencyId::C4 => {
                "Demonstrar conhecimento dos mecanismos linguísticos necessários para a construção da argumentação."
            }
            CompetencyId::C5 => "Elaborar proposta de intervenção para o problema abordado.",
        }
    }

    /// Short name used in feedback headlines and tables.
    pub fn short_label(self) -> &'static str {
        match self {
            CompetencyId::C1 => "norma culta",
            CompetencyId::C2 => "repertório e tema",
            CompetencyId::C3 => "argumentação",
            CompetencyId::C4 => "coesão textual",
            CompetencyId::C5 => "proposta de intervenção",
        }
    }
}

impl fmt::Display for CompetencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.index() + 1)
    }
}

impl FromStr for CompetencyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "C1" | "1" => Ok(CompetencyId::C1),
            "C2" | "2" => Ok(CompetencyId::C2),
            "C3" | "3" => Ok(CompetencyId::C3),
            "C4" | "4" => Ok(CompetencyId::C4),
            "C5" | "5" => Ok(CompetencyId::C5),
            other => Err(format!("unknown competency: {other}")),
        }
    }
}

/// A competency score: one of 0, 40, 80, 120, 160, 200.
///
/// The only ways to build a `Band` snap or clamp to a valid value, so a score
/// outside the six levels cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Band(u16);

impl Band {
    /// Distance between adjacent bands.
    pub const STEP: u16 = 40;
    pub const ZERO: Band = Band(0);
    pub const MAX: Band = Band(200);

    /// The six bands in ascending order.
    pub const ALL: [Band; 6] = [
        Band(0),
        Band(40),
        Band(80),
        Band(120),
        Band(160),
        Band(200),
    ];

    /// Snap an arbitrary point value down to the nearest band (180 -> 160).
    pub fn floor(points: u16) -> Band {
        let capped = points.min(Self::MAX.0);
        Band(capped - capped % Self::STEP)
    }

    /// The band at `level` (0..=5), saturating at the top.
    pub fn from_level(level: usize) -> Band {
        Self::ALL[level.min(Self::ALL.len() - 1)]
    }

    pub fn points(self) -> u16 {
        self.0
    }

    /// Position of this band, 0 for the floor and 5 for the top.
    pub fn level(self) -> usize {
        (self.0 / Self::STEP) as usize
    }

    /// Move up `steps` bands, stopping at 200.
    pub fn raise(self, steps: usize) -> Band {
        Band::from_level(self.level() + steps)
    }

    /// Move down `steps` bands, stopping at 0.
    pub fn lower(self, steps: usize) -> Band {
        Band::from_level(self.level().saturating_sub(steps))
    }
}

impl Default for Band {
    fn default() -> Self {
        Band::ZERO
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Band {
    type Error = String;

    fn try_from(points: u16) -> Result<Self, Self::Error> {
        if points <= Self::MAX.0 && points % Self::STEP == 0 {
            Ok(Band(points))
        } else {
            Err(format!("{points} is not a valid band"))
        }
    }
}

impl From<Band> for u16 {
    fn from(band: Band) -> u16 {
        band.0
    }
}

/// How an observation should be routed into feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

/// A qualitative remark attached to a competency score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub tone: Tone,
    pub message: String,
}

impl Observation {
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Positive,
            message: message.into(),
        }
    }

    pub fn neutral(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Neutral,
            message: message.into(),
        }
    }

    pub fn negative(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Negative,
            message: message.into(),
        }
    }
}

/// The verdict for one competency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub id: CompetencyId,
    pub label: String,
    pub score: Band,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl CompetencyScore {
    pub fn new(id: CompetencyId, score: Band, observations: Vec<Observation>) -> Self {
        Self {
            id,
            label: id.label().to_string(),
            score,
            observations,
        }
    }
}

/// Cue phrases found for one proposal slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMatch {
    #[serde(default)]
    pub matches: Vec<String>,
    pub present: bool,
}

impl SlotMatch {
    pub fn from_matches(matches: Vec<String>) -> Self {
        Self {
            present: !matches.is_empty(),
            matches,
        }
    }
}

/// The five intervention-proposal slots found in the final paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalElements {
    pub agent: SlotMatch,
    pub action: SlotMatch,
    pub means: SlotMatch,
    pub purpose: SlotMatch,
    pub elaboration: SlotMatch,
    /// Number of present slots, 0..=5.
    pub elements_found: u8,
    pub respects_human_rights: bool,
    /// Rights-violation phrases found, empty when `respects_human_rights`.
    #[serde(default)]
    pub violations: Vec<String>,
}

impl ProposalElements {
    /// No slot present and no violation; used when there is nothing to scan.
    pub fn empty() -> Self {
        Self {
            agent: SlotMatch::default(),
            action: SlotMatch::default(),
            means: SlotMatch::default(),
            purpose: SlotMatch::default(),
            elaboration: SlotMatch::default(),
            elements_found: 0,
            respects_human_rights: true,
            violations: Vec::new(),
        }
    }

    /// Slots in canonical order, paired with their display names.
    pub fn slots(&self) -> [(&'static str, &SlotMatch); 5] {
        [
            ("agente", &self.agent),
            ("ação", &self.action),
            ("meio", &self.means),
            ("finalidade", &self.purpose),
            ("detalhamento", &self.elaboration),
        ]
    }
}

/// Size of the analyzed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub sentence_count: usize,
}

/// The complete output of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// One score per competency, in rubric order.
    pub competency_scores: [CompetencyScore; 5],
    /// Sum of the five scores, within 0..=1000.
    pub final_grade: u16,
    pub proposal: ProposalElements,
    pub stats: DocumentStats,
}

impl AnalysisResult {
    /// Assemble a result, deriving the final grade from the scores.
    pub fn new(
        competency_scores: [CompetencyScore; 5],
        proposal: ProposalElements,
        stats: DocumentStats,
    ) -> Self {
        let sum: u16 = competency_scores.iter().map(|c| c.score.points()).sum();
        Self {
            final_grade: sum.min(1000),
            competency_scores,
            proposal,
            stats,
        }
    }

    pub fn score(&self, id: CompetencyId) -> Band {
        self.competency_scores[id.index()].score
    }

    pub fn competency(&self, id: CompetencyId) -> &CompetencyScore {
        &self.competency_scores[id.index()]
    }
}

/// Coarse length tier of an essay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextQuality {
    Insufficient,
    Low,
    Medium,
    High,
}

impl TextQuality {
    pub fn from_word_count(words: usize) -> Self {
        match words {
            w if w >= 300 => TextQuality::High,
            w if w >= 200 => TextQuality::Medium,
            w if w >= 100 => TextQuality::Low,
            _ => TextQuality::Insufficient,
        }
    }
}

impl fmt::Display for TextQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextQuality::High => write!(f, "high"),
            TextQuality::Medium => write!(f, "medium"),
            TextQuality::Low => write!(f, "low"),
            TextQuality::Insufficient => write!(f, "insufficient"),
        }
    }
}
