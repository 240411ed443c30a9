//! essaygrade-core: deterministic five-competency essay scoring.
//!
//! Scores Portuguese argumentative essays against the five ENEM competencies
//! using curated vocabulary, paragraph structure, and proposal-slot
//! extraction. Analysis is a pure function of the text and the loaded
//! vocabulary.

pub mod batch;
pub mod competency;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod matcher;
pub mod model;
pub mod proposal;
pub mod report;
pub mod rubric;
pub mod service;
pub mod statistics;
pub mod text;
pub mod vocabulary;

pub use engine::{Engine, EngineConfig};
pub use model::{AnalysisResult, Band, CompetencyId, CompetencyScore, TextQuality};
pub use service::{assess, Assessment};
