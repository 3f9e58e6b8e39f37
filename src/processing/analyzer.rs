//! Analysis engine: deterministic scoring with optional model augmentation

use crate::error::{AtsScorerError, Result};
use crate::llm::augmenter::Augmenter;
use crate::processing::job_context::{self, JobContext};
use crate::processing::profile::{Profile, ProfileExtractor};
use crate::processing::scoring::{self, format_percentage, ScoreBreakdown};
use crate::processing::suggestions;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// The externally visible result of one résumé/job analysis.
///
/// `ats_score` always equals `min(sum(breakdown), 100)` rendered as `"XX.XX%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub data: ResultData,
    pub ats_score: String,
    pub breakdown: ScoreBreakdown,
    pub improvement_suggestions: Suggestions,
}

impl AnalysisResult {
    /// Numeric value of `ats_score`
    pub fn score_value(&self) -> f64 {
        self.ats_score
            .trim_end_matches('%')
            .parse()
            .unwrap_or_else(|_| self.breakdown.total())
    }
}

/// Extracted résumé data. Model results may carry richer shapes than the
/// local extractor produces, so several fields accept either form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultData {
    pub skills: Vec<SkillEntry>,
    pub total_experience_years: f64,
    pub relevant_experience: RelevantExperience,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillEntry {
    Name(String),
    Rated {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confidence: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relevance: Option<f64>,
    },
}

impl SkillEntry {
    pub fn name(&self) -> &str {
        match self {
            SkillEntry::Name(name) => name,
            SkillEntry::Rated { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelevantExperience {
    ByRole(BTreeMap<String, f64>),
    Detailed {
        #[serde(default)]
        roles: Vec<RoleExperience>,
        #[serde(default)]
        improvement_areas: Vec<String>,
    },
}

impl Default for RelevantExperience {
    fn default() -> Self {
        RelevantExperience::ByRole(BTreeMap::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleExperience {
    pub title: String,
    #[serde(default)]
    pub years: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

/// Local results produce a flat list; model results are bucketed by priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestions {
    Flat(Vec<String>),
    Categorized(CategorizedSuggestions),
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        match self {
            Suggestions::Flat(items) => items.is_empty(),
            Suggestions::Categorized(c) => {
                c.critical.is_empty() && c.recommended.is_empty() && c.advanced.is_empty()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizedSuggestions {
    pub critical: Vec<String>,
    pub recommended: Vec<String>,
    pub advanced: Vec<String>,
}

impl From<&Profile> for ResultData {
    fn from(profile: &Profile) -> Self {
        ResultData {
            skills: profile.skills.iter().cloned().map(SkillEntry::Name).collect(),
            total_experience_years: profile.total_experience_years as f64,
            relevant_experience: RelevantExperience::ByRole(
                profile
                    .experience_by_role
                    .iter()
                    .map(|(role, years)| (role.clone(), *years as f64))
                    .collect(),
            ),
            education: profile.education.clone(),
            certifications: profile.certifications.clone(),
            missing_keywords: Vec::new(),
        }
    }
}

/// Which path produced an [`AnalysisReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "model")]
pub enum AnalysisSource {
    Local,
    Model(String),
}

/// An [`AnalysisResult`] plus run metadata for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
    pub job_context: JobContext,
    pub formatting_penalty: f64,
    pub processing_time_ms: u64,
}

/// Coordinates extraction, scoring, suggestions and the optional model call.
pub struct AnalysisEngine {
    extractor: ProfileExtractor,
    augmenter: Option<Augmenter>,
}

impl AnalysisEngine {
    /// Create an engine that only runs the deterministic path
    pub fn new() -> Result<Self> {
        Ok(Self {
            extractor: ProfileExtractor::new()?,
            augmenter: None,
        })
    }

    /// Attach a model augmenter; its failures fall back to the local result.
    pub fn with_augmenter(mut self, augmenter: Augmenter) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    /// Run the full pipeline. The model is tried first when configured; any
    /// augmentation failure is logged and replaced by the local result.
    pub async fn analyze(&self, resume_text: &str, job_text: &str, formatting_penalty: f64) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        ensure_resume_text(resume_text)?;
        let job_context = job_context::classify(job_text);

        let augmented = match &self.augmenter {
            Some(augmenter) => {
                let local_profile = self.extractor.extract(resume_text, None);
                match augmenter
                    .augment(resume_text, job_text, &local_profile, formatting_penalty)
                    .await
                {
                    Ok(result) => {
                        info!("Model analysis completed with score {}", result.ats_score);
                        Some((result, AnalysisSource::Model(augmenter.model_name().to_string())))
                    }
                    Err(e) => {
                        warn!("Model analysis failed, using local scoring: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        let (result, source) = match augmented {
            Some(outcome) => outcome,
            None => (
                self.analyze_local(resume_text, job_text, formatting_penalty)?,
                AnalysisSource::Local,
            ),
        };

        Ok(AnalysisReport {
            result,
            source,
            job_context,
            formatting_penalty,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Deterministic path: a pure function of its three inputs.
    pub fn analyze_local(&self, resume_text: &str, job_text: &str, formatting_penalty: f64) -> Result<AnalysisResult> {
        ensure_resume_text(resume_text)?;

        let job = self.extractor.extract(job_text, None);
        let resume = self.extractor.extract(resume_text, Some(&job.skills));
        debug!("Job profile: {:?}", job);
        debug!("Resume profile: {:?}", resume);

        let breakdown = scoring::score(&resume, &job, formatting_penalty);
        let total = breakdown.total();
        if !total.is_finite() || total < 0.0 {
            return Err(AtsScorerError::Scoring(format!("score out of range: {}", total)));
        }
        info!("Local analysis completed with score {:.2}%", total);

        Ok(AnalysisResult {
            data: ResultData::from(&resume),
            ats_score: format_percentage(total),
            breakdown,
            improvement_suggestions: Suggestions::Flat(suggestions::suggest(&resume, &job, formatting_penalty)),
        })
    }
}

fn ensure_resume_text(resume_text: &str) -> Result<()> {
    if resume_text.trim().is_empty() {
        return Err(AtsScorerError::EmptyInput);
    }
    Ok(())
}
