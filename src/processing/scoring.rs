//! Weighted compatibility scoring

use crate::processing::profile::Profile;
use serde::{Deserialize, Serialize};

pub const SKILLS_WEIGHT: f64 = 50.0;
pub const EXPERIENCE_WEIGHT: f64 = 30.0;
pub const EDUCATION_CERTIFICATIONS_WEIGHT: f64 = 10.0;
pub const FORMATTING_WEIGHT: f64 = 10.0;
pub const KEYWORD_OPTIMIZATION_WEIGHT: f64 = 10.0;
pub const MAX_SCORE: f64 = 100.0;

/// Years of experience that earn full experience credit
const FULL_CREDIT_YEARS: f64 = 10.0;

/// Range of the externally supplied formatting penalty
pub const MIN_FORMATTING_PENALTY: f64 = -20.0;

/// Per-category score components. Each component lies in `[0, cap]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub education_certifications: f64,
    pub formatting: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_optimization: Option<f64>,
}

impl ScoreBreakdown {
    /// Sum of all components, capped at [`MAX_SCORE`].
    pub fn total(&self) -> f64 {
        let sum = self.skills
            + self.experience
            + self.education_certifications
            + self.formatting
            + self.keyword_optimization.unwrap_or(0.0);
        sum.min(MAX_SCORE)
    }

    /// Pull every component back into its category range.
    pub fn clamped(self) -> Self {
        Self {
            skills: clamp_component(self.skills, SKILLS_WEIGHT),
            experience: clamp_component(self.experience, EXPERIENCE_WEIGHT),
            education_certifications: clamp_component(
                self.education_certifications,
                EDUCATION_CERTIFICATIONS_WEIGHT,
            ),
            formatting: clamp_component(self.formatting, FORMATTING_WEIGHT),
            keyword_optimization: self
                .keyword_optimization
                .map(|k| clamp_component(k, KEYWORD_OPTIMIZATION_WEIGHT)),
        }
    }
}

fn clamp_component(value: f64, cap: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, cap)
    }
}

/// Render a final score the way it is reported, e.g. `"82.50%"`.
pub fn format_percentage(score: f64) -> String {
    format!("{:.2}%", score)
}

/// Score a résumé profile against a job profile.
pub fn score(resume: &Profile, job: &Profile, formatting_penalty: f64) -> ScoreBreakdown {
    ScoreBreakdown {
        skills: skill_score(resume, job),
        experience: experience_score(resume.total_experience_years),
        education_certifications: education_certifications_score(resume),
        formatting: formatting_score(formatting_penalty),
        keyword_optimization: None,
    }
}

/// Share of the job's skills present in the résumé, compared without case.
/// Zero when the job lists no skills.
pub fn skill_score(resume: &Profile, job: &Profile) -> f64 {
    let job_skills = job.skill_keys();
    if job_skills.is_empty() {
        return 0.0;
    }
    let resume_skills = resume.skill_keys();
    let matched = job_skills.intersection(&resume_skills).count();
    (matched as f64 / job_skills.len() as f64) * SKILLS_WEIGHT
}

pub fn experience_score(total_years: u32) -> f64 {
    (total_years as f64 / FULL_CREDIT_YEARS).min(1.0) * EXPERIENCE_WEIGHT
}

pub fn education_certifications_score(resume: &Profile) -> f64 {
    let education: f64 = if resume.education.is_empty() { 0.0 } else { 5.0 };
    let certifications = if resume.certifications.is_empty() { 0.0 } else { 5.0 };
    (education + certifications).min(EDUCATION_CERTIFICATIONS_WEIGHT)
}

/// Map a penalty in `[-20, 0]` onto `[0, 10]`.
pub fn formatting_score(formatting_penalty: f64) -> f64 {
    let penalty = formatting_penalty.clamp(MIN_FORMATTING_PENALTY, 0.0);
    (FORMATTING_WEIGHT + penalty / 2.0).max(0.0)
}
