//! Prompt templates for model-backed résumé analysis

use crate::processing::job_context::JobContext;

/// System and user prompt templates. Placeholders are `{name}` tokens and
/// are substituted in a single pass, so inserted text is never re-scanned.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system: String,
    pub analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: SYSTEM_TEMPLATE.to_string(),
            analysis: ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone)]
pub struct PromptParams<'a> {
    pub context: JobContext,
    pub resume_text: &'a str,
    pub job_text: &'a str,
    /// Locally extracted profile, already rendered as JSON
    pub local_analysis: &'a str,
    pub formatting_penalty: f64,
}

impl PromptTemplates {
    pub fn render_system(&self) -> String {
        self.system.clone()
    }

    pub fn render_analysis(&self, params: &PromptParams) -> String {
        let level = params.context.level.to_string();
        let domain = params.context.domain.to_string();
        let penalty = params.formatting_penalty.to_string();

        substitute(
            &self.analysis,
            &[
                ("level", level.as_str()),
                ("domain", domain.as_str()),
                ("resume", params.resume_text),
                ("job", params.job_text),
                ("local_analysis", params.local_analysis),
                ("penalty", penalty.as_str()),
            ],
        )
    }
}

fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                rendered.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                rendered.push('{');
                rest = tail;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

const SYSTEM_TEMPLATE: &str = r#"You are an advanced ATS optimization and career development expert with expertise in:
1. Technical resume analysis
2. Industry-specific keyword optimization
3. Modern job market requirements
4. Career progression patterns
5. Technical skill evaluation and recommendations

Your goal is to provide actionable, specific feedback that will help candidates improve their resumes for both ATS systems and human reviewers."#;

const ANALYSIS_TEMPLATE: &str = r#"Analyze the provided resume and job description with the following objectives:

1. Technical Skill Analysis:
   - Identify core technical competencies
   - Evaluate skill relevance to the job description
   - Suggest emerging technologies that could enhance the profile

2. Experience Evaluation:
   - Assess experience depth and relevance
   - Identify gaps between experience and job requirements
   - Suggest ways to better present existing experience

3. Achievement Impact:
   - Evaluate how achievements are presented
   - Suggest metrics or quantifiable results to add
   - Recommend ways to better demonstrate impact

4. ATS Optimization:
   - Score keyword matching and placement
   - Evaluate format compatibility
   - Suggest structural improvements

Return only a JSON object with:
{
  "data": {
    "skills": [{"name": string, "confidence": number, "relevance": number}],
    "total_experience_years": number,
    "relevant_experience": {
      "roles": [{"title": string, "years": number, "relevance_score": number}],
      "improvement_areas": [string]
    },
    "education": [string],
    "certifications": [string],
    "missing_keywords": [string]
  },
  "ats_score": "XX.XX%",
  "breakdown": {
    "skills": number (0-50),
    "experience": number (0-30),
    "education_certifications": number (0-10),
    "formatting": number (0-10),
    "keyword_optimization": number (0-10)
  },
  "improvement_suggestions": {
    "critical": [string],
    "recommended": [string],
    "advanced": [string]
  }
}

Job Context:
- Level: {level}
- Domain: {domain}
- Industry Trends: Consider current market demands in {domain}
- Career Level Expectations: Focus on expectations for {level} positions

<RESUME>
{resume}
</RESUME>

<JOB POSTING>
{job}
</JOB POSTING>

<LOCAL ANALYSIS>
{local_analysis}
</LOCAL ANALYSIS>

Formatting penalty score: {penalty} (range -20 to 0, 0 means no issues)"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::job_context::{JobDomain, JobLevel};

    fn params<'a>(resume: &'a str, job: &'a str) -> PromptParams<'a> {
        PromptParams {
            context: JobContext {
                level: JobLevel::Senior,
                domain: JobDomain::Backend,
            },
            resume_text: resume,
            job_text: job,
            local_analysis: r#"{"skills": ["Python"]}"#,
            formatting_penalty: -5.0,
        }
    }

    #[test]
    fn test_analysis_rendering() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_analysis(&params(
            "Software Engineer with Python experience at Tech Corp.",
            "Senior Software Engineer role requiring React and Python.",
        ));

        assert!(prompt.contains("Software Engineer with Python experience at Tech Corp"));
        assert!(prompt.contains("Senior Software Engineer role requiring React and Python"));
        assert!(prompt.contains("- Level: senior"));
        assert!(prompt.contains("- Domain: backend"));
        assert!(prompt.contains(r#"{"skills": ["Python"]}"#));
        assert!(prompt.contains("Formatting penalty score: -5"));
        // schema braces are left alone
        assert!(prompt.contains(r#""breakdown": {"#));
    }

    #[test]
    fn test_inserted_text_is_not_rescanned() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_analysis(&params("I wrote {job} templates", "Backend role"));
        assert!(prompt.contains("I wrote {job} templates"));
    }

    #[test]
    fn test_system_prompt() {
        let templates = PromptTemplates::default();
        assert!(templates.render_system().contains("ATS optimization"));
    }

    #[test]
    fn test_substitute_unknown_and_unclosed() {
        assert_eq!(substitute("{a} {b} {", &[("a", "1")]), "1 {b} {");
    }
}
