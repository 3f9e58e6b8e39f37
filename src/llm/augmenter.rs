//! Model-backed refinement of the local analysis
//!
//! `BUILD_PROMPT -> CALL_MODEL -> PARSE -> VALIDATE`. Any failing stage
//! returns an [`AugmentError`]; the caller then keeps its local result.

use crate::llm::client::{AugmentError, CompletionClient, CompletionRequest};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::processing::analyzer::{AnalysisResult, CategorizedSuggestions, ResultData, Suggestions};
use crate::processing::job_context;
use crate::processing::profile::Profile;
use crate::processing::scoring::{format_percentage, ScoreBreakdown};
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;

pub struct Augmenter {
    client: Box<dyn CompletionClient>,
    templates: PromptTemplates,
    max_output_tokens: u32,
    timeout: Duration,
}

impl Augmenter {
    pub fn new(client: Box<dyn CompletionClient>, max_output_tokens: u32, timeout: Duration) -> Self {
        Self {
            client,
            templates: PromptTemplates::default(),
            max_output_tokens,
            timeout,
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub async fn augment(
        &self,
        resume_text: &str,
        job_text: &str,
        local_profile: &Profile,
        formatting_penalty: f64,
    ) -> Result<AnalysisResult, AugmentError> {
        if resume_text.trim().is_empty() || job_text.trim().is_empty() {
            return Err(AugmentError::EmptyInput);
        }

        let request = self.build_request(resume_text, job_text, local_profile, formatting_penalty)?;

        info!("Calling model {}", self.client.model_name());
        let raw = tokio::time::timeout(self.timeout, self.client.complete(&request))
            .await
            .map_err(|_| AugmentError::Timeout(self.timeout))??;
        debug!("Raw model response ({} bytes): {:?}", raw.len(), raw);

        parse_model_response(&raw)
    }

    pub fn build_request(
        &self,
        resume_text: &str,
        job_text: &str,
        local_profile: &Profile,
        formatting_penalty: f64,
    ) -> Result<CompletionRequest, AugmentError> {
        let local_analysis = serde_json::to_string_pretty(local_profile)?;
        let params = PromptParams {
            context: job_context::classify(job_text),
            resume_text,
            job_text,
            local_analysis: &local_analysis,
            formatting_penalty,
        };

        Ok(CompletionRequest {
            system_prompt: self.templates.render_system(),
            user_prompt: self.templates.render_analysis(&params),
            max_output_tokens: self.max_output_tokens,
        })
    }
}

/// Strip a surrounding ```` ```json ```` or ```` ``` ```` fence.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    for fence in ["```json", "```"] {
        if let Some(inner) = trimmed
            .strip_prefix(fence)
            .and_then(|rest| rest.strip_suffix("```"))
        {
            return inner.trim();
        }
    }
    trimmed
}

#[derive(Debug, Deserialize)]
struct ModelResult {
    data: ResultData,
    #[serde(default)]
    ats_score: Option<serde_json::Value>,
    #[serde(default)]
    breakdown: Option<ModelBreakdown>,
    #[serde(default, alias = "suggestions")]
    improvement_suggestions: Option<Suggestions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelBreakdown {
    skills: Option<f64>,
    experience: Option<f64>,
    education_certifications: Option<f64>,
    formatting: Option<f64>,
    keyword_optimization: Option<f64>,
}

impl From<ModelBreakdown> for ScoreBreakdown {
    fn from(raw: ModelBreakdown) -> Self {
        ScoreBreakdown {
            skills: raw.skills.unwrap_or(0.0),
            experience: raw.experience.unwrap_or(0.0),
            education_certifications: raw.education_certifications.unwrap_or(0.0),
            formatting: raw.formatting.unwrap_or(0.0),
            keyword_optimization: Some(raw.keyword_optimization.unwrap_or(0.0)),
        }
    }
}

/// Parse and repair raw model text into an [`AnalysisResult`].
///
/// Missing breakdown categories become zero, flat suggestion lists are
/// bucketed, and `ats_score` is recomputed from the repaired breakdown.
pub fn parse_model_response(raw: &str) -> Result<AnalysisResult, AugmentError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(AugmentError::EmptyResponse);
    }
    debug!("Cleaned model response ({} bytes)", cleaned.len());

    let result: ModelResult = serde_json::from_str(cleaned)?;

    let breakdown = ScoreBreakdown::from(result.breakdown.unwrap_or_default()).clamped();
    let ats_score = format_percentage(breakdown.total());
    if let Some(reported) = &result.ats_score {
        debug!("Model reported ats_score {}, using {}", reported, ats_score);
    }

    let improvement_suggestions = match result.improvement_suggestions {
        Some(Suggestions::Flat(items)) => Suggestions::Categorized(bucket_suggestions(items)),
        Some(categorized @ Suggestions::Categorized(_)) => categorized,
        None => Suggestions::Categorized(CategorizedSuggestions::default()),
    };

    Ok(AnalysisResult {
        data: result.data,
        ats_score,
        breakdown,
        improvement_suggestions,
    })
}

/// First two items are critical, the next two recommended, the rest advanced.
pub fn bucket_suggestions(mut items: Vec<String>) -> CategorizedSuggestions {
    let advanced = items.split_off(items.len().min(4));
    let recommended = items.split_off(items.len().min(2));
    CategorizedSuggestions {
        critical: items,
        recommended,
        advanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted collaborator returning a canned outcome
    struct ScriptedClient {
        reply: Mutex<Option<Result<String, AugmentError>>>,
        delay: Option<Duration>,
    }

    impl ScriptedClient {
        fn replying(reply: Result<String, AugmentError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, AugmentError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let reply = self.reply.lock().unwrap().take();
            reply.unwrap_or(Err(AugmentError::EmptyResponse))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn augmenter(client: ScriptedClient) -> Augmenter {
        Augmenter::new(Box::new(client), 2000, Duration::from_secs(30))
    }

    const FULL_RESPONSE: &str = r#"{
        "data": {
            "skills": [{"name": "Python", "confidence": 0.9, "relevance": 0.8}],
            "total_experience_years": 5,
            "relevant_experience": {"roles": [{"title": "Engineer", "years": 5, "relevance_score": 0.7}], "improvement_areas": []},
            "education": ["BS in Computer Science"],
            "certifications": ["AWS Certified"],
            "missing_keywords": ["Kubernetes"]
        },
        "ats_score": "81.00%",
        "breakdown": {"skills": 40, "experience": 15, "education_certifications": 10, "formatting": 10, "keyword_optimization": 6},
        "improvement_suggestions": {"critical": ["a"], "recommended": ["b"], "advanced": ["c"]}
    }"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "```json\n{\"a\": 1}");
        assert_eq!(strip_code_fences("```"), "```");
    }

    #[test]
    fn test_parse_full_response() {
        let result = parse_model_response(FULL_RESPONSE).unwrap();
        assert_eq!(result.ats_score, "81.00%");
        assert_eq!(result.breakdown.keyword_optimization, Some(6.0));
        assert_eq!(result.data.missing_keywords, vec!["Kubernetes".to_string()]);
        match result.improvement_suggestions {
            Suggestions::Categorized(c) => assert_eq!(c.critical, vec!["a".to_string()]),
            Suggestions::Flat(_) => panic!("expected categorized suggestions"),
        }
    }

    #[test]
    fn test_missing_breakdown_gets_zero_defaults() {
        let result = parse_model_response(r#"{"data": {"skills": ["Rust"]}}"#).unwrap();
        assert_eq!(
            result.breakdown,
            ScoreBreakdown {
                skills: 0.0,
                experience: 0.0,
                education_certifications: 0.0,
                formatting: 0.0,
                keyword_optimization: Some(0.0),
            }
        );
        assert_eq!(result.ats_score, "0.00%");
    }

    #[test]
    fn test_partial_breakdown_and_flat_suggestions() {
        let raw = r#"```json
        {"data": {}, "breakdown": {"skills": 30},
         "suggestions": ["one", "two", "three", "four", "five", "six"]}
        ```"#;
        let result = parse_model_response(raw).unwrap();
        assert_eq!(result.breakdown.skills, 30.0);
        assert_eq!(result.breakdown.experience, 0.0);
        assert_eq!(result.ats_score, "30.00%");

        let expected = CategorizedSuggestions {
            critical: vec!["one".into(), "two".into()],
            recommended: vec!["three".into(), "four".into()],
            advanced: vec!["five".into(), "six".into()],
        };
        assert_eq!(result.improvement_suggestions, Suggestions::Categorized(expected));
    }

    #[test]
    fn test_bucket_short_lists() {
        let buckets = bucket_suggestions(vec!["only".into()]);
        assert_eq!(buckets.critical, vec!["only".to_string()]);
        assert!(buckets.recommended.is_empty());
        assert!(buckets.advanced.is_empty());
        assert_eq!(bucket_suggestions(vec![]), CategorizedSuggestions::default());
    }

    #[test]
    fn test_out_of_range_breakdown_is_clamped() {
        let result = parse_model_response(
            r#"{"data": {}, "breakdown": {"skills": 90, "experience": 45, "education_certifications": 10, "formatting": 10}}"#,
        )
        .unwrap();
        assert_eq!(result.breakdown.skills, 50.0);
        assert_eq!(result.breakdown.experience, 30.0);
        assert_eq!(result.ats_score, "100.00%");
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(parse_model_response(""), Err(AugmentError::EmptyResponse)));
        assert!(matches!(parse_model_response("```json\n```"), Err(AugmentError::EmptyResponse)));
        assert!(matches!(parse_model_response("not json"), Err(AugmentError::Parse(_))));
        // a result without a data object is unusable
        assert!(matches!(parse_model_response(r#"{"ats_score": "50%"}"#), Err(AugmentError::Parse(_))));
    }

    #[tokio::test]
    async fn test_augment_success() {
        let augmenter = augmenter(ScriptedClient::replying(Ok(format!("```json\n{}\n```", FULL_RESPONSE))));
        let result = augmenter
            .augment("Senior Python engineer", "Senior backend role", &Profile::default(), -5.0)
            .await
            .unwrap();
        assert_eq!(result.ats_score, "81.00%");
    }

    #[test]
    fn test_augment_request_carries_context() {
        let client = ScriptedClient::replying(Ok(FULL_RESPONSE.to_string()));
        let augmenter = Augmenter::new(Box::new(client), 123, Duration::from_secs(30));
        let request = augmenter
            .build_request("resume body", "Senior backend API role", &Profile::default(), -10.0)
            .unwrap();

        assert_eq!(request.max_output_tokens, 123);
        assert!(request.system_prompt.contains("ATS optimization"));
        assert!(request.user_prompt.contains("- Level: senior"));
        assert!(request.user_prompt.contains("- Domain: backend"));
        assert!(request.user_prompt.contains("resume body"));
        assert!(request.user_prompt.contains("\"relevant_experience\""));
    }

    #[tokio::test]
    async fn test_augment_failures_map_to_errors() {
        let empty = augmenter(ScriptedClient::replying(Ok("   ".to_string())));
        assert!(matches!(
            empty.augment("r", "j", &Profile::default(), 0.0).await,
            Err(AugmentError::EmptyResponse)
        ));

        let malformed = augmenter(ScriptedClient::replying(Ok("{\"data\": ".to_string())));
        assert!(matches!(
            malformed.augment("r", "j", &Profile::default(), 0.0).await,
            Err(AugmentError::Parse(_))
        ));

        let api = augmenter(ScriptedClient::replying(Err(AugmentError::Api {
            status: 401,
            message: "bad key".into(),
        })));
        assert!(matches!(
            api.augment("r", "j", &Profile::default(), 0.0).await,
            Err(AugmentError::Api { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_augment_rejects_empty_input_without_calling_model() {
        let augmenter = augmenter(ScriptedClient::replying(Ok(FULL_RESPONSE.to_string())));
        assert!(matches!(
            augmenter.augment("  ", "job", &Profile::default(), 0.0).await,
            Err(AugmentError::EmptyInput)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_augment_times_out() {
        let client = ScriptedClient {
            reply: Mutex::new(Some(Ok(FULL_RESPONSE.to_string()))),
            delay: Some(Duration::from_secs(600)),
        };
        let augmenter = Augmenter::new(Box::new(client), 2000, Duration::from_secs(5));
        assert!(matches!(
            augmenter.augment("r", "j", &Profile::default(), 0.0).await,
            Err(AugmentError::Timeout(_))
        ));
    }
}
