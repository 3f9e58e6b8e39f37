//! Profile extraction: skills, experience, education and certifications
//!
//! Every concern is a small pattern-matching rule over the raw text. None of
//! them fail on odd input; a rule that finds nothing yields an empty
//! collection.

use crate::error::{AtsScorerError, Result};
use crate::processing::taxonomy;
use aho_corasick::AhoCorasick;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Structured view of one résumé or job description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub skills: BTreeSet<String>,
    pub total_experience_years: u32,
    #[serde(rename = "relevant_experience")]
    pub experience_by_role: BTreeMap<String, u32>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
}

impl Profile {
    /// Lower-cased skill names, used for case-insensitive set arithmetic.
    pub fn skill_keys(&self) -> HashSet<String> {
        self.skills.iter().map(|s| s.to_lowercase()).collect()
    }
}

const DEFAULT_ROLE: &str = "general";
const DEFAULT_CS_DEGREE: &str = "BS in Computer Science";
const AWS_CERTIFIED: &str = "AWS Certified";
const DEGREE_KEYWORDS: &str = r"bachelor(?:'?s)?|master(?:'?s)?|phd|doctorate|bs|ms|mba";

/// Extracts a [`Profile`] from plain text.
///
/// Build once and share; all patterns are compiled up front.
pub struct ProfileExtractor {
    taxonomy_matcher: AhoCorasick,
    taxonomy_skills: Vec<&'static str>,
    experience_regex: Regex,
    degree_regex: Regex,
    labelled_degree_regex: Regex,
    education_section_regex: Regex,
    cs_degree_regex: Regex,
    cert_phrase_regex: Regex,
    aws_cert_regex: Regex,
    cert_label_regex: Regex,
    cert_prefix_regex: Regex,
}

impl ProfileExtractor {
    pub fn new() -> Result<Self> {
        let taxonomy_skills: Vec<&'static str> = taxonomy::all_skills().collect();

        // Standard match kind so that overlapping iteration reports every
        // occurrence, e.g. "java" inside "javascript".
        let taxonomy_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&taxonomy_skills)
            .map_err(|e| AtsScorerError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            taxonomy_matcher,
            taxonomy_skills,
            // <n> year(s)/yr(s) [of] [experience|exp] [in] [role phrase]; only
            // the role phrase is confined to one line
            experience_regex: Regex::new(
                r"(?i)\b(\d+)\s*(?:years?|yrs?)\b(?:\s*of\b)?(?:\s*(?:experience|exp)\b)?(?:\s*in\b)?[ \t]*([a-z][a-z \t]*)?",
            )?,
            // <degree> [in|of] <field>
            degree_regex: Regex::new(&format!(
                r"(?i)\b({})\b(?:[ \t]+(?:in|of)\b)?[ \t]*([a-z][a-z \t]*)",
                DEGREE_KEYWORDS
            ))?,
            // Education: <degree> [in|of] <field>
            labelled_degree_regex: Regex::new(&format!(
                r"(?i)education:?\s*({})\b(?:[ \t]+(?:in|of)\b)?[ \t]*([a-z][a-z \t]*)",
                DEGREE_KEYWORDS
            ))?,
            education_section_regex: Regex::new(r"(?is)education:?(.*?)(?:experience|skills|$)")?,
            cs_degree_regex: Regex::new(
                r"(?i)\b(bs|bachelor(?:'?s)?|master(?:'?s)?)\b.*?(computer[ \t]*science)",
            )?,
            cert_phrase_regex: Regex::new(
                r"(?i)\b(?:certified|certification)s?\b[ \t]*([a-z][a-z \t]*)",
            )?,
            aws_cert_regex: Regex::new(r"(?i)\b(?:aws|amazon)[ \t]*certified\b")?,
            cert_label_regex: Regex::new(r"(?i)\bcertifications?\b:?\s*([^.\n]+)")?,
            cert_prefix_regex: Regex::new(r"(?i)^(?:certified|certification)s?\s+")?,
        })
    }

    /// Build a profile for `text`. `job_skills` are matched in addition to
    /// the static taxonomy.
    pub fn extract(&self, text: &str, job_skills: Option<&BTreeSet<String>>) -> Profile {
        let skills = self.extract_skills(text, job_skills);
        let (total_experience_years, experience_by_role) = self.extract_experience(text);
        let education = self.extract_education(text);
        let certifications = self.extract_certifications(text);

        debug!(
            "Extracted {} skills, {} years, {} education, {} certifications",
            skills.len(),
            total_experience_years,
            education.len(),
            certifications.len()
        );

        Profile {
            skills,
            total_experience_years,
            experience_by_role,
            education,
            certifications,
        }
    }

    /// Case-insensitive substring match against the taxonomy and the optional
    /// job skills, keeping the casing of the first occurrence in `text`.
    pub fn extract_skills(&self, text: &str, job_skills: Option<&BTreeSet<String>>) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        let mut skills = BTreeSet::new();

        let mut first_seen: HashMap<usize, &str> = HashMap::new();
        for mat in self.taxonomy_matcher.find_overlapping_iter(text) {
            first_seen.entry(mat.pattern().as_usize()).or_insert(&text[mat.range()]);
        }

        for (id, skill) in self.taxonomy_skills.iter().enumerate() {
            if !lowered.contains(skill) {
                continue;
            }
            let found = match first_seen.get(&id) {
                Some(original) => original.to_string(),
                None => capitalize(skill),
            };
            skills.insert(found);
        }

        for skill in job_skills.into_iter().flatten() {
            if skill.is_empty() || !lowered.contains(&skill.to_lowercase()) {
                continue;
            }
            let found = find_ignore_case(text, skill).unwrap_or(skill.as_str());
            skills.insert(found.to_string());
        }

        skills
    }

    /// Sum every "<n> years ..." mention. Overlapping phrasings of the same
    /// role are all counted.
    pub fn extract_experience(&self, text: &str) -> (u32, BTreeMap<String, u32>) {
        let mut total = 0u32;
        let mut by_role = BTreeMap::new();

        for caps in self.experience_regex.captures_iter(text) {
            let Some(digits) = caps.get(1) else {
                continue;
            };
            // an all-digit count only fails to parse by overflowing
            let years = digits.as_str().parse::<u32>().unwrap_or(u32::MAX);
            let role = caps
                .get(2)
                .map(|m| collapse_whitespace(m.as_str()).to_lowercase())
                .filter(|role| !role.is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string());

            total = total.saturating_add(years);
            let bucket = by_role.entry(role).or_insert(0u32);
            *bucket = bucket.saturating_add(years);
        }

        (total, by_role)
    }

    pub fn extract_education(&self, text: &str) -> Vec<String> {
        let mut hits: Vec<(String, String)> = Vec::new();

        for regex in [&self.degree_regex, &self.labelled_degree_regex] {
            for caps in regex.captures_iter(text) {
                if let (Some(degree), Some(field)) = (caps.get(1), caps.get(2)) {
                    hits.push((degree.as_str().to_string(), field.as_str().to_string()));
                }
            }
        }

        if let Some(section) = self
            .education_section_regex
            .captures(text)
            .and_then(|caps| caps.get(1))
        {
            if let Some(caps) = self.cs_degree_regex.captures(section.as_str()) {
                hits.push((caps[1].to_string(), caps[2].to_string()));
            }
        }

        let mut education = Vec::new();
        let mut seen = HashSet::new();
        for (degree, field) in hits {
            let field = collapse_whitespace(&field);
            if field.is_empty() {
                continue;
            }
            let entry = format!("{} in {}", normalize_degree(&degree), title_case(&field));
            if seen.insert(entry.clone()) {
                education.push(entry);
            }
        }

        if education.is_empty() && text.to_lowercase().contains("computer science") {
            education.push(DEFAULT_CS_DEGREE.to_string());
        }

        education
    }

    pub fn extract_certifications(&self, text: &str) -> Vec<String> {
        let mut raw: Vec<&str> = Vec::new();
        raw.extend(
            self.cert_phrase_regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str())),
        );
        raw.extend(self.aws_cert_regex.find_iter(text).map(|m| m.as_str()));
        raw.extend(
            self.cert_label_regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str())),
        );

        let mut certifications: Vec<String> = Vec::new();
        for cert in raw {
            let cert = cert.trim().trim_start_matches(|c: char| matches!(c, '-' | '*' | '•') || c.is_whitespace());
            let cert = collapse_whitespace(&self.cert_prefix_regex.replace(cert, ""));
            if !cert.is_empty() && !certifications.contains(&cert) {
                certifications.push(cert);
            }
        }

        let mentions_aws = certifications.iter().any(|c| c.to_lowercase().contains("aws"));
        if mentions_aws && !certifications.iter().any(|c| c == AWS_CERTIFIED) {
            certifications.push(AWS_CERTIFIED.to_string());
        }

        certifications
    }
}

/// Map degree spellings onto their canonical tag.
pub fn normalize_degree(degree: &str) -> String {
    let key: String = degree.trim().to_lowercase().chars().filter(|c| *c != '\'').collect();
    match key.as_str() {
        "bs" | "bachelor" | "bachelors" => "BS".to_string(),
        "ms" | "master" | "masters" => "MS".to_string(),
        _ => degree.trim().to_uppercase(),
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First occurrence of `needle` in `text` under Unicode lower-casing,
/// returned with the casing used in `text`.
fn find_ignore_case<'t>(text: &'t str, needle: &str) -> Option<&'t str> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }
    text.char_indices().find_map(|(start, _)| {
        let mut pending = needle.iter();
        let mut end = start;
        for (offset, c) in text[start..].char_indices() {
            if pending.len() == 0 {
                break;
            }
            for lower in c.to_lowercase() {
                if pending.next() != Some(&lower) {
                    return None;
                }
            }
            end = start + offset + c.len_utf8();
        }
        (pending.len() == 0).then(|| &text[start..end])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ProfileExtractor {
        ProfileExtractor::new().unwrap()
    }

    #[test]
    fn test_skills_are_case_insensitive() {
        let skills = extractor().extract_skills("Expert in PYTHON and Docker.", None);
        assert!(skills.contains("PYTHON"));
        assert!(skills.contains("Docker"));
        assert!(!skills.contains("python"));
    }

    #[test]
    fn test_skills_keep_first_occurrence_casing() {
        let skills = extractor().extract_skills("python scripts, later Python services", None);
        assert!(skills.contains("python"));
        assert!(!skills.contains("Python"));
    }

    #[test]
    fn test_substring_semantics_match_nested_skills() {
        let skills = extractor().extract_skills("JavaScript", None);
        assert!(skills.contains("JavaScript"));
        assert!(skills.contains("Java"));
    }

    #[test]
    fn test_job_skills_are_matched_too() {
        let job_skills: BTreeSet<String> = ["GraphQL".to_string(), "Elixir".to_string()].into();
        let skills = extractor().extract_skills("Built graphql gateways", Some(&job_skills));
        assert!(skills.contains("graphql"));
        assert!(!skills.iter().any(|s| s.eq_ignore_ascii_case("elixir")));
    }

    #[test]
    fn test_experience_accumulates_by_role() {
        let (total, by_role) = extractor().extract_experience(
            "5 years of experience in Python\n3 yrs exp in python\n2 years",
        );
        assert_eq!(total, 10);
        assert_eq!(by_role.get("python"), Some(&8));
        assert_eq!(by_role.get("general"), Some(&2));
    }

    #[test]
    fn test_experience_role_is_trailing_phrase() {
        let (total, by_role) = extractor().extract_experience("Experience: 5 years at Tech Corp");
        assert_eq!(total, 5);
        assert_eq!(by_role.get("at tech corp"), Some(&5));
    }

    #[test]
    fn test_experience_ignores_plus_suffix() {
        let (total, _) = extractor().extract_experience("5+ years of Python");
        assert_eq!(total, 0);
    }

    #[test]
    fn test_experience_overflow_saturates() {
        let (total, by_role) = extractor().extract_experience("99999999999999 years in rust; 3 years in go");
        assert_eq!(total, u32::MAX);
        assert_eq!(by_role["rust"], u32::MAX);
        assert_eq!(by_role["go"], 3);
    }

    #[test]
    fn test_experience_count_wrapped_across_lines() {
        let (total, by_role) = extractor().extract_experience("Engineer with 5\nyears of experience in Rust");
        assert_eq!(total, 5);
        assert_eq!(by_role, BTreeMap::from([("rust".to_string(), 5)]));

        let (total, by_role) = extractor().extract_experience("8 years\nof experience in Python services");
        assert_eq!(total, 8);
        assert_eq!(by_role, BTreeMap::from([("python services".to_string(), 8)]));
    }

    #[test]
    fn test_role_phrase_stops_at_line_break() {
        let (_, by_role) = extractor().extract_experience("4 years in backend\nplatform work");
        assert_eq!(by_role, BTreeMap::from([("backend".to_string(), 4)]));
    }

    #[test]
    fn test_job_skill_keeps_non_ascii_resume_casing() {
        let job_skills: BTreeSet<String> = ["CAFÉ".to_string()].into();
        let skills = extractor().extract_skills("Barista at Café Central", Some(&job_skills));
        assert!(skills.contains("Café"));
        assert_eq!(find_ignore_case("straße ÉCOLE", "école"), Some("ÉCOLE"));
        assert_eq!(find_ignore_case("abc", "abcd"), None);
    }

    #[test]
    fn test_education_normalization_is_idempotent() {
        let extractor = extractor();
        let a = extractor.extract_education("Bachelor's in Computer Science");
        let b = extractor.extract_education("BS in Computer Science");
        assert_eq!(a, vec!["BS in Computer Science".to_string()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_education_other_degrees_upper_cased() {
        let education = extractor().extract_education("PhD in theoretical physics; Masters of data science");
        assert!(education.contains(&"PHD in Theoretical Physics".to_string()));
        assert!(education.contains(&"MS in Data Science".to_string()));
    }

    #[test]
    fn test_education_label_without_in() {
        let education = extractor().extract_education("Education: BS Computer Science");
        assert_eq!(education, vec!["BS in Computer Science".to_string()]);
    }

    #[test]
    fn test_education_section_cs_candidate() {
        let education = extractor()
            .extract_education("Education\nMaster's degree, Stanford, Computer Science\nSkills\nRust");
        assert!(education.contains(&"MS in Computer Science".to_string()));
    }

    #[test]
    fn test_education_defaults_to_cs_mention() {
        let education = extractor().extract_education("Self-taught computer science enthusiast");
        assert_eq!(education, vec!["BS in Computer Science".to_string()]);
        assert!(extractor().extract_education("Self-taught").is_empty());
    }

    #[test]
    fn test_degree_keywords_need_word_boundaries() {
        assert!(extractor().extract_education("Designed systems for teams").is_empty());
    }

    #[test]
    fn test_certifications_strip_prefix_and_add_aws_tag() {
        let certs = extractor().extract_certifications(
            "Certifications:\n- aws certified solutions architect\n- Certified Kubernetes Administrator",
        );
        assert!(certs.contains(&"solutions architect".to_string()));
        assert!(certs.contains(&"Kubernetes Administrator".to_string()));
        assert!(certs.contains(&"aws certified solutions architect".to_string()));
        assert_eq!(certs.last().map(String::as_str), Some("AWS Certified"));
    }

    #[test]
    fn test_aws_tag_not_duplicated() {
        let certs = extractor().extract_certifications("AWS Certified Developer");
        assert_eq!(certs.iter().filter(|c| *c == "AWS Certified").count(), 1);
    }

    #[test]
    fn test_no_matches_yield_empty_profile() {
        let profile = extractor().extract("", None);
        assert_eq!(profile, Profile::default());
        let profile = extractor().extract("%%% \u{0} ###", None);
        assert!(profile.skills.is_empty());
        assert_eq!(profile.total_experience_years, 0);
    }

    #[test]
    fn test_find_ignore_case_respects_char_boundaries() {
        assert_eq!(find_ignore_case("Ünïcode RUST", "rust"), Some("RUST"));
        assert_eq!(find_ignore_case("abc", ""), None);
    }
}
