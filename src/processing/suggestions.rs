//! Rule-based improvement suggestions

use crate::processing::profile::Profile;

pub const WELL_ALIGNED: &str = "Your resume is well-aligned.";

/// Derive advice from the gap between a résumé and a job profile.
///
/// Rules are evaluated in a fixed order and each adds at most one message,
/// so the output is stable for identical inputs.
pub fn suggest(resume: &Profile, job: &Profile, formatting_penalty: f64) -> Vec<String> {
    let mut suggestions = Vec::new();

    let missing = missing_skills(resume, job);
    if !missing.is_empty() {
        suggestions.push(format!(
            "Add the following skills to your resume: {}.",
            missing.join(", ")
        ));
    }

    if resume.total_experience_years < 2 {
        suggestions.push("Highlight more experience to meet typical 2+ year requirements.".to_string());
    } else if resume.total_experience_years > 10 && job.experience_by_role.len() < 2 {
        suggestions.push("Emphasize recent, role-specific experience.".to_string());
    }

    if resume.education.is_empty() {
        suggestions.push("Include relevant educational qualifications.".to_string());
    }

    if resume.certifications.is_empty() {
        suggestions.push("Add relevant certifications (e.g., AWS, CISSP).".to_string());
    }

    if formatting_penalty < 0.0 {
        suggestions.push("Simplify formatting - avoid images or tables.".to_string());
    }

    if suggestions.is_empty() {
        suggestions.push(WELL_ALIGNED.to_string());
    }

    suggestions
}

/// Job skills absent from the résumé, in the job's casing and sorted order.
pub fn missing_skills<'a>(resume: &Profile, job: &'a Profile) -> Vec<&'a str> {
    let present = resume.skill_keys();
    job.skills
        .iter()
        .filter(|skill| !present.contains(&skill.to_lowercase()))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn resume(years: u32) -> Profile {
        Profile {
            skills: ["Python".to_string(), "react".to_string()].into(),
            total_experience_years: years,
            education: vec!["BS in Computer Science".into()],
            certifications: vec!["AWS Certified".into()],
            ..Profile::default()
        }
    }

    #[test]
    fn test_well_aligned_when_nothing_fires() {
        let job = Profile {
            skills: ["python".to_string(), "React".to_string()].into(),
            ..Profile::default()
        };
        assert_eq!(suggest(&resume(5), &job, 0.0), vec![WELL_ALIGNED.to_string()]);
    }

    #[test]
    fn test_rules_fire_in_order() {
        let job = Profile {
            skills: ["Python".to_string(), "Kubernetes".to_string(), "AWS".to_string()].into(),
            ..Profile::default()
        };
        let bare = Profile {
            skills: ["python".to_string()].into(),
            total_experience_years: 1,
            ..Profile::default()
        };

        let suggestions = suggest(&bare, &job, -10.0);
        assert_eq!(
            suggestions,
            vec![
                "Add the following skills to your resume: AWS, Kubernetes.".to_string(),
                "Highlight more experience to meet typical 2+ year requirements.".to_string(),
                "Include relevant educational qualifications.".to_string(),
                "Add relevant certifications (e.g., AWS, CISSP).".to_string(),
                "Simplify formatting - avoid images or tables.".to_string(),
            ]
        );
    }

    #[test]
    fn test_senior_without_role_diversity() {
        let job = Profile::default();
        let suggestions = suggest(&resume(12), &job, 0.0);
        assert_eq!(suggestions, vec!["Emphasize recent, role-specific experience.".to_string()]);

        let diverse_job = Profile {
            experience_by_role: BTreeMap::from([("backend".to_string(), 3), ("general".to_string(), 2)]),
            ..Profile::default()
        };
        assert_eq!(suggest(&resume(12), &diverse_job, 0.0), vec![WELL_ALIGNED.to_string()]);
    }

    #[test]
    fn test_deterministic() {
        let job = Profile {
            skills: ["Go".to_string(), "Rust".to_string(), "SQL".to_string()].into(),
            ..Profile::default()
        };
        assert_eq!(suggest(&resume(0), &job, -5.0), suggest(&resume(0), &job, -5.0));
    }
}
