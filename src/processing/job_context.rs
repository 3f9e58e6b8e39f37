//! Job level and technical domain classification

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobLevel {
    Entry,
    Mid,
    Senior,
    Management,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobDomain {
    Frontend,
    Backend,
    Fullstack,
    Devops,
    Data,
    Security,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContext {
    pub level: JobLevel,
    pub domain: JobDomain,
}

/// Tiers are checked in this order; the first with any hit wins.
const LEVEL_KEYWORDS: [(JobLevel, &[&str]); 4] = [
    (JobLevel::Entry, &["junior", "entry", "entry-level", "graduate", "associate"]),
    (JobLevel::Mid, &["mid-level", "intermediate", "experienced"]),
    (JobLevel::Senior, &["senior", "lead", "principal", "staff", "architect"]),
    (JobLevel::Management, &["manager", "director", "head", "vp", "chief"]),
];

/// Enumeration order breaks ties between equally scored domains.
const DOMAIN_KEYWORDS: [(JobDomain, &[&str]); 6] = [
    (
        JobDomain::Frontend,
        &["frontend", "front-end", "ui", "ux", "react", "angular", "vue", "javascript", "typescript", "css", "html"],
    ),
    (
        JobDomain::Backend,
        &["backend", "back-end", "api", "server", "database", "python", "java", "node.js", "golang"],
    ),
    (JobDomain::Fullstack, &["fullstack", "full-stack", "full stack", "frontend", "backend"]),
    (JobDomain::Devops, &["devops", "cloud", "aws", "azure", "kubernetes", "docker", "ci/cd"]),
    (
        JobDomain::Data,
        &["data engineer", "data scientist", "machine learning", "ai", "analytics", "big data"],
    ),
    (
        JobDomain::Security,
        &["security", "cybersecurity", "information security", "security engineer"],
    ),
];

pub fn classify(job_text: &str) -> JobContext {
    let lowered = job_text.to_lowercase();
    JobContext {
        level: classify_level(&lowered),
        domain: classify_domain(&lowered),
    }
}

fn classify_level(lowered: &str) -> JobLevel {
    LEVEL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(level, _)| *level)
        .unwrap_or(JobLevel::Mid)
}

fn classify_domain(lowered: &str) -> JobDomain {
    let mut best = (JobDomain::Fullstack, 0usize);
    for (domain, keywords) in DOMAIN_KEYWORDS.iter() {
        let hits = keywords.iter().filter(|k| lowered.contains(*k)).count();
        // Strictly greater keeps the earliest domain on ties.
        if hits > best.1 {
            best = (*domain, hits);
        }
    }
    best.0
}

impl fmt::Display for JobLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            JobLevel::Entry => "entry",
            JobLevel::Mid => "mid",
            JobLevel::Senior => "senior",
            JobLevel::Management => "management",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for JobDomain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            JobDomain::Frontend => "frontend",
            JobDomain::Backend => "backend",
            JobDomain::Fullstack => "fullstack",
            JobDomain::Devops => "devops",
            JobDomain::Data => "data",
            JobDomain::Security => "security",
        };
        write!(f, "{}", name)
    }
}
