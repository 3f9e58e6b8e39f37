//! Static skill taxonomy used for local skill extraction

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Programming,
    Frameworks,
    Cloud,
    Devops,
    Data,
    Cybersecurity,
    AiMl,
    SoftSkills,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 8] = [
        SkillCategory::Programming,
        SkillCategory::Frameworks,
        SkillCategory::Cloud,
        SkillCategory::Devops,
        SkillCategory::Data,
        SkillCategory::Cybersecurity,
        SkillCategory::AiMl,
        SkillCategory::SoftSkills,
    ];

    /// Lower-case skills belonging to this category
    pub fn skills(self) -> &'static [&'static str] {
        match self {
            SkillCategory::Programming => &["python", "java", "javascript", "c++", "go", "rust"],
            SkillCategory::Frameworks => {
                &["react", "angular", "vue.js", "node.js", "django", "flask", "spring"]
            }
            SkillCategory::Cloud => &["aws", "azure", "google cloud", "oracle cloud"],
            SkillCategory::Devops => &["docker", "kubernetes", "jenkins", "git", "terraform"],
            SkillCategory::Data => &["sql", "nosql", "hadoop", "spark", "tableau", "power bi"],
            SkillCategory::Cybersecurity => {
                &["firewalls", "encryption", "penetration testing", "siem"]
            }
            SkillCategory::AiMl => &["machine learning", "tensorflow", "pytorch", "nlp"],
            SkillCategory::SoftSkills => {
                &["communication", "problem-solving", "leadership", "teamwork"]
            }
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SkillCategory::Programming => "programming",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Cloud => "cloud",
            SkillCategory::Devops => "devops",
            SkillCategory::Data => "data",
            SkillCategory::Cybersecurity => "cybersecurity",
            SkillCategory::AiMl => "ai_ml",
            SkillCategory::SoftSkills => "soft_skills",
        };
        write!(f, "{}", name)
    }
}

/// Every taxonomy skill in category order.
pub fn all_skills() -> impl Iterator<Item = &'static str> {
    SkillCategory::ALL.into_iter().flat_map(|category| category.skills().iter().copied())
}

/// Category a skill belongs to, if it is part of the taxonomy.
pub fn category_of(skill: &str) -> Option<SkillCategory> {
    let skill = skill.to_lowercase();
    SkillCategory::ALL
        .into_iter()
        .find(|category| category.skills().contains(&skill.as_str()))
}
