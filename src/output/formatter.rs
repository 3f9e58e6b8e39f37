//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::{AtsScorerError, Result};
use crate::processing::analyzer::{
    AnalysisReport, AnalysisSource, RelevantExperience, SkillEntry, Suggestions,
};
use crate::processing::scoring::{
    EDUCATION_CERTIFICATIONS_WEIGHT, EXPERIENCE_WEIGHT, FORMATTING_WEIGHT, KEYWORD_OPTIMIZATION_WEIGHT,
    SKILLS_WEIGHT,
};
use crate::processing::taxonomy::{self, SkillCategory};
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for rendering an analysis report
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter emitting the bare analysis result
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = score_badge(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }
}

fn score_badge(score: f64) -> (&'static str, Color) {
    match score.round() as u32 {
        90..=100 => ("EXCELLENT", Color::Green),
        80..=89 => ("VERY GOOD", Color::BrightGreen),
        70..=79 => ("GOOD", Color::Yellow),
        60..=69 => ("FAIR", Color::BrightYellow),
        50..=59 => ("BELOW AVG", Color::Red),
        _ => ("POOR", Color::BrightRed),
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS COMPATIBILITY ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            report.processing_time_ms
        ));
        output.push_str(&format!(
            "Source: {} | Job level: {} | Domain: {}\n",
            source_label(&report.source),
            report.job_context.level,
            report.job_context.domain
        ));

        output.push_str(&self.format_header("Overall Score", 2));
        output.push_str(&format!(
            "ATS Score: {} {}\n",
            self.colorize(&result.ats_score, Color::Cyan),
            self.format_score_badge(result.score_value())
        ));

        output.push_str(&self.format_header("Score Breakdown", 3));
        for (label, value, cap) in breakdown_rows(report) {
            output.push_str(&format!("  {:<26} {:>6.2} / {}\n", label, value, cap));
        }

        output.push_str(&self.format_header("Extracted Profile", 2));
        let groups = group_skills(&result.data.skills);
        if groups.is_empty() {
            output.push_str("  Skills: none detected\n");
        }
        for (category, skills) in groups {
            output.push_str(&format!("  {:<14} {}\n", format!("{}:", category), skills.join(", ")));
        }
        output.push_str(&format!(
            "  Experience:    {} years\n",
            result.data.total_experience_years
        ));
        for line in experience_lines(&result.data.relevant_experience) {
            output.push_str(&format!("    • {}\n", line));
        }
        output.push_str(&format!("  Education:     {}\n", list_or_none(&result.data.education)));
        output.push_str(&format!(
            "  Certifications: {}\n",
            list_or_none(&result.data.certifications)
        ));
        if !result.data.missing_keywords.is_empty() {
            output.push_str(&format!(
                "  Missing:       {}\n",
                self.colorize(&result.data.missing_keywords.join(", "), Color::Red)
            ));
        }

        output.push_str(&self.format_header("Suggestions", 2));
        match &result.improvement_suggestions {
            Suggestions::Flat(items) => {
                for (i, item) in items.iter().enumerate() {
                    output.push_str(&format!("  {}. {}\n", i + 1, item));
                }
            }
            Suggestions::Categorized(c) => {
                let buckets = [
                    ("[!]", "Critical", &c.critical, Color::Red),
                    ("[*]", "Recommended", &c.recommended, Color::Yellow),
                    ("[+]", "Advanced", &c.advanced, Color::Green),
                ];
                for (icon, title, items, color) in buckets {
                    if items.is_empty() {
                        continue;
                    }
                    output.push_str(&format!("  {}\n", self.colorize(title, color)));
                    for item in items {
                        output.push_str(&format!("    {} {}\n", icon, item));
                    }
                }
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(&report.result)?)
        } else {
            Ok(serde_json::to_string(&report.result)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str("# ATS Compatibility Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Source:** {}\n\n",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                report.processing_time_ms,
                source_label(&report.source)
            ));
            output.push_str(&format!(
                "**Job level:** {} | **Domain:** {} | **Formatting penalty:** {}\n\n",
                report.job_context.level, report.job_context.domain, report.formatting_penalty
            ));
        }

        output.push_str(&format!(
            "**ATS Score:** {} ({})\n\n",
            result.ats_score,
            score_badge(result.score_value()).0
        ));

        output.push_str("## Score Breakdown\n\n");
        output.push_str("| Category | Score | Max |\n");
        output.push_str("|----------|-------|-----|\n");
        for (label, value, cap) in breakdown_rows(report) {
            output.push_str(&format!("| {} | {:.2} | {} |\n", label, value, cap));
        }
        output.push('\n');

        output.push_str("## Extracted Profile\n\n");
        for (category, skills) in group_skills(&result.data.skills) {
            output.push_str(&format!("- **{}:** {}\n", category, skills.join(", ")));
        }
        output.push_str(&format!(
            "- **Experience:** {} years\n",
            result.data.total_experience_years
        ));
        for line in experience_lines(&result.data.relevant_experience) {
            output.push_str(&format!("  - {}\n", line));
        }
        output.push_str(&format!("- **Education:** {}\n", list_or_none(&result.data.education)));
        output.push_str(&format!(
            "- **Certifications:** {}\n",
            list_or_none(&result.data.certifications)
        ));
        if !result.data.missing_keywords.is_empty() {
            output.push_str(&format!(
                "- **Missing keywords:** {}\n",
                result.data.missing_keywords.join(", ")
            ));
        }
        output.push('\n');

        output.push_str("## Suggestions\n\n");
        match &result.improvement_suggestions {
            Suggestions::Flat(items) => {
                for (i, item) in items.iter().enumerate() {
                    output.push_str(&format!("{}. {}\n", i + 1, item));
                }
            }
            Suggestions::Categorized(c) => {
                for (title, items) in [
                    ("Critical", &c.critical),
                    ("Recommended", &c.recommended),
                    ("Advanced", &c.advanced),
                ] {
                    if items.is_empty() {
                        continue;
                    }
                    output.push_str(&format!("### {}\n\n", title));
                    for item in items {
                        output.push_str(&format!("- {}\n", item));
                    }
                    output.push('\n');
                }
            }
        }

        Ok(output)
    }
}

fn source_label(source: &AnalysisSource) -> String {
    match source {
        AnalysisSource::Local => "local scoring".to_string(),
        AnalysisSource::Model(model) => format!("model ({})", model),
    }
}

fn breakdown_rows(report: &AnalysisReport) -> Vec<(&'static str, f64, f64)> {
    let breakdown = &report.result.breakdown;
    let mut rows = vec![
        ("Skills", breakdown.skills, SKILLS_WEIGHT),
        ("Experience", breakdown.experience, EXPERIENCE_WEIGHT),
        (
            "Education & certifications",
            breakdown.education_certifications,
            EDUCATION_CERTIFICATIONS_WEIGHT,
        ),
        ("Formatting", breakdown.formatting, FORMATTING_WEIGHT),
    ];
    if let Some(keywords) = breakdown.keyword_optimization {
        rows.push(("Keyword optimization", keywords, KEYWORD_OPTIMIZATION_WEIGHT));
    }
    rows
}

/// Group skills by taxonomy category, in category order, with anything
/// outside the taxonomy listed last under "other".
pub fn group_skills(skills: &[SkillEntry]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut other = Vec::new();

    for category in SkillCategory::ALL {
        let names: Vec<String> = skills
            .iter()
            .map(SkillEntry::name)
            .filter(|name| taxonomy::category_of(name) == Some(category))
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            groups.push((category.to_string(), names));
        }
    }

    for skill in skills {
        if taxonomy::category_of(skill.name()).is_none() {
            other.push(skill.name().to_string());
        }
    }
    if !other.is_empty() {
        groups.push(("other".to_string(), other));
    }

    groups
}

fn experience_lines(experience: &RelevantExperience) -> Vec<String> {
    match experience {
        RelevantExperience::ByRole(roles) => roles
            .iter()
            .map(|(role, years)| format!("{}: {} years", role, years))
            .collect(),
        RelevantExperience::Detailed {
            roles,
            improvement_areas,
        } => {
            let mut lines: Vec<String> = roles
                .iter()
                .map(|role| match role.relevance_score {
                    Some(score) => format!("{}: {} years (relevance {:.2})", role.title, role.years, score),
                    None => format!("{}: {} years", role.title, role.years),
                })
                .collect();
            if !improvement_areas.is_empty() {
                lines.push(format!("to improve: {}", improvement_areas.join(", ")));
            }
            lines
        }
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        AtsScorerError::OutputFormatting(format!("Failed to save report to {}: {}", file_path.display(), e))
    })
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ats{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ats{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ats{}.md", base_name, timestamp_suffix),
    }
}

/// Where a report passed to `--save` lands: a directory gets a generated
/// file name derived from the resume, anything else is used as given.
pub fn resolve_save_path(save: &Path, format: &OutputFormat, resume: &Path) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, &resume.to_string_lossy(), true))
    } else {
        save.to_path_buf()
    }
}
