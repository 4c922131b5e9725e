//! Proposal starting points
//!
//! Built-in templates and the "custom design" creation path.

use crate::error::AppError;
use crate::proposal::{Proposal, Section, SectionDraft};
use serde::Serialize;

/// Title used when a custom proposal is created without one
pub const DEFAULT_CUSTOM_TITLE: &str = "Custom: New Proposal";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSection {
    pub title: &'static str,
    pub content: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub sections: &'static [TemplateSection],
}

static TEMPLATES: &[ProposalTemplate] = &[
    ProposalTemplate {
        id: "template1",
        title: "Business Proposal",
        sections: &[
            TemplateSection {
                title: "Introduction",
                content: "Overview of the business.",
            },
            TemplateSection {
                title: "Objectives",
                content: "Key objectives of the business.",
            },
        ],
    },
    ProposalTemplate {
        id: "template2",
        title: "Marketing Proposal",
        sections: &[
            TemplateSection {
                title: "Executive Summary",
                content: "Summary of marketing goals.",
            },
            TemplateSection {
                title: "Marketing Plan",
                content: "Detailed marketing strategies.",
            },
        ],
    },
];

pub fn templates() -> &'static [ProposalTemplate] {
    TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static ProposalTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Build a proposal from a built-in template
pub fn from_template(id: &str) -> Result<Proposal, AppError> {
    let template =
        find_template(id).ok_or_else(|| AppError::NotFound(format!("Template '{}' not found", id)))?;

    let sections = template
        .sections
        .iter()
        .map(|s| Section::new(s.title, s.content, Default::default()))
        .collect();

    Ok(Proposal::new(format!("Template: {}", template.title), sections))
}

/// Build a proposal from user-supplied sections, dropping incomplete ones
pub fn custom(title: Option<String>, drafts: Vec<SectionDraft>) -> Proposal {
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_CUSTOM_TITLE.to_string());

    let sections = drafts
        .into_iter()
        .filter(SectionDraft::is_filled)
        .map(|d| Section::new(d.title, d.content, d.kind))
        .collect();

    Proposal::new(title, sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template() {
        let proposal = from_template("template2").unwrap();
        assert_eq!(proposal.title, "Template: Marketing Proposal");
        assert_eq!(proposal.sections.len(), 2);
        assert_eq!(proposal.sections[1].title, "Marketing Plan");
        assert_eq!(proposal.sections[1].order, 1);
    }

    #[test]
    fn test_unknown_template() {
        assert!(matches!(from_template("nope"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_custom_drops_incomplete_sections() {
        let proposal = custom(
            None,
            vec![
                SectionDraft::new("Scope", "Everything"),
                SectionDraft::new("", "orphan content"),
                SectionDraft::new("No content", ""),
                SectionDraft::new("Spaced", "   "),
            ],
        );
        assert_eq!(proposal.title, DEFAULT_CUSTOM_TITLE);
        let titles: Vec<&str> = proposal.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Scope", "Spaced"]);
    }

    #[test]
    fn test_custom_keeps_given_title() {
        let proposal = custom(Some("  Q3 Pitch ".to_string()), vec![]);
        assert_eq!(proposal.title, "Q3 Pitch");
        assert!(proposal.sections.is_empty());
    }
}
