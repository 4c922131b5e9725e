//! Proposal request/response DTOs

use crate::proposal::templates::ProposalTemplate;
use crate::proposal::{Proposal, ProposalSummary, Section, SectionDraft, SectionType};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a proposal from explicit sections ("custom design")
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    #[serde(default)]
    pub title: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub sections: Vec<SectionDraft>,
}

/// Request to create a proposal from a built-in template
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFromTemplateRequest {
    #[validate(length(min = 1, message = "Template id is required"))]
    pub template_id: String,
}

/// Request to rename a proposal
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameProposalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
}

/// Bulk save of all sections, in display order
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveSectionsRequest {
    #[validate(nested)]
    pub sections: Vec<SectionDraft>,
}

/// Request to append a section of a given type
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSectionRequest {
    #[serde(rename = "type", default)]
    pub kind: SectionType,
}

/// Drag-and-drop move of one section
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderSectionsRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub proposal: Proposal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListResponse {
    pub templates: &'static [ProposalTemplate],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub section: Section,
    pub proposal: Proposal,
}
