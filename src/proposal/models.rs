//! Proposal data models
//!
//! A proposal is a title plus an ordered list of sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of content a section holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    #[default]
    Text,
    List,
    Image,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Text => "text",
            SectionType::List => "list",
            SectionType::Image => "image",
        }
    }

    /// Human label, e.g. "Text"
    pub fn label(&self) -> &'static str {
        match self {
            SectionType::Text => "Text",
            SectionType::List => "List",
            SectionType::Image => "Image",
        }
    }
}

/// A titled content block inside a proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Display position, kept equal to the index in `Proposal::sections`
    pub order: u32,
    #[serde(rename = "type", default)]
    pub kind: SectionType,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>, kind: SectionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            order: 0,
            kind,
        }
    }
}

/// A proposal document (the editor's working copy)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub title: String,
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    pub fn new(title: impl Into<String>, sections: Vec<Section>) -> Self {
        let now = Utc::now();
        let mut proposal = Self {
            id: Uuid::new_v4(),
            title: title.into(),
            sections,
            created_at: now,
            updated_at: now,
        };
        proposal.renumber();
        proposal
    }

    /// Mark the proposal as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Reset every section's `order` to its index
    pub fn renumber(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.order = index as u32;
        }
    }

    pub fn summary(&self) -> ProposalSummary {
        ProposalSummary {
            id: self.id,
            title: self.title.clone(),
            section_count: self.sections.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Lightweight dashboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub id: Uuid,
    pub title: String,
    pub section_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
