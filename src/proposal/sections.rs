//! Section editing operations
//!
//! Every operation leaves `sections` in display order with `order == index`.

use crate::error::AppError;
use crate::proposal::{Proposal, Section, SectionType};
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

/// A section as submitted by the editor on save
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(max = 200, message = "Section title must be at most 200 characters"))]
    #[serde(default)]
    pub title: String,
    #[validate(length(max = 100000, message = "Section content is too long"))]
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: SectionType,
}

impl SectionDraft {
    #[cfg(test)]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            kind: SectionType::Text,
        }
    }

    /// True when neither title nor content is empty; whitespace counts as content
    pub fn is_filled(&self) -> bool {
        !self.title.is_empty() && !self.content.is_empty()
    }
}

/// Partial update of one section
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    #[validate(length(max = 200, message = "Section title must be at most 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 100000, message = "Section content is too long"))]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<SectionType>,
}

/// Title and placeholder content for a freshly added section
pub fn placeholder(kind: SectionType) -> (String, &'static str) {
    let title = format!("New {} Section", kind.label());
    let content = match kind {
        SectionType::Text => "Start typing your section content...",
        SectionType::List => "- Item 1\n- Item 2\n- Item 3",
        SectionType::Image => "Add image URL or upload",
    };
    (title, content)
}

impl Proposal {
    /// Sort sections by their `order` (stable) and renumber
    pub fn normalize_order(&mut self) {
        self.sections.sort_by_key(|s| s.order);
        self.renumber();
    }

    /// Append a section with placeholder content for its type
    pub fn add_section(&mut self, kind: SectionType) -> &Section {
        let (title, content) = placeholder(kind);
        let mut section = Section::new(title, content, kind);
        section.order = self.sections.len() as u32;
        self.sections.push(section);
        self.touch();
        &self.sections[self.sections.len() - 1]
    }

    fn section_index(&self, section_id: Uuid) -> Result<usize, AppError> {
        self.sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| AppError::NotFound(format!("Section {} not found", section_id)))
    }

    /// Apply a partial update to one section
    pub fn update_section(&mut self, section_id: Uuid, patch: SectionPatch) -> Result<&Section, AppError> {
        let index = self.section_index(section_id)?;
        let section = &mut self.sections[index];
        if let Some(title) = patch.title {
            section.title = title;
        }
        if let Some(content) = patch.content {
            section.content = content;
        }
        if let Some(kind) = patch.kind {
            section.kind = kind;
        }
        self.touch();
        Ok(&self.sections[index])
    }

    /// Remove a section; the last remaining section cannot be removed
    pub fn remove_section(&mut self, section_id: Uuid) -> Result<Section, AppError> {
        let index = self.section_index(section_id)?;
        if self.sections.len() <= 1 {
            return Err(AppError::BadRequest(
                "A proposal must keep at least one section".to_string(),
            ));
        }
        let removed = self.sections.remove(index);
        self.renumber();
        self.touch();
        Ok(removed)
    }

    /// Move the section at `from` to position `to` (drag and drop)
    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), AppError> {
        let len = self.sections.len();
        if from >= len || to >= len {
            return Err(AppError::BadRequest(format!(
                "Section index out of range (from {}, to {}, {} sections)",
                from, to, len
            )));
        }
        if from == to {
            return Ok(());
        }
        let section = self.sections.remove(from);
        self.sections.insert(to, section);
        self.renumber();
        self.touch();
        Ok(())
    }

    /// Replace all sections with the submitted list, in submitted order
    pub fn replace_sections(&mut self, drafts: Vec<SectionDraft>) -> Result<(), AppError> {
        if drafts.is_empty() && !self.sections.is_empty() {
            return Err(AppError::BadRequest(
                "A proposal must keep at least one section".to_string(),
            ));
        }
        let known: HashSet<Uuid> = self.sections.iter().map(|s| s.id).collect();
        let mut seen = HashSet::new();

        self.sections = drafts
            .into_iter()
            .map(|draft| {
                let id = draft
                    .id
                    .filter(|id| known.contains(id) && seen.insert(*id))
                    .unwrap_or_else(Uuid::new_v4);
                Section {
                    id,
                    title: draft.title,
                    content: draft.content,
                    order: 0,
                    kind: draft.kind,
                }
            })
            .collect();
        self.renumber();
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Proposal {
        Proposal::new(
            "Website Redesign",
            vec![
                Section::new("Intro", "Hello", SectionType::Text),
                Section::new("Scope", "- a\n- b", SectionType::List),
                Section::new("Budget", "Lots", SectionType::Text),
            ],
        )
    }

    fn titles(p: &Proposal) -> Vec<&str> {
        p.sections.iter().map(|s| s.title.as_str()).collect()
    }

    fn orders(p: &Proposal) -> Vec<u32> {
        p.sections.iter().map(|s| s.order).collect()
    }

    #[test]
    fn test_add_section_placeholders() {
        let mut p = sample();
        let added = p.add_section(SectionType::List).clone();
        assert_eq!(added.title, "New List Section");
        assert_eq!(added.content, "- Item 1\n- Item 2\n- Item 3");
        assert_eq!(added.order, 3);

        let image = p.add_section(SectionType::Image).clone();
        assert_eq!(image.title, "New Image Section");
        assert_eq!(image.content, "Add image URL or upload");
    }

    #[test]
    fn test_move_section_forward_and_back() {
        let mut p = sample();
        p.move_section(0, 2).unwrap();
        assert_eq!(titles(&p), vec!["Scope", "Budget", "Intro"]);
        assert_eq!(orders(&p), vec![0, 1, 2]);

        p.move_section(2, 0).unwrap();
        assert_eq!(titles(&p), vec!["Intro", "Scope", "Budget"]);
    }

    #[test]
    fn test_move_section_out_of_range() {
        let mut p = sample();
        assert!(matches!(p.move_section(0, 3), Err(AppError::BadRequest(_))));
        assert!(matches!(p.move_section(5, 0), Err(AppError::BadRequest(_))));
        assert_eq!(titles(&p), vec!["Intro", "Scope", "Budget"]);
    }

    #[test]
    fn test_remove_keeps_last_section() {
        let mut p = Proposal::new("Solo", vec![Section::new("Only", "x", SectionType::Text)]);
        let id = p.sections[0].id;
        assert!(matches!(p.remove_section(id), Err(AppError::BadRequest(_))));
        assert_eq!(p.sections.len(), 1);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut p = sample();
        let id = p.sections[1].id;
        let removed = p.remove_section(id).unwrap();
        assert_eq!(removed.title, "Scope");
        assert_eq!(titles(&p), vec!["Intro", "Budget"]);
        assert_eq!(orders(&p), vec![0, 1]);
    }

    #[test]
    fn test_update_unknown_section() {
        let mut p = sample();
        let result = p.update_section(Uuid::new_v4(), SectionPatch::default());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_section_partial() {
        let mut p = sample();
        let id = p.sections[0].id;
        let patch = SectionPatch {
            content: Some("Rewritten".to_string()),
            ..Default::default()
        };
        let updated = p.update_section(id, patch).unwrap();
        assert_eq!(updated.title, "Intro");
        assert_eq!(updated.content, "Rewritten");
    }

    #[test]
    fn test_replace_sections_keeps_known_ids() {
        let mut p = sample();
        let keep = p.sections[2].id;
        let stranger = Uuid::new_v4();

        p.replace_sections(vec![
            SectionDraft { id: Some(keep), ..SectionDraft::new("Budget", "Less") },
            SectionDraft { id: Some(stranger), ..SectionDraft::new("New", "Fresh") },
            SectionDraft { id: Some(keep), ..SectionDraft::new("Dup", "Again") },
        ])
        .unwrap();

        assert_eq!(titles(&p), vec!["Budget", "New", "Dup"]);
        assert_eq!(p.sections[0].id, keep);
        assert_ne!(p.sections[1].id, stranger);
        assert_ne!(p.sections[2].id, keep);
        assert_eq!(orders(&p), vec![0, 1, 2]);
    }

    #[test]
    fn test_replace_sections_refuses_empty_list() {
        let mut p = sample();
        assert!(matches!(p.replace_sections(Vec::new()), Err(AppError::BadRequest(_))));
        assert_eq!(p.sections.len(), 3);

        let mut blank = Proposal::new("Blank", Vec::new());
        blank.replace_sections(Vec::new()).unwrap();
        assert!(blank.sections.is_empty());
    }

    #[test]
    fn test_normalize_order_is_stable() {
        let mut p = sample();
        p.sections[0].order = 5;
        p.sections[1].order = 1;
        p.sections[2].order = 1;
        p.normalize_order();
        assert_eq!(titles(&p), vec!["Scope", "Budget", "Intro"]);
        assert_eq!(orders(&p), vec![0, 1, 2]);
    }
}
