//! Section route handlers
//!
//! Editing operations on the sections of a proposal working copy.

use crate::error::ApiResult;
use crate::models::{
    AddSectionRequest, ProposalResponse, ReorderSectionsRequest, SaveSectionsRequest,
    SectionResponse, SuccessResponse,
};
use crate::proposal::SectionPatch;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Replace all sections of a proposal (bulk save)
pub async fn save_sections(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveSectionsRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalResponse>>> {
    payload.validate()?;

    let (proposal, _) = state
        .proposals
        .update(id, |proposal| proposal.replace_sections(payload.sections))
        .await?;

    info!("Saved {} sections of proposal {}", proposal.sections.len(), id);

    Ok(Json(SuccessResponse::with_data(
        "Sections saved successfully.",
        ProposalResponse { proposal },
    )))
}

/// Append a placeholder section of the requested type
pub async fn add_section(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddSectionRequest>,
) -> ApiResult<Json<SuccessResponse<SectionResponse>>> {
    let (proposal, section) = state
        .proposals
        .update(id, |proposal| Ok(proposal.add_section(payload.kind).clone()))
        .await?;

    debug!("Added {} section {} to proposal {}", section.kind.as_str(), section.id, id);

    Ok(Json(SuccessResponse::with_data(
        "Section added successfully.",
        SectionResponse { section, proposal },
    )))
}

/// Edit one section
pub async fn update_section(
    State(state): State<SharedState>,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SectionPatch>,
) -> ApiResult<Json<SuccessResponse<SectionResponse>>> {
    payload.validate()?;

    let (proposal, section) = state
        .proposals
        .update(id, |proposal| {
            proposal.update_section(section_id, payload).cloned()
        })
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Section updated successfully.",
        SectionResponse { section, proposal },
    )))
}

/// Remove one section
pub async fn remove_section(
    State(state): State<SharedState>,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<SuccessResponse<SectionResponse>>> {
    let (proposal, section) = state
        .proposals
        .update(id, |proposal| proposal.remove_section(section_id))
        .await?;

    info!("Removed section '{}' from proposal {}", section.title, id);

    Ok(Json(SuccessResponse::with_data(
        "Section removed successfully.",
        SectionResponse { section, proposal },
    )))
}

/// Move a section to a new position
pub async fn reorder_sections(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReorderSectionsRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalResponse>>> {
    let (proposal, _) = state
        .proposals
        .update(id, |proposal| proposal.move_section(payload.from, payload.to))
        .await?;

    debug!("Moved section {} -> {} in proposal {}", payload.from, payload.to, id);

    Ok(Json(SuccessResponse::with_data(
        "Sections reordered successfully.",
        ProposalResponse { proposal },
    )))
}
