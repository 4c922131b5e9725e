//! Proposal route handlers
//!
//! Dashboard listing, creation (custom or from a template), rename and delete.

use crate::error::{validation_error, ApiResult};
use crate::models::{
    CreateFromTemplateRequest, CreateProposalRequest, MessageResponse, ProposalListResponse,
    ProposalResponse, RenameProposalRequest, SuccessResponse, TemplateListResponse,
};
use crate::proposal::templates;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// List all proposals for the dashboard
pub async fn list_proposals(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<ProposalListResponse>>> {
    let proposals = state.proposals.list().await;
    debug!("Listing {} proposals", proposals.len());

    Ok(Json(SuccessResponse::with_data(
        format!("{} proposals found.", proposals.len()),
        ProposalListResponse { proposals },
    )))
}

/// Create a proposal from user-supplied sections
pub async fn create_proposal(
    State(state): State<SharedState>,
    Json(payload): Json<CreateProposalRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalResponse>>> {
    payload.validate()?;

    let submitted = payload.sections.len();
    let proposal = state
        .proposals
        .create(templates::custom(payload.title, payload.sections))
        .await?;

    info!(
        "Proposal created: {} (id: {}, {} of {} sections kept)",
        proposal.title,
        proposal.id,
        proposal.sections.len(),
        submitted
    );

    Ok(Json(SuccessResponse::with_data(
        "Proposal created successfully.",
        ProposalResponse { proposal },
    )))
}

/// List the built-in templates
pub async fn list_templates() -> ApiResult<Json<SuccessResponse<TemplateListResponse>>> {
    Ok(Json(SuccessResponse::with_data(
        "Templates retrieved successfully.",
        TemplateListResponse {
            templates: templates::templates(),
        },
    )))
}

/// Create a proposal from a built-in template
pub async fn create_from_template(
    State(state): State<SharedState>,
    Json(payload): Json<CreateFromTemplateRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalResponse>>> {
    payload.validate()?;

    let proposal = templates::from_template(&payload.template_id)?;
    let proposal = state.proposals.create(proposal).await?;

    info!(
        "Proposal created from template '{}': {} (id: {})",
        payload.template_id, proposal.title, proposal.id
    );

    Ok(Json(SuccessResponse::with_data(
        "Proposal created from template.",
        ProposalResponse { proposal },
    )))
}

/// Get a proposal by ID
pub async fn get_proposal(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<ProposalResponse>>> {
    let proposal = state.proposals.get(id).await?;

    Ok(Json(SuccessResponse::with_data(
        "Proposal retrieved successfully.",
        ProposalResponse { proposal },
    )))
}

/// Rename a proposal
pub async fn rename_proposal(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameProposalRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalResponse>>> {
    payload.validate()?;

    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(validation_error("Title must not be blank"));
    }

    let (proposal, _) = state
        .proposals
        .update(id, |proposal| {
            proposal.title = title;
            Ok(())
        })
        .await?;

    info!("Proposal {} renamed to '{}'", proposal.id, proposal.title);

    Ok(Json(SuccessResponse::with_data(
        "Proposal updated successfully.",
        ProposalResponse { proposal },
    )))
}

/// Delete a proposal
pub async fn delete_proposal(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.proposals.delete(id).await?;
    info!("Proposal deleted: {}", id);

    Ok(Json(MessageResponse::new("Proposal deleted successfully.")))
}
