//! Preview and export route handlers

use crate::error::{ApiResult, AppError};
use crate::export::{
    calculate_pages, render_pdf, render_preview_page, PdfExportSettings, PreviewCursor, RenderedPdf,
};
use crate::models::{
    ExportRequest, InlineExportRequest, PagesResponse, PreviewRequest, PreviewResponse,
    SuccessResponse,
};
use crate::proposal::{Proposal, Section};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Preview pagination of a proposal
pub async fn get_pages(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<PagesResponse>>> {
    let proposal = state.proposals.get(id).await?;
    let pages = calculate_pages(&proposal, state.export.preview_page_height);

    debug!("Proposal {} paginates to {} preview pages", id, pages.len());

    Ok(Json(SuccessResponse::with_data(
        "Pages calculated successfully.",
        PagesResponse {
            total_pages: pages.len(),
            pages,
        },
    )))
}

/// One preview page rendered with the given export settings
pub async fn preview_page(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PreviewRequest>,
) -> ApiResult<Json<SuccessResponse<PreviewResponse>>> {
    let proposal = state.proposals.get(id).await?;
    let settings = state.export_settings(payload.settings);
    settings.validate()?;

    let pages = calculate_pages(&proposal, state.export.preview_page_height);
    let date_text = state.date_text(state.today());
    let page = render_preview_page(&pages, payload.page, &settings, &date_text)?;

    let mut cursor = PreviewCursor::new(pages.len());
    cursor.go_to(payload.page);
    let (mut back, mut forward) = (cursor, cursor);
    let previous_page = cursor.has_previous().then(|| back.previous());
    let next_page = cursor.has_next().then(|| forward.next());

    Ok(Json(SuccessResponse::with_data(
        format!("Page {} of {}.", cursor.current(), cursor.total()),
        PreviewResponse {
            page,
            previous_page,
            next_page,
        },
    )))
}

/// Export a stored proposal as a PDF download
pub async fn export_proposal(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExportRequest>,
) -> ApiResult<Response> {
    let proposal = state.proposals.get(id).await?;
    let rendered = render(&state, proposal, payload.settings).await?;

    info!(
        "Exported proposal {} as '{}' ({} pages)",
        id, rendered.filename, rendered.page_count
    );

    Ok(pdf_response(rendered))
}

/// Export a proposal posted in the request body
pub async fn export_inline(
    State(state): State<SharedState>,
    Json(payload): Json<InlineExportRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let sections = payload
        .proposal
        .sections
        .into_iter()
        .map(|draft| Section::new(draft.title, draft.content, draft.kind))
        .collect();
    let proposal = Proposal::new(payload.proposal.title, sections);
    let rendered = render(&state, proposal, payload.settings).await?;

    info!(
        "Exported posted proposal as '{}' ({} pages)",
        rendered.filename, rendered.page_count
    );

    Ok(pdf_response(rendered))
}

async fn render(
    state: &SharedState,
    proposal: Proposal,
    settings: Option<PdfExportSettings>,
) -> ApiResult<RenderedPdf> {
    let settings = state.export_settings(settings);
    let options = state.pdf_options(&settings);
    let date = state.today();

    let date_format = state.export.date_format.clone();
    tokio::task::spawn_blocking(move || {
        render_pdf(&proposal, &settings, date, &date_format, &options)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Render task failed: {}", e)))?
}

fn pdf_response(rendered: RenderedPdf) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.filename),
            ),
        ],
        rendered.bytes,
    )
        .into_response()
}
