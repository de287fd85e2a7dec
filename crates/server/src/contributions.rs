//! Contribution API endpoints.

use api_types::contribution::{
    ContributeResponse, ContributionNew, ContributionView, ContributionWithCampaign,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use engine::ContributeCmd;

use crate::{
    ServerError,
    server::{IdempotencyKey, ServerState},
    views::{amount_input, campaign_view, contribution_view, contribution_with_campaign},
};

/// Records a contribution. Answers `201 Created`, or `200 OK` when the
/// idempotency key matched an earlier contribution.
pub async fn contribute(
    State(state): State<ServerState>,
    Path(campaign_id): Path<String>,
    idempotency_header: Option<TypedHeader<IdempotencyKey>>,
    payload: Result<Json<ContributionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ContributeResponse>), ServerError> {
    let Json(payload) = payload?;
    let mut cmd = ContributeCmd::new(
        campaign_id,
        amount_input(payload.amount),
        payload.name,
        payload.email,
        payload.phone_number,
    );
    cmd.message = payload.message;
    cmd.idempotency_key = match idempotency_header {
        Some(TypedHeader(IdempotencyKey(key))) => Some(key),
        None => payload.idempotency_key,
    };

    let receipt = state.engine.record_contribution(cmd).await?;
    let status = if receipt.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(ContributeResponse {
            contribution: contribution_view(receipt.contribution),
            campaign: campaign_view(receipt.campaign, None),
            replayed: receipt.replayed,
        }),
    ))
}

pub async fn list_for_campaign(
    State(state): State<ServerState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<Vec<ContributionView>>, ServerError> {
    let contributions = state
        .engine
        .list_campaign_contributions(&campaign_id)
        .await?;
    Ok(Json(
        contributions.into_iter().map(contribution_view).collect(),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ContributionWithCampaign>>, ServerError> {
    let rows = state.engine.list_contributions().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(contribution, campaign)| contribution_with_campaign(contribution, campaign))
            .collect(),
    ))
}
