//! Campaign API endpoints.

use api_types::campaign::{CampaignNew, CampaignUpdate, CampaignView};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{CreateCampaignCmd, UpdateCampaignCmd};

use crate::{
    ServerError,
    server::ServerState,
    views::{amount_input, campaign_view},
};

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CampaignNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CampaignView>), ServerError> {
    let Json(payload) = payload?;
    let mut cmd = CreateCampaignCmd::new(
        payload.title,
        payload.description,
        amount_input(payload.target_amount),
        payload.organizer_name,
        payload.organizer_contact,
    )
    .location(payload.location)
    .category(payload.category);
    cmd.code = payload.code;
    cmd.image_url = payload.image_url;

    let campaign = state.engine.create_campaign(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(campaign_view(campaign, Some(Vec::new()))),
    ))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CampaignView>>, ServerError> {
    let views = state
        .engine
        .list_campaigns_with_contributions()
        .await?
        .into_iter()
        .map(|(campaign, contributions)| campaign_view(campaign, Some(contributions)))
        .collect();
    Ok(Json(views))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<CampaignView>, ServerError> {
    let (campaign, contributions) = state
        .engine
        .campaign_with_contributions(&campaign_id)
        .await?;
    Ok(Json(campaign_view(campaign, Some(contributions))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(campaign_id): Path<String>,
    payload: Result<Json<CampaignUpdate>, JsonRejection>,
) -> Result<Json<CampaignView>, ServerError> {
    let Json(payload) = payload?;
    let cmd = UpdateCampaignCmd {
        title: payload.title,
        description: payload.description,
        target_amount: payload.target_amount.map(amount_input),
        organizer_name: payload.organizer_name,
        organizer_contact: payload.organizer_contact,
        location: payload.location,
        category: payload.category,
        image_url: payload.image_url,
    };

    let campaign = state.engine.update_campaign(&campaign_id, cmd).await?;
    Ok(Json(campaign_view(campaign, None)))
}
