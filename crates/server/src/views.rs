//! Conversions between engine types and wire types.

use api_types::{
    AmountValue,
    campaign::CampaignView,
    contribution::{CampaignSummary, ContributionView, ContributionWithCampaign},
};
use engine::{AmountInput, Campaign, CampaignRef, Contribution};

pub(crate) fn amount_input(value: AmountValue) -> AmountInput {
    match value {
        AmountValue::Whole(value) => AmountInput::Whole(value),
        AmountValue::Decimal(value) => AmountInput::Decimal(value),
        AmountValue::Text(value) => AmountInput::Text(value),
    }
}

pub(crate) fn campaign_view(
    campaign: Campaign,
    contributions: Option<Vec<Contribution>>,
) -> CampaignView {
    CampaignView {
        id: campaign.id,
        progress: campaign.progress_percent(),
        code: campaign.code.to_string(),
        title: campaign.title,
        description: campaign.description,
        target_amount: campaign.target_amount.shillings(),
        current_amount: campaign.current_amount.shillings(),
        organizer_name: campaign.organizer_name,
        organizer_contact: campaign.organizer_contact,
        location: campaign.location,
        category: campaign.category,
        image_url: campaign.image_url,
        created_at: campaign.created_at,
        updated_at: campaign.updated_at,
        contributions: contributions
            .map(|list| list.into_iter().map(contribution_view).collect()),
    }
}

pub(crate) fn contribution_view(contribution: Contribution) -> ContributionView {
    ContributionView {
        id: contribution.id,
        campaign_id: contribution.campaign_id,
        amount: contribution.amount.shillings(),
        name: contribution.name,
        email: contribution.email,
        phone_number: contribution.phone_number,
        message: contribution.message,
        created_at: contribution.created_at,
    }
}

pub(crate) fn contribution_with_campaign(
    contribution: Contribution,
    campaign: CampaignRef,
) -> ContributionWithCampaign {
    ContributionWithCampaign {
        contribution: contribution_view(contribution),
        campaign: CampaignSummary {
            title: campaign.title,
            code: campaign.code.to_string(),
        },
    }
}
