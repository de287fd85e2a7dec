use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, prelude::*};
use serde::Serialize;

use crate::{
    CampaignCode, Contribution, EngineError, ResultEngine, campaigns, contributions,
    util::parse_campaign_id,
};

use super::Engine;

/// The campaign fields shown next to a contribution in cross-campaign lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CampaignRef {
    pub title: String,
    pub code: CampaignCode,
}

impl Engine {
    /// Lists every contribution, newest first, with the title and code of its
    /// campaign.
    pub async fn list_contributions(&self) -> ResultEngine<Vec<(Contribution, CampaignRef)>> {
        let rows = contributions::Entity::find()
            .find_also_related(campaigns::Entity)
            .order_by_desc(contributions::Column::CreatedAt)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|(contribution, campaign)| -> ResultEngine<(Contribution, CampaignRef)> {
                let campaign = campaign.ok_or_else(|| {
                    DbErr::RecordNotFound(format!(
                        "campaign {} of contribution {}",
                        contribution.campaign_id, contribution.id
                    ))
                })?;
                let campaign_ref = CampaignRef {
                    title: campaign.title,
                    code: CampaignCode::from_stored(campaign.code),
                };
                Ok((Contribution::try_from(contribution)?, campaign_ref))
            })
            .collect()
    }

    /// Lists the contributions of one campaign, newest first.
    pub async fn list_campaign_contributions(
        &self,
        campaign_id: &str,
    ) -> ResultEngine<Vec<Contribution>> {
        let (_, contributions) = self.campaign_with_contributions(campaign_id).await?;
        Ok(contributions)
    }

    /// Number of contributions stored for a campaign.
    pub async fn count_contributions(&self, campaign_id: &str) -> ResultEngine<u64> {
        let id = parse_campaign_id(campaign_id)?;
        let count = contributions::Entity::find()
            .filter(contributions::Column::CampaignId.eq(id.to_string()))
            .count(&self.database)
            .await?;
        if count == 0 {
            let exists = campaigns::Entity::find_by_id(id.to_string())
                .one(&self.database)
                .await?
                .is_some();
            if !exists {
                return Err(EngineError::NotFound(format!("campaign {id}")));
            }
        }
        Ok(count)
    }
}
