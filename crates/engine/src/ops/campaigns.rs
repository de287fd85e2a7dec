use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, Campaign, CampaignCode, Contribution, CreateCampaignCmd, EngineError, ResultEngine,
    UpdateCampaignCmd, campaigns, contributions, normalize_optional_text, normalize_required_text,
    util::{is_unique_violation, parse_campaign_id},
};

use super::{Engine, with_tx};

/// Generated codes are short; a handful of collisions in a row means the code
/// space is crowded, not bad luck.
const CODE_ATTEMPTS: usize = 8;

impl Engine {
    /// Creates a campaign with `current_amount = 0`.
    ///
    /// A missing code is generated; a client-supplied code that is already
    /// taken fails with `Conflict`.
    pub async fn create_campaign(&self, cmd: CreateCampaignCmd) -> ResultEngine<Campaign> {
        let target_amount = cmd.target_amount.resolve("target amount")?;
        let supplied_code = cmd.code.as_deref().map(CampaignCode::parse).transpose()?;
        let now = Utc::now();

        let mut campaign = Campaign {
            id: Uuid::new_v4(),
            code: supplied_code.clone().unwrap_or_else(CampaignCode::generate),
            title: normalize_required_text(&cmd.title, "title")?,
            description: normalize_required_text(&cmd.description, "description")?,
            target_amount,
            current_amount: Amount::ZERO,
            organizer_name: normalize_required_text(&cmd.organizer_name, "organizer name")?,
            organizer_contact: normalize_required_text(
                &cmd.organizer_contact,
                "organizer contact",
            )?,
            location: normalize_required_text(&cmd.location, "location")?,
            category: normalize_required_text(&cmd.category, "category")?,
            image_url: normalize_optional_text(cmd.image_url.as_deref()),
            created_at: now,
            updated_at: now,
        };

        // A single INSERT is atomic on its own; the unique index on `code`
        // arbitrates collisions.
        for _ in 0..CODE_ATTEMPTS {
            match campaigns::ActiveModel::from(&campaign)
                .insert(&self.database)
                .await
            {
                Ok(model) => {
                    let created = Campaign::try_from(model)?;
                    tracing::info!("campaign {} created ({})", created.code, created.id);
                    return Ok(created);
                }
                Err(err) if is_unique_violation(&err) => {
                    if supplied_code.is_some() {
                        return Err(EngineError::Conflict(campaign.code.to_string()));
                    }
                    tracing::debug!("campaign code {} taken, generating another", campaign.code);
                    campaign.code = CampaignCode::generate();
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(EngineError::Conflict(
            "could not allocate a free campaign code".to_string(),
        ))
    }

    /// Returns a campaign by id.
    pub async fn campaign(&self, campaign_id: &str) -> ResultEngine<Campaign> {
        let id = parse_campaign_id(campaign_id)?;
        find_campaign(&self.database, id).await
    }

    /// Returns a campaign together with its contributions, newest first.
    ///
    /// Both reads share one transaction, so the total always matches the
    /// returned contributions.
    pub async fn campaign_with_contributions(
        &self,
        campaign_id: &str,
    ) -> ResultEngine<(Campaign, Vec<Contribution>)> {
        let id = parse_campaign_id(campaign_id)?;
        with_tx!(self, |db_tx| {
            let campaign = find_campaign(&db_tx, id).await?;
            let contributions = contributions::Entity::find()
                .filter(contributions::Column::CampaignId.eq(id.to_string()))
                .order_by_desc(contributions::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Contribution::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            Ok((campaign, contributions))
        })
    }

    /// Lists campaigns, newest first.
    pub async fn list_campaigns(&self) -> ResultEngine<Vec<Campaign>> {
        campaigns::Entity::find()
            .order_by_desc(campaigns::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Campaign::try_from)
            .collect()
    }

    /// Lists campaigns newest first, each with its contributions (newest
    /// first), read from a single snapshot.
    pub async fn list_campaigns_with_contributions(
        &self,
    ) -> ResultEngine<Vec<(Campaign, Vec<Contribution>)>> {
        with_tx!(self, |db_tx| {
            let rows = campaigns::Entity::find()
                .order_by_desc(campaigns::Column::CreatedAt)
                .order_by_asc(campaigns::Column::Id)
                .find_with_related(contributions::Entity)
                .order_by_desc(contributions::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            rows.into_iter()
                .map(|(campaign, models)| -> ResultEngine<(Campaign, Vec<Contribution>)> {
                    let contributions = models
                        .into_iter()
                        .map(Contribution::try_from)
                        .collect::<ResultEngine<Vec<_>>>()?;
                    Ok((Campaign::try_from(campaign)?, contributions))
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Updates campaign metadata.
    ///
    /// `current_amount` and `code` are never written here; only the fields
    /// present in `cmd` change, plus `updated_at`.
    pub async fn update_campaign(
        &self,
        campaign_id: &str,
        cmd: UpdateCampaignCmd,
    ) -> ResultEngine<Campaign> {
        let id = parse_campaign_id(campaign_id)?;
        if cmd.is_empty() {
            return Err(EngineError::Validation(
                "provide at least one field to update".to_string(),
            ));
        }

        let required = |value: Option<String>, label: &str| -> ResultEngine<ActiveValue<String>> {
            match value {
                Some(v) => Ok(ActiveValue::Set(normalize_required_text(&v, label)?)),
                None => Ok(ActiveValue::NotSet),
            }
        };

        let target_amount = match &cmd.target_amount {
            Some(input) => ActiveValue::Set(input.resolve("target amount")?.shillings()),
            None => ActiveValue::NotSet,
        };
        let image_url = match cmd.image_url {
            Some(url) => ActiveValue::Set(normalize_optional_text(url.as_deref())),
            None => ActiveValue::NotSet,
        };

        let model = campaigns::ActiveModel {
            id: ActiveValue::Unchanged(id.to_string()),
            title: required(cmd.title, "title")?,
            description: required(cmd.description, "description")?,
            target_amount,
            organizer_name: required(cmd.organizer_name, "organizer name")?,
            organizer_contact: required(cmd.organizer_contact, "organizer contact")?,
            location: required(cmd.location, "location")?,
            category: required(cmd.category, "category")?,
            image_url,
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };

        match model.update(&self.database).await {
            Ok(updated) => Campaign::try_from(updated),
            Err(DbErr::RecordNotUpdated) => Err(EngineError::NotFound(format!("campaign {id}"))),
            Err(err) => Err(err.into()),
        }
    }
}

async fn find_campaign<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<Campaign> {
    let model = campaigns::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("campaign {id}")))?;
    Campaign::try_from(model)
}
