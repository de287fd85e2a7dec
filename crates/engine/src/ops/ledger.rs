//! The ledger: record a contribution and move the campaign total with it.
//!
//! The two writes always happen inside one DB transaction:
//!
//! 1. `UPDATE campaigns SET current_amount = current_amount + ?` (the delta is
//!    evaluated by the database, so concurrent writers cannot lose updates)
//! 2. `INSERT INTO contributions ...`
//!
//! The delta runs first: on SQLite the first write of a deferred transaction
//! waits for the writer lock through the busy handler, whereas upgrading a
//! transaction that has already read fails immediately under contention.

use chrono::Utc;
use sea_orm::{
    ConnectionTrait, DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr,
};
use serde::Serialize;

use crate::{
    Campaign, ContributeCmd, Contribution, EngineError, ResultEngine, campaigns, contributions,
    util::is_unique_violation,
};

use super::{Engine, with_tx};

/// Outcome of [`Engine::record_contribution`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContributionReceipt {
    pub contribution: Contribution,
    /// Campaign state right after the commit.
    pub campaign: Campaign,
    /// `true` when an earlier contribution with the same idempotency key was
    /// returned and nothing was written.
    pub replayed: bool,
}

impl Engine {
    /// Records a contribution and increments the campaign total by exactly
    /// its amount, atomically.
    ///
    /// - Input is validated before any write (`Validation`).
    /// - An unknown campaign fails with `NotFound` and creates nothing.
    /// - Any storage failure rolls back both writes (`Storage`). Nothing is
    ///   retried here.
    /// - With an idempotency key, a repeated call returns the first
    ///   contribution and does not count it twice. Reusing the key for a
    ///   different amount or contributor fails with `Conflict`.
    pub async fn record_contribution(&self, cmd: ContributeCmd) -> ResultEngine<ContributionReceipt> {
        let contribution = Contribution::record(cmd, Utc::now())?;

        if let Some(receipt) = self.find_replay(&self.database, &contribution).await? {
            tracing::warn!(
                "replaying contribution {} for campaign {} (idempotency key reused)",
                receipt.contribution.id,
                contribution.campaign_id
            );
            return Ok(receipt);
        }

        let applied = with_tx!(self, |db_tx| {
            self.apply_contribution(&db_tx, &contribution).await
        });

        match applied {
            Ok(campaign) => {
                tracing::debug!(
                    "contribution {} of {} recorded on campaign {} (total {})",
                    contribution.id,
                    contribution.amount,
                    campaign.code,
                    campaign.current_amount
                );
                Ok(ContributionReceipt {
                    contribution,
                    campaign,
                    replayed: false,
                })
            }
            // A concurrent request with the same key committed first; its
            // unique index rejected our insert and our increment was rolled back.
            Err(EngineError::Storage(err))
                if contribution.idempotency_key.is_some() && is_unique_violation(&err) =>
            {
                match self.find_replay(&self.database, &contribution).await? {
                    Some(receipt) => Ok(receipt),
                    None => Err(EngineError::Storage(err)),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Applies an already validated contribution inside a caller-owned
    /// transaction and returns the updated campaign.
    ///
    /// The caller decides when to commit. For the lock ordering described in
    /// the module docs to hold, this should be the first write of `db_tx`.
    pub async fn apply_contribution(
        &self,
        db_tx: &DatabaseTransaction,
        contribution: &Contribution,
    ) -> ResultEngine<Campaign> {
        let campaign_id = contribution.campaign_id.to_string();
        if !contribution.amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        let amount = contribution.amount.shillings();

        let incremented = campaigns::Entity::update_many()
            .col_expr(
                campaigns::Column::CurrentAmount,
                Expr::col(campaigns::Column::CurrentAmount).add(amount),
            )
            .col_expr(
                campaigns::Column::UpdatedAt,
                Expr::value(contribution.created_at),
            )
            .filter(campaigns::Column::Id.eq(campaign_id.clone()))
            .filter(Expr::col(campaigns::Column::CurrentAmount).lte(i64::MAX - amount))
            .exec(db_tx)
            .await?;

        if incremented.rows_affected == 0 {
            let exists = campaigns::Entity::find_by_id(campaign_id.clone())
                .one(db_tx)
                .await?
                .is_some();
            return Err(if exists {
                EngineError::Validation("campaign total would overflow".to_string())
            } else {
                EngineError::NotFound(format!("campaign {campaign_id}"))
            });
        }

        contributions::ActiveModel::from(contribution)
            .insert(db_tx)
            .await?;

        let model = campaigns::Entity::find_by_id(campaign_id.clone())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("campaign {campaign_id}")))?;
        Campaign::try_from(model)
    }

    /// Looks up the contribution already stored under the idempotency key of
    /// `contribution`. A key reused for a different pledge is a `Conflict`.
    async fn find_replay<C: ConnectionTrait>(
        &self,
        db: &C,
        contribution: &Contribution,
    ) -> ResultEngine<Option<ContributionReceipt>> {
        let Some(key) = contribution.idempotency_key.as_deref() else {
            return Ok(None);
        };
        let campaign_id = contribution.campaign_id;

        let Some(existing) = contributions::Entity::find()
            .filter(contributions::Column::CampaignId.eq(campaign_id.to_string()))
            .filter(contributions::Column::IdempotencyKey.eq(key.to_string()))
            .one(db)
            .await?
        else {
            return Ok(None);
        };
        let existing = Contribution::try_from(existing)?;
        if !existing.same_pledge(contribution) {
            return Err(EngineError::Conflict(format!(
                "idempotency key {key} was already used for a different contribution"
            )));
        }

        let campaign = campaigns::Entity::find_by_id(campaign_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("campaign {campaign_id}")))?;

        Ok(Some(ContributionReceipt {
            contribution: existing,
            campaign: Campaign::try_from(campaign)?,
            replayed: true,
        }))
    }
}
