use sea_orm::{ConnectionTrait, FromQueryResult, Statement};
use serde::Serialize;
use uuid::Uuid;

use crate::{Amount, CampaignCode, ResultEngine, util::parse_uuid};

use super::{Engine, with_tx};

/// A campaign whose stored total disagrees with its contributions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerDrift {
    pub campaign_id: Uuid,
    pub code: CampaignCode,
    /// `current_amount` as stored on the campaign row.
    pub recorded: Amount,
    /// Sum of the campaign's contributions.
    pub expected: Amount,
}

#[derive(Debug, FromQueryResult)]
struct DriftRow {
    id: String,
    code: String,
    current_amount: i64,
    expected: i64,
}

const DRIFT_SQL: &str = "\
SELECT c.id AS id, c.code AS code, c.current_amount AS current_amount, \
       COALESCE(SUM(k.amount), 0) AS expected \
FROM campaigns c \
LEFT JOIN contributions k ON k.campaign_id = c.id \
GROUP BY c.id, c.code, c.current_amount \
HAVING c.current_amount <> COALESCE(SUM(k.amount), 0) \
ORDER BY c.code;";

const RECOMPUTE_SQL: &str = "\
UPDATE campaigns \
SET current_amount = (SELECT COALESCE(SUM(amount), 0) FROM contributions WHERE campaign_id = campaigns.id) \
WHERE current_amount <> (SELECT COALESCE(SUM(amount), 0) FROM contributions WHERE campaign_id = campaigns.id);";

impl Engine {
    /// Compares each campaign total with the sum of its contributions.
    ///
    /// Read-only. An empty result means the ledger is consistent.
    pub async fn audit_ledger(&self) -> ResultEngine<Vec<LedgerDrift>> {
        let backend = self.database.get_database_backend();
        let rows = DriftRow::find_by_statement(Statement::from_string(backend, DRIFT_SQL))
            .all(&self.database)
            .await?;

        let mut drifts = Vec::with_capacity(rows.len());
        for row in rows {
            let drift = LedgerDrift {
                campaign_id: parse_uuid(&row.id, "campaign")?,
                code: CampaignCode::from_stored(row.code),
                recorded: Amount::new(row.current_amount),
                expected: Amount::new(row.expected),
            };
            tracing::warn!(
                "campaign {} total is {} but contributions sum to {}",
                drift.code,
                drift.recorded,
                drift.expected
            );
            drifts.push(drift);
        }
        Ok(drifts)
    }

    /// Rewrites every drifted campaign total from its contributions, in one
    /// transaction. Returns how many campaigns were corrected.
    pub async fn recompute_campaign_totals(&self) -> ResultEngine<u64> {
        let backend = self.database.get_database_backend();
        let corrected = with_tx!(self, |db_tx| {
            let result = db_tx
                .execute(Statement::from_string(backend, RECOMPUTE_SQL))
                .await?;
            Ok(result.rows_affected())
        })?;

        if corrected > 0 {
            tracing::info!("recomputed totals of {corrected} campaign(s)");
        }
        Ok(corrected)
    }
}
