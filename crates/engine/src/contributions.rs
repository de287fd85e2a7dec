//! Contribution primitives.
//!
//! A `Contribution` is a single pledge against one campaign. It is immutable
//! once stored and is only ever persisted together with the matching
//! increment of the campaign total.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Amount, ContributeCmd, EngineError, ResultEngine, normalize_optional_text,
    normalize_required_text,
    util::{parse_campaign_id, parse_uuid},
};

const IDEMPOTENCY_KEY_MAX_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: Amount,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    /// Validates untrusted input and builds a new contribution with a fresh
    /// id.
    ///
    /// Performs no I/O: whether the campaign exists is checked when the
    /// contribution is applied to the ledger. The fields are validated before
    /// the campaign id, so a bad body is reported as `Validation` even when
    /// the id is malformed too.
    pub fn record(cmd: ContributeCmd, created_at: DateTime<Utc>) -> ResultEngine<Self> {
        let amount = cmd.amount.resolve("amount")?;
        let name = normalize_required_text(&cmd.name, "name")?;
        let email = normalize_email(&cmd.email)?;
        let phone_number = normalize_required_text(&cmd.phone_number, "phone number")?;
        let message = normalize_optional_text(cmd.message.as_deref());
        let idempotency_key = normalize_idempotency_key(cmd.idempotency_key.as_deref())?;
        let campaign_id = parse_campaign_id(&cmd.campaign_id)?;

        Ok(Self {
            id: Uuid::new_v4(),
            campaign_id,
            amount,
            name,
            email,
            phone_number,
            message,
            idempotency_key,
            created_at,
        })
    }

    /// `true` when both describe the same pledge: same campaign, amount and
    /// contributor details.
    pub(crate) fn same_pledge(&self, other: &Contribution) -> bool {
        self.campaign_id == other.campaign_id
            && self.amount == other.amount
            && self.name == other.name
            && self.email == other.email
            && self.phone_number == other.phone_number
            && self.message == other.message
    }
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = normalize_required_text(value, "email")?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(EngineError::Validation(format!("invalid email: {email}")));
    }
    Ok(email)
}

fn normalize_idempotency_key(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(key) = normalize_optional_text(value) else {
        return Ok(None);
    };
    if key.chars().count() > IDEMPOTENCY_KEY_MAX_LEN {
        return Err(EngineError::Validation(format!(
            "idempotency key must be at most {IDEMPOTENCY_KEY_MAX_LEN} characters"
        )));
    }
    Ok(Some(key))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub campaign_id: String,
    pub amount: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id"
    )]
    Campaigns,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaigns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Contribution> for ActiveModel {
    fn from(contribution: &Contribution) -> Self {
        Self {
            id: ActiveValue::Set(contribution.id.to_string()),
            campaign_id: ActiveValue::Set(contribution.campaign_id.to_string()),
            amount: ActiveValue::Set(contribution.amount.shillings()),
            name: ActiveValue::Set(contribution.name.clone()),
            email: ActiveValue::Set(contribution.email.clone()),
            phone_number: ActiveValue::Set(contribution.phone_number.clone()),
            message: ActiveValue::Set(contribution.message.clone()),
            idempotency_key: ActiveValue::Set(contribution.idempotency_key.clone()),
            created_at: ActiveValue::Set(contribution.created_at),
        }
    }
}

impl TryFrom<Model> for Contribution {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "contribution")?,
            campaign_id: parse_uuid(&model.campaign_id, "campaign")?,
            amount: Amount::new(model.amount),
            name: model.name,
            email: model.email,
            phone_number: model.phone_number,
            message: model.message,
            idempotency_key: model.idempotency_key,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMPAIGN_ID: &str = "6f1c2a4e-8d3b-4c5a-9e7f-0a1b2c3d4e5f";

    fn cmd(amount: impl Into<crate::AmountInput>) -> ContributeCmd {
        ContributeCmd::new(CAMPAIGN_ID, amount, "Asha", "a@x.com", "0700000000")
    }

    #[test]
    fn record_builds_a_normalized_contribution() {
        let now = Utc::now();
        let contribution = Contribution::record(
            cmd(25_000).message("  Good luck  ").idempotency_key(" k-1 "),
            now,
        )
        .unwrap();

        assert_eq!(contribution.campaign_id.to_string(), CAMPAIGN_ID);
        assert_eq!(contribution.amount, Amount::new(25_000));
        assert_eq!(contribution.message.as_deref(), Some("Good luck"));
        assert_eq!(contribution.idempotency_key.as_deref(), Some("k-1"));
        assert_eq!(contribution.created_at, now);
    }

    #[test]
    fn record_generates_distinct_ids() {
        let a = Contribution::record(cmd(1), Utc::now()).unwrap();
        let b = Contribution::record(cmd(1), Utc::now()).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.same_pledge(&b));
    }

    #[test]
    fn blank_message_becomes_none() {
        let contribution = Contribution::record(cmd(10).message("   "), Utc::now()).unwrap();
        assert_eq!(contribution.message, None);
    }

    #[test]
    fn required_fields_are_enforced() {
        let now = Utc::now();

        let mut missing_name = cmd(10);
        missing_name.name = "  ".to_string();
        assert_eq!(
            Contribution::record(missing_name, now).unwrap_err(),
            EngineError::Validation("name must not be empty".to_string())
        );

        let mut missing_phone = cmd(10);
        missing_phone.phone_number = String::new();
        assert!(matches!(
            Contribution::record(missing_phone, now),
            Err(EngineError::Validation(_))
        ));

        for email in ["", "asha", "@x.com", "asha@", "a@b@c", "a sha@x.com"] {
            let mut bad_email = cmd(10);
            bad_email.email = email.to_string();
            assert!(
                matches!(
                    Contribution::record(bad_email, now),
                    Err(EngineError::Validation(_))
                ),
                "{email:?}"
            );
        }
    }

    #[test]
    fn oversized_idempotency_key_is_rejected() {
        let key = "k".repeat(IDEMPOTENCY_KEY_MAX_LEN + 1);
        assert!(matches!(
            Contribution::record(cmd(10).idempotency_key(key), Utc::now()),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn body_is_validated_before_campaign_id() {
        let mut bad = cmd(0);
        bad.campaign_id = "not-a-uuid".to_string();
        assert!(matches!(
            Contribution::record(bad, Utc::now()),
            Err(EngineError::Validation(_))
        ));

        let mut unknown = cmd(10);
        unknown.campaign_id = "not-a-uuid".to_string();
        assert_eq!(
            Contribution::record(unknown, Utc::now()).unwrap_err(),
            EngineError::NotFound("campaign not-a-uuid".to_string())
        );
    }

    #[test]
    fn same_pledge_compares_amount_and_contributor() {
        let now = Utc::now();
        let first = Contribution::record(cmd(5_000).idempotency_key("k-1"), now).unwrap();

        let same = Contribution::record(cmd(5_000).idempotency_key("k-1"), now).unwrap();
        assert!(first.same_pledge(&same));

        let more = Contribution::record(cmd(9_000).idempotency_key("k-1"), now).unwrap();
        assert!(!first.same_pledge(&more));

        let mut other = cmd(5_000).idempotency_key("k-1");
        other.name = "Okello".to_string();
        let other = Contribution::record(other, now).unwrap();
        assert!(!first.same_pledge(&other));
    }
}
