//! Campaigns: a fundraising effort with a target and a running total.
//!
//! `current_amount` is a denormalized total of the campaign's contributions.
//! Only the ledger (`Engine::record_contribution`) and the explicit recompute
//! write it; metadata updates leave it untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine, util::parse_uuid};

const CODE_MIN_LEN: usize = 3;
const CODE_MAX_LEN: usize = 16;

/// Short human-facing campaign identifier, e.g. `KQ4821`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignCode(String);

impl CampaignCode {
    /// Normalizes a client-supplied code (trimmed, uppercased, ASCII
    /// alphanumeric).
    pub fn parse(raw: &str) -> ResultEngine<Self> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() < CODE_MIN_LEN || code.len() > CODE_MAX_LEN {
            return Err(EngineError::Validation(format!(
                "campaign code must be {CODE_MIN_LEN}-{CODE_MAX_LEN} characters"
            )));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EngineError::Validation(
                "campaign code must be alphanumeric".to_string(),
            ));
        }
        Ok(Self(code))
    }

    /// Two uppercase letters followed by four digits.
    #[must_use]
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let first = char::from(b'A' + bytes[0] % 26);
        let second = char::from(b'A' + bytes[1] % 26);
        let number = u16::from_be_bytes([bytes[2], bytes[3]]) % 10_000;
        Self(format!("{first}{second}{number:04}"))
    }

    /// Wraps a code read back from storage, where it was validated on write.
    pub(crate) fn from_stored(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub code: CampaignCode,
    pub title: String,
    pub description: String,
    pub target_amount: Amount,
    pub current_amount: Amount,
    pub organizer_name: String,
    pub organizer_contact: String,
    pub location: String,
    pub category: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Share of the target already raised, capped at 100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let target = self.target_amount.shillings();
        if target <= 0 {
            return 0;
        }
        let current = self.current_amount.shillings().max(0);
        let percent = (i128::from(current) * 100) / i128::from(target);
        percent.min(100) as u8
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub code: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub target_amount: i64,
    pub current_amount: i64,
    pub organizer_name: String,
    pub organizer_contact: String,
    pub location: String,
    pub category: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contributions::Entity")]
    Contributions,
}

impl Related<super::contributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Campaign> for ActiveModel {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: ActiveValue::Set(campaign.id.to_string()),
            code: ActiveValue::Set(campaign.code.as_str().to_string()),
            title: ActiveValue::Set(campaign.title.clone()),
            description: ActiveValue::Set(campaign.description.clone()),
            target_amount: ActiveValue::Set(campaign.target_amount.shillings()),
            current_amount: ActiveValue::Set(campaign.current_amount.shillings()),
            organizer_name: ActiveValue::Set(campaign.organizer_name.clone()),
            organizer_contact: ActiveValue::Set(campaign.organizer_contact.clone()),
            location: ActiveValue::Set(campaign.location.clone()),
            category: ActiveValue::Set(campaign.category.clone()),
            image_url: ActiveValue::Set(campaign.image_url.clone()),
            created_at: ActiveValue::Set(campaign.created_at),
            updated_at: ActiveValue::Set(campaign.updated_at),
        }
    }
}

impl TryFrom<Model> for Campaign {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "campaign")?,
            code: CampaignCode::from_stored(model.code),
            title: model.title,
            description: model.description,
            target_amount: Amount::new(model.target_amount),
            current_amount: Amount::new(model.current_amount),
            organizer_name: model.organizer_name,
            organizer_contact: model.organizer_contact,
            location: model.location,
            category: model.category,
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(target: i64, current: i64) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: Uuid::new_v4(),
            code: CampaignCode::generate(),
            title: "School fees".to_string(),
            description: "Term one".to_string(),
            target_amount: Amount::new(target),
            current_amount: Amount::new(current),
            organizer_name: "Okello".to_string(),
            organizer_contact: "0700000001".to_string(),
            location: "Gulu".to_string(),
            category: "Education".to_string(),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn generated_codes_have_two_letters_and_four_digits() {
        for _ in 0..200 {
            let code = CampaignCode::generate();
            let s = code.as_str();
            assert_eq!(s.len(), 6, "{s}");
            assert!(s[..2].chars().all(|c| c.is_ascii_uppercase()), "{s}");
            assert!(s[2..].chars().all(|c| c.is_ascii_digit()), "{s}");
        }
    }

    #[test]
    fn parse_code_normalizes_and_validates() {
        assert_eq!(CampaignCode::parse(" ab1234 ").unwrap().as_str(), "AB1234");
        assert!(CampaignCode::parse("AB").is_err());
        assert!(CampaignCode::parse("AB-1234").is_err());
        assert!(CampaignCode::parse("ABCDEFGHIJKLMNOPQ").is_err());
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(campaign(100_000, 0).progress_percent(), 0);
        assert_eq!(campaign(100_000, 25_000).progress_percent(), 25);
        assert_eq!(campaign(100_000, 250_000).progress_percent(), 100);
        assert_eq!(campaign(100_000, 99_999).progress_percent(), 99);
    }
}
