//! Request and response bodies of the PledgeWise HTTP API.
//!
//! Field names are camelCase on the wire. Amounts are whole Ugandan shillings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An amount as sent by a client: a JSON number or a numeric string.
///
/// The server decides whether the value is acceptable; this type only
/// preserves what was sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Whole(i64),
    Decimal(f64),
    Text(String),
}

impl From<i64> for AmountValue {
    fn from(value: i64) -> Self {
        Self::Whole(value)
    }
}

pub mod campaign {
    use super::*;
    use crate::contribution::ContributionView;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignNew {
        pub title: String,
        pub description: String,
        pub target_amount: AmountValue,
        pub organizer_name: String,
        pub organizer_contact: String,
        pub location: String,
        pub category: String,
        #[serde(default)]
        pub code: Option<String>,
        #[serde(default, alias = "image")]
        pub image_url: Option<String>,
    }

    /// Partial update. Absent fields are left unchanged; `imageUrl: null`
    /// clears the image.
    ///
    /// `currentAmount` and `code` are not accepted here.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub target_amount: Option<AmountValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub organizer_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub organizer_contact: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub location: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(
            default,
            alias = "image",
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        pub image_url: Option<Option<String>>,
    }

    /// Distinguishes an explicit `null` from an absent field.
    fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignView {
        pub id: Uuid,
        pub code: String,
        pub title: String,
        pub description: String,
        pub target_amount: i64,
        pub current_amount: i64,
        /// Share of the target raised so far, 0-100.
        pub progress: u8,
        pub organizer_name: String,
        pub organizer_contact: String,
        pub location: String,
        pub category: String,
        pub image_url: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        /// Present on list and detail views, newest first.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub contributions: Option<Vec<ContributionView>>,
    }
}

pub mod contribution {
    use super::*;
    use crate::campaign::CampaignView;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributionNew {
        pub amount: AmountValue,
        pub name: String,
        pub email: String,
        pub phone_number: String,
        #[serde(default)]
        pub message: Option<String>,
        /// Overridden by the `Idempotency-Key` header when both are sent.
        #[serde(default)]
        pub idempotency_key: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributionView {
        pub id: Uuid,
        pub campaign_id: Uuid,
        pub amount: i64,
        pub name: String,
        pub email: String,
        pub phone_number: String,
        pub message: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Title and code of the campaign a contribution belongs to.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignSummary {
        pub title: String,
        pub code: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributionWithCampaign {
        #[serde(flatten)]
        pub contribution: ContributionView,
        pub campaign: CampaignSummary,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributeResponse {
        pub contribution: ContributionView,
        pub campaign: CampaignView,
        /// `true` when the idempotency key matched an earlier contribution.
        pub replayed: bool,
    }
}
