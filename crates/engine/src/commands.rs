//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update campaign,
//! contribute), keeping call sites readable and avoiding long argument lists.
//! Values are untrusted: the engine validates and normalizes them.

use crate::{Amount, ResultEngine};

/// An amount as it arrived from a client, before coercion.
///
/// Clients send numbers, floats with a zero fraction or numeric strings.
#[derive(Clone, Debug, PartialEq)]
pub enum AmountInput {
    Whole(i64),
    Decimal(f64),
    Text(String),
}

impl AmountInput {
    /// Coerces the input to a strictly positive [`Amount`].
    pub fn resolve(&self, label: &str) -> ResultEngine<Amount> {
        let amount = match self {
            Self::Whole(value) => Amount::new(*value),
            Self::Decimal(value) => Amount::from_f64(*value)?,
            Self::Text(value) => value.parse::<Amount>()?,
        };
        Amount::positive(amount.shillings(), label)
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        Self::Whole(value)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Create a campaign.
///
/// `current_amount` is not part of the command: new campaigns always start
/// at zero.
#[derive(Clone, Debug)]
pub struct CreateCampaignCmd {
    pub title: String,
    pub description: String,
    pub target_amount: AmountInput,
    pub organizer_name: String,
    pub organizer_contact: String,
    pub location: String,
    pub category: String,
    pub code: Option<String>,
    pub image_url: Option<String>,
}

impl CreateCampaignCmd {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        target_amount: impl Into<AmountInput>,
        organizer_name: impl Into<String>,
        organizer_contact: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            target_amount: target_amount.into(),
            organizer_name: organizer_name.into(),
            organizer_contact: organizer_contact.into(),
            location: String::new(),
            category: String::new(),
            code: None,
            image_url: None,
        }
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Partial metadata update of a campaign.
///
/// There is deliberately no way to set `current_amount` or `code` here.
#[derive(Clone, Debug, Default)]
pub struct UpdateCampaignCmd {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<AmountInput>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    /// `Some(None)` clears the image, `None` leaves it as is.
    pub image_url: Option<Option<String>>,
}

impl UpdateCampaignCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn target_amount(mut self, target_amount: impl Into<AmountInput>) -> Self {
        self.target_amount = Some(target_amount.into());
        self
    }

    #[must_use]
    pub fn organizer_name(mut self, organizer_name: impl Into<String>) -> Self {
        self.organizer_name = Some(organizer_name.into());
        self
    }

    #[must_use]
    pub fn organizer_contact(mut self, organizer_contact: impl Into<String>) -> Self {
        self.organizer_contact = Some(organizer_contact.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = Some(image_url);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.target_amount.is_none()
            && self.organizer_name.is_none()
            && self.organizer_contact.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
    }
}

/// Contribute to a campaign.
#[derive(Clone, Debug)]
pub struct ContributeCmd {
    pub campaign_id: String,
    pub amount: AmountInput,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
    pub idempotency_key: Option<String>,
}

impl ContributeCmd {
    #[must_use]
    pub fn new(
        campaign_id: impl Into<String>,
        amount: impl Into<AmountInput>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            amount: amount.into(),
            name: name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            message: None,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
