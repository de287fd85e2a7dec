//! Domain engine for PledgeWise.
//!
//! The engine owns campaigns and contributions on top of a `sea-orm`
//! connection. Every write goes through a database transaction; the campaign
//! total (`current_amount`) is only changed by the ledger together with the
//! contribution that caused it.

pub use campaigns::{Campaign, CampaignCode};
pub use commands::{AmountInput, ContributeCmd, CreateCampaignCmd, UpdateCampaignCmd};
pub use contributions::Contribution;
pub use error::EngineError;
pub use money::Amount;
pub use ops::{CampaignRef, ContributionReceipt, Engine, EngineBuilder, LedgerDrift};

mod campaigns;
mod commands;
mod contributions;
mod error;
mod money;
mod ops;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
