//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API.

use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID read from storage. A malformed stored id is a storage fault,
/// not something the caller can fix.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| {
        EngineError::Storage(DbErr::Custom(format!("invalid {label} id in storage: {value}")))
    })
}

/// Parse a campaign id received from a client. Anything that is not a UUID
/// cannot name a stored campaign.
pub(crate) fn parse_campaign_id(value: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| EngineError::NotFound(format!("campaign {}", value.trim())))
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_id_must_be_a_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_campaign_id(&format!(" {id} ")).unwrap(), id);
        assert_eq!(
            parse_campaign_id("nope").unwrap_err(),
            EngineError::NotFound("campaign nope".to_string())
        );
    }

    #[test]
    fn stored_ids_fail_as_storage_errors() {
        assert!(matches!(
            parse_uuid("garbage", "campaign"),
            Err(EngineError::Storage(_))
        ));
    }
}
