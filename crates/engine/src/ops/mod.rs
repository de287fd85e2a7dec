use sea_orm::DatabaseConnection;

mod audit;
mod campaigns;
mod contributions;
mod ledger;

pub use audit::LedgerDrift;
pub use contributions::CampaignRef;
pub use ledger::ContributionReceipt;

/// Run a block as one unit of work: begin a DB transaction, commit if the
/// block returns `Ok`, roll back if it returns `Err`.
///
/// The block is evaluated inside an `async` block, so `?` leaves the unit of
/// work (and triggers the rollback) instead of the calling function.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result = async {
            let out: $crate::ResultEngine<_> = $body;
            out
        }
        .await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    tracing::error!("rollback failed after {err}: {rollback_err}");
                }
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

/// Entry point for every campaign and contribution operation.
///
/// `Engine` holds no mutable state of its own: it is `Send + Sync` and is
/// shared between request handlers behind an `Arc`.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
