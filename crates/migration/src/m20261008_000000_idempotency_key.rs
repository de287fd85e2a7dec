use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Contributions {
    Table,
    CampaignId,
    IdempotencyKey,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Contributions::Table)
                    .add_column(ColumnDef::new(Contributions::IdempotencyKey).string())
                    .to_owned(),
            )
            .await?;

        // NULL keys never collide, so contributions without a key are unaffected.
        manager
            .create_index(
                Index::create()
                    .name("uidx-contributions-campaign_id-idempotency_key")
                    .table(Contributions::Table)
                    .col(Contributions::CampaignId)
                    .col(Contributions::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uidx-contributions-campaign_id-idempotency_key")
                    .table(Contributions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Contributions::Table)
                    .drop_column(Contributions::IdempotencyKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
