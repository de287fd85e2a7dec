//! Initial schema:
//!
//! - `campaigns`: fundraising campaigns with their denormalized running total
//! - `contributions`: immutable pledges, each referencing one campaign

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Campaigns {
    Table,
    Id,
    Code,
    Title,
    Description,
    TargetAmount,
    CurrentAmount,
    OrganizerName,
    OrganizerContact,
    Location,
    Category,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Contributions {
    Table,
    Id,
    CampaignId,
    Amount,
    Name,
    Email,
    PhoneNumber,
    Message,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Campaigns::Title).string().not_null())
                    .col(ColumnDef::new(Campaigns::Description).text().not_null())
                    .col(
                        ColumnDef::new(Campaigns::TargetAmount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Campaigns::TargetAmount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Campaigns::CurrentAmount)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Campaigns::CurrentAmount).gte(0)),
                    )
                    .col(ColumnDef::new(Campaigns::OrganizerName).string().not_null())
                    .col(
                        ColumnDef::new(Campaigns::OrganizerContact)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Campaigns::Location).string().not_null())
                    .col(ColumnDef::new(Campaigns::Category).string().not_null())
                    .col(ColumnDef::new(Campaigns::ImageUrl).text())
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-campaigns-created_at")
                    .table(Campaigns::Table)
                    .col(Campaigns::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contributions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contributions::CampaignId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contributions::Amount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Contributions::Amount).gt(0)),
                    )
                    .col(ColumnDef::new(Contributions::Name).string().not_null())
                    .col(ColumnDef::new(Contributions::Email).string().not_null())
                    .col(
                        ColumnDef::new(Contributions::PhoneNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contributions::Message).text())
                    .col(
                        ColumnDef::new(Contributions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contributions-campaign_id")
                            .from(Contributions::Table, Contributions::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-contributions-campaign_id-created_at")
                    .table(Contributions::Table)
                    .col(Contributions::CampaignId)
                    .col(Contributions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await?;
        Ok(())
    }
}
