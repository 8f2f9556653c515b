use sea_orm_migration::prelude::*;

const PHONE_INDEX: &str = "idx_orders_phone_number";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                    .col(ColumnDef::new(Orders::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Orders::Items).json_binary().not_null())
                    .col(ColumnDef::new(Orders::TotalAmount).double().not_null())
                    .col(ColumnDef::new(Orders::Notes).text().null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Customers look their orders up by phone number
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(PHONE_INDEX)
                    .table(Orders::Table)
                    .col(Orders::PhoneNumber)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(PHONE_INDEX).table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    CustomerName,
    PhoneNumber,
    Items,
    TotalAmount,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_table_sql() {
        let sql = Index::create()
            .name(PHONE_INDEX)
            .table(Orders::Table)
            .col(Orders::PhoneNumber)
            .to_string(PostgresQueryBuilder);

        assert_eq!(
            sql,
            r#"CREATE INDEX "idx_orders_phone_number" ON "orders" ("phone_number")"#
        );
    }

    #[test]
    fn test_migration_name() {
        assert_eq!(Migration.name(), "m20240101_000001_create_orders");
    }
}
