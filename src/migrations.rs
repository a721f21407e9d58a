//! Schema migrations, run at startup and by the test harness.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateUsersTable),
            Box::new(CreateCustomersTable),
            Box::new(CreateCarsTable),
            Box::new(CreateServicesTable),
        ]
    }
}

fn timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
}

pub struct CreateUsersTable;

impl MigrationName for CreateUsersTable {
    fn name(&self) -> &'static str {
        "m20250301_000001_create_users_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUsersTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
            .col(
                ColumnDef::new(Users::Username)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Users::PasswordHash).string().not_null())
            .col(
                ColumnDef::new(Users::Role)
                    .string()
                    .not_null()
                    .default("admin"),
            )
            .col(
                ColumnDef::new(Users::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();
        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

pub struct CreateCustomersTable;

impl MigrationName for CreateCustomersTable {
    fn name(&self) -> &'static str {
        "m20250301_000002_create_customers_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCustomersTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Customers::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Customers::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Customers::Name).string().not_null())
            .col(
                ColumnDef::new(Customers::Email)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Customers::Phone).string().null())
            .col(ColumnDef::new(Customers::Address).string().null())
            .col(ColumnDef::new(Customers::Type).string_len(16).not_null());
        timestamps(&mut table);
        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

pub struct CreateCarsTable;

impl MigrationName for CreateCarsTable {
    fn name(&self) -> &'static str {
        "m20250301_000003_create_cars_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCarsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Cars::Table)
            .if_not_exists()
            .col(ColumnDef::new(Cars::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Cars::CustomerId).uuid().not_null())
            .col(ColumnDef::new(Cars::Make).string().not_null())
            .col(ColumnDef::new(Cars::Model).string().not_null())
            .col(ColumnDef::new(Cars::Year).integer().not_null())
            .col(ColumnDef::new(Cars::FuelType).string().not_null())
            .col(
                ColumnDef::new(Cars::RegistrationNumber)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_cars_customer_id")
                    .from(Cars::Table, Cars::CustomerId)
                    .to(Customers::Table, Customers::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        timestamps(&mut table);
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_customer_id")
                    .table(Cars::Table)
                    .col(Cars::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

pub struct CreateServicesTable;

impl MigrationName for CreateServicesTable {
    fn name(&self) -> &'static str {
        "m20250301_000004_create_services_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateServicesTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Services::Table)
            .if_not_exists()
            .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Services::CarId).uuid().not_null())
            .col(ColumnDef::new(Services::ServiceType).string().not_null())
            .col(ColumnDef::new(Services::ServiceDate).date().not_null())
            .col(
                ColumnDef::new(Services::Cost)
                    .decimal_len(10, 2)
                    .not_null(),
            )
            .col(ColumnDef::new(Services::Notes).text().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_services_car_id")
                    .from(Services::Table, Services::CarId)
                    .to(Cars::Table, Cars::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        timestamps(&mut table);
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_car_id")
                    .table(Services::Table)
                    .col(Services::CarId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Address,
    Type,
}

#[derive(DeriveIden)]
enum Cars {
    Table,
    Id,
    CustomerId,
    Make,
    Model,
    Year,
    FuelType,
    RegistrationNumber,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    CarId,
    ServiceType,
    ServiceDate,
    Cost,
    Notes,
}
