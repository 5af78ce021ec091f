use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration001CreatePokemons)]
    }
}

pub struct Migration001CreatePokemons;

impl MigrationName for Migration001CreatePokemons {
    fn name(&self) -> &str {
        "m001_create_pokemons"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration001CreatePokemons {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pokemons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pokemons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pokemons::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Pokemons::Degree).string_len(64).not_null())
                    .col(ColumnDef::new(Pokemons::Type).string_len(64).not_null())
                    .col(ColumnDef::new(Pokemons::Photo).text().not_null())
                    .col(ColumnDef::new(Pokemons::Description).text().not_null())
                    .col(ColumnDef::new(Pokemons::Height).double().not_null())
                    .col(ColumnDef::new(Pokemons::Weight).double().not_null())
                    .col(
                        ColumnDef::new(Pokemons::MaleGenderRatio)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pokemons::FemaleGenderRatio)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pokemons::Abilities)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pokemons::EggGroups)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pokemons::EvolutionDescription)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pokemons::EvolutionPhoto)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pokemons::Table).to_owned())
            .await?;
        Ok(())
    }
}

// ========== Table identifiers ==========

#[derive(Iden)]
enum Pokemons {
    Table,
    Id,
    Name,
    Degree,
    Type,
    Photo,
    Description,
    Height,
    Weight,
    MaleGenderRatio,
    FemaleGenderRatio,
    Abilities,
    EggGroups,
    EvolutionDescription,
    EvolutionPhoto,
}
