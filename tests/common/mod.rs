#![allow(dead_code)]

use axum::Router;
use gridcrate::{
    EntityQuery, Grid, GridColumns, GridRequest, GridResponse, TableQuery, ValueType,
    columns_equal, grid_router,
};
use sea_orm::{ActiveValue::Set, Database, DatabaseConnection, DbErr, FromQueryResult};
use sea_orm_migration::prelude::*;
use serde::{Deserialize, Serialize};

pub mod category_entity;
pub mod item_entity;
pub mod tag_entity;

/// In-memory database with the items, categories and tags tables, seeded.
///
/// | id | name    | description | category    | tag  |
/// |----|---------|-------------|-------------|------|
/// | 1  | alpha   | first       | 1 (tools)   | new  |
/// | 2  | beta    | second      | 1 (tools)   |      |
/// | 3  | gamma   | third       | 2 (toys)    | sale |
/// | 4  | delta   | fourth      | none        | sale |
/// | 5  | epsilon | fifth       | 2 (toys)    |      |
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    seed(&db).await?;

    Ok(db)
}

/// Show grid debug events in failing test output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .compact()
        .try_init();
}

async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    use sea_orm::EntityTrait;

    let categories = [(1, "tools"), (2, "toys")].map(|(id, name)| category_entity::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
    });
    category_entity::Entity::insert_many(categories).exec(db).await?;

    let items = [
        (1, "alpha", "first", Some(1)),
        (2, "beta", "second", Some(1)),
        (3, "gamma", "third", Some(2)),
        (4, "delta", "fourth", None),
        (5, "epsilon", "fifth", Some(2)),
    ]
    .map(|(id, name, description, category_id)| item_entity::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        category_id: Set(category_id),
    });
    item_entity::Entity::insert_many(items).exec(db).await?;

    let tags = [(1, 1, "new"), (2, 3, "sale"), (3, 4, "sale")].map(|(id, item_id, name)| {
        tag_entity::ActiveModel {
            id: Set(id),
            item_id: Set(item_id),
            name: Set(name.to_string()),
        }
    });
    tag_entity::Entity::insert_many(tags).exec(db).await?;

    Ok(())
}

pub fn item_columns() -> GridColumns {
    GridColumns::builder()
        .column_typed("id", "id", ValueType::Integer)
        .column("name", "name")
        .filter("description", "description")
        .column_typed("categoryId", "category_id", ValueType::Integer)
        .search(["name", "description"])
        .build()
}

/// Items straight from the entity.
///
/// `extras.onlyCategorized = true` restricts the base query to items with a category.
pub struct ItemGrid {
    pub columns: GridColumns,
}

impl ItemGrid {
    pub fn new() -> Self {
        Self::with_columns(item_columns())
    }

    pub const fn with_columns(columns: GridColumns) -> Self {
        Self { columns }
    }
}

impl Grid for ItemGrid {
    type Query = EntityQuery<item_entity::Entity>;

    fn columns(&self) -> &GridColumns {
        &self.columns
    }

    fn query(&self, request: &GridRequest) -> Self::Query {
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let only_categorized = request
            .extras
            .as_ref()
            .and_then(|extras| extras.get("onlyCategorized"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        let select = item_entity::Entity::find();
        if only_categorized {
            EntityQuery::new(select.filter(item_entity::Column::CategoryId.is_not_null()))
        } else {
            EntityQuery::new(select)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct CatalogRow {
    pub id: i32,
    pub name: String,
    pub category_name: Option<String>,
    pub tag_name: Option<String>,
}

pub fn catalog_columns(join_aware: bool) -> GridColumns {
    GridColumns::builder()
        .column_typed("id", "i.id", ValueType::Integer)
        .column("itemName", "i.name")
        .column("categoryName", "c.name")
        .column("tagName", "t.name")
        .search(["itemName", "categoryName"])
        .join_aware(join_aware)
        .build()
}

/// Items left-joined to their category and their tag.
pub struct CatalogGrid {
    pub columns: GridColumns,
}

impl CatalogGrid {
    pub fn new(join_aware: bool) -> Self {
        Self {
            columns: catalog_columns(join_aware),
        }
    }
}

impl Grid for CatalogGrid {
    type Query = TableQuery<CatalogRow>;

    fn columns(&self) -> &GridColumns {
        &self.columns
    }

    fn query(&self, _request: &GridRequest) -> Self::Query {
        TableQuery::new("items", "i")
            .select("i.id", "id")
            .select("i.name", "name")
            .select("c.name", "category_name")
            .select("t.name", "tag_name")
            .left_join("categories", "c", columns_equal("c.id", "i.category_id"))
            .left_join("tags", "t", columns_equal("t.item_id", "i.id"))
    }
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    Router::new()
        .nest("/api/v1/items/grid", grid_router(ItemGrid::new(), db.clone()))
        .nest("/api/v1/catalog/grid", grid_router(CatalogGrid::new(true), db))
}

pub fn item_ids(response: &GridResponse<item_entity::Model>) -> Vec<i32> {
    response.items.iter().map(|item| item.id).collect()
}

pub fn request(value: serde_json::Value) -> GridRequest {
    serde_json::from_value(value).expect("valid grid request")
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateCategoryTable),
            Box::new(CreateItemTable),
            Box::new(CreateTagTable),
        ]
    }
}

pub struct CreateCategoryTable;

#[async_trait::async_trait]
impl MigrationName for CreateCategoryTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_category_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCategoryTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(CategoryEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(CategoryColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(CategoryColumn::Name).string().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CategoryEntity).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateItemTable;

#[async_trait::async_trait]
impl MigrationName for CreateItemTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_item_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateItemTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(ItemEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(ItemColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ItemColumn::Name).string().not_null())
            .col(ColumnDef::new(ItemColumn::Description).string().not_null())
            .col(ColumnDef::new(ItemColumn::CategoryId).integer().null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ItemEntity).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateTagTable;

#[async_trait::async_trait]
impl MigrationName for CreateTagTable {
    fn name(&self) -> &'static str {
        "m20240101_000003_create_tag_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTagTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(TagEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(TagColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(TagColumn::ItemId).integer().not_null())
            .col(ColumnDef::new(TagColumn::Name).string().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TagEntity).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum CategoryColumn {
    Id,
    Name,
}

impl Iden for CategoryColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct CategoryEntity;

impl Iden for CategoryEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "categories").unwrap();
    }
}

#[derive(Debug)]
pub enum ItemColumn {
    Id,
    Name,
    Description,
    CategoryId,
}

impl Iden for ItemColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Description => "description",
                Self::CategoryId => "category_id",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct ItemEntity;

impl Iden for ItemEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "items").unwrap();
    }
}

#[derive(Debug)]
pub enum TagColumn {
    Id,
    ItemId,
    Name,
}

impl Iden for TagColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::ItemId => "item_id",
                Self::Name => "name",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct TagEntity;

impl Iden for TagEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "tags").unwrap();
    }
}
