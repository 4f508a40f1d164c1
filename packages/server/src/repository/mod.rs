use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::entity::brand;

/// Column values written by `create` and `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandFields {
    pub name: String,
    pub image_path: Option<String>,
}

/// Persistence seam for brand records.
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// All brands, ordered by id.
    async fn find_all(&self) -> Result<Vec<brand::Model>, DbErr>;

    async fn find_by_id(&self, id: i32) -> Result<Option<brand::Model>, DbErr>;

    async fn count(&self) -> Result<u64, DbErr>;

    async fn create(&self, fields: BrandFields) -> Result<brand::Model, DbErr>;

    /// Overwrite `name` and `image_path` of an existing brand.
    async fn update(&self, id: i32, fields: BrandFields) -> Result<brand::Model, DbErr>;

    /// Delete a brand. Returns `false` if no row was removed.
    async fn delete(&self, id: i32) -> Result<bool, DbErr>;
}

/// [`BrandRepository`] backed by a sea-orm connection.
pub struct SeaOrmBrandRepository {
    db: DatabaseConnection,
}

impl SeaOrmBrandRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BrandRepository for SeaOrmBrandRepository {
    async fn find_all(&self) -> Result<Vec<brand::Model>, DbErr> {
        brand::Entity::find()
            .order_by_asc(brand::Column::Id)
            .all(&self.db)
            .await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<brand::Model>, DbErr> {
        brand::Entity::find_by_id(id).one(&self.db).await
    }

    async fn count(&self) -> Result<u64, DbErr> {
        brand::Entity::find().count(&self.db).await
    }

    async fn create(&self, fields: BrandFields) -> Result<brand::Model, DbErr> {
        let now = Utc::now();
        let new_brand = brand::ActiveModel {
            name: Set(fields.name),
            image_path: Set(fields.image_path),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_brand.insert(&self.db).await
    }

    async fn update(&self, id: i32, fields: BrandFields) -> Result<brand::Model, DbErr> {
        let changes = brand::ActiveModel {
            id: Set(id),
            name: Set(fields.name),
            image_path: Set(fields.image_path),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        changes.update(&self.db).await
    }

    async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = brand::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
