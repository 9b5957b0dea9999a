use crate::entities::{genre, prelude::*};
use crate::models::anime::GenreRef;
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get-or-create keyed on the genre's external id.
    ///
    /// Rows created here are never updated or deleted by the sync path, so
    /// repeated calls for the same id always resolve to the same row. Must
    /// run before any anime row referencing the id is written.
    pub async fn ensure(&self, genre_ref: &GenreRef) -> Result<genre::Model> {
        if let Some(existing) = Genre::find()
            .filter(genre::Column::ExternalId.eq(&genre_ref.external_id))
            .one(&self.conn)
            .await?
        {
            return Ok(existing);
        }

        let active = genre::ActiveModel {
            external_id: Set(genre_ref.external_id.clone()),
            name: Set(genre_ref.name.clone()),
            russian: Set(genre_ref.russian.clone()),
            ..Default::default()
        };

        let model = Genre::insert(active)
            .exec_with_returning(&self.conn)
            .await?;
        Ok(model)
    }

    pub async fn list(&self) -> Result<Vec<genre::Model>> {
        Ok(Genre::find()
            .order_by_asc(genre::Column::Name)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_by_external_id(&self, external_id: &str) -> Result<Option<genre::Model>> {
        Ok(Genre::find()
            .filter(genre::Column::ExternalId.eq(external_id))
            .one(&self.conn)
            .await?)
    }
}
