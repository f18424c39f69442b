//! Schema bootstrap for fresh databases.

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, DbConn, DbErr, EntityTrait, Schema};

use super::entity::{comment, follow, group, post, user};

/// Name of the unique index over `(follows.user_id, follows.author_id)`.
pub const UNIQUE_MEMBERS: &str = "unique_members";

async fn create_table<E: EntityTrait>(db: &DbConn, schema: &Schema, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Create every table that does not exist yet, parents first.
pub async fn create_schema(db: &DbConn) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    create_table(db, &schema, user::Entity).await?;
    create_table(db, &schema, group::Entity).await?;
    create_table(db, &schema, post::Entity).await?;
    create_table(db, &schema, comment::Entity).await?;
    create_table(db, &schema, follow::Entity).await?;

    let unique_members = Index::create()
        .name(UNIQUE_MEMBERS)
        .table(follow::Entity)
        .col(follow::Column::UserId)
        .col(follow::Column::AuthorId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&unique_members)).await?;

    tracing::info!("Database schema ready");
    Ok(())
}
