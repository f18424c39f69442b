use std::collections::BTreeMap;

use sea_orm::{
    DatabaseBackend, DbErr, MockDatabase, MockExecResult, QueryTrait, RuntimeErr, Value,
};
use uuid::Uuid;

use yatube_core::domain::{Follow, Post};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, FollowRepository, PostFilter, PostRepository};

use super::entity::{follow, post};
use super::postgres_base::map_db_err;
use super::postgres_repo::filtered_posts;
use super::{PostgresFollowRepository, PostgresPostRepository};

fn post_model(id: i32, author_id: Uuid) -> post::Model {
    post::Model {
        id,
        text: format!("Post {}", id),
        pub_date: chrono::Utc::now().into(),
        author_id,
        group_id: Some(3),
        image: None,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(7, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post: Option<Post> = repo.find_by_id(7).await.unwrap();

    let post = post.unwrap();
    assert_eq!(post.id, 7);
    assert_eq!(post.text, "Post 7");
    assert_eq!(post.author_id, author_id);
    assert_eq!(post.group_id, Some(3));
}

#[tokio::test]
async fn test_insert_post_takes_generated_id() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(42, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved = BaseRepository::<Post, i32>::insert(
        &repo,
        Post::new(author_id, "Post 42".into(), Some(3), None),
    )
    .await
    .unwrap();

    assert_eq!(saved.id, 42);
}

#[tokio::test]
async fn test_list_posts_paginates() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(13)]])
        .append_query_results([vec![post_model(3, author_id), post_model(2, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let filter = PostFilter::Group(3);
    assert_eq!(repo.count(&filter).await.unwrap(), 13);

    let posts = repo.list(&filter, 10, 10).await.unwrap();
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), [3, 2]);
}

#[test]
fn test_feed_filter_uses_follow_subquery() {
    let user_id = Uuid::new_v4();
    let sql = filtered_posts(&PostFilter::FollowedBy(user_id))
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#"IN (SELECT "author_id" FROM "follows""#), "{}", sql);
    assert!(sql.contains(&user_id.to_string()), "{}", sql);
}

#[test]
fn test_search_filter_matches_text() {
    let sql = filtered_posts(&PostFilter::TextContains("cats".into()))
        .build(DatabaseBackend::Postgres)
        .to_string();
    assert!(sql.contains(r#""posts"."text" LIKE '%cats%'"#), "{}", sql);
}

#[tokio::test]
async fn test_follow_exists_and_delete_pair() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresFollowRepository::new(db);
    let (user, author) = (Uuid::new_v4(), Uuid::new_v4());
    assert!(repo.exists(user, author).await.unwrap());
    assert_eq!(repo.delete_pair(user, author).await.unwrap(), 1);
}

#[tokio::test]
async fn test_follow_insert_returns_row() {
    let (user_id, author_id) = (Uuid::new_v4(), Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![follow::Model {
            id: 5,
            user_id,
            author_id,
        }]])
        .into_connection();

    let repo = PostgresFollowRepository::new(db);
    let follow = FollowRepository::insert(&repo, Follow::new(user_id, author_id))
        .await
        .unwrap();
    assert_eq!(follow.id, 5);
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, i32>::delete(&repo, 99).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[test]
fn test_map_db_err() {
    assert!(matches!(map_db_err(DbErr::RecordNotUpdated), RepoError::NotFound));
    assert!(matches!(
        map_db_err(DbErr::Query(RuntimeErr::Internal("boom".into()))),
        RepoError::Query(_)
    ));
}
