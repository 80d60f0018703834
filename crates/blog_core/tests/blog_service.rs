use blog_core::db::open_db_in_memory;
use blog_core::{
    BlogService, BlogServiceError, NewPost, SqliteBlogRepository, COMMENT_AUTHOR_MAX_CHARS,
    POST_AUTHOR_MAX_CHARS,
};
use chrono::DateTime;

fn service() -> BlogService<SqliteBlogRepository> {
    let conn = open_db_in_memory().unwrap();
    BlogService::new(SqliteBlogRepository::try_new(conn).unwrap())
}

fn draft(title: &str, author: &str) -> NewPost {
    let publish_date = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
    NewPost::new(title, "d", publish_date, author)
}

#[test]
fn create_post_then_get_returns_equal_record() {
    let service = service();

    let created = service.create_post(draft("A", "bob")).unwrap();
    let loaded = service.get_post(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(created.title, "A");
    assert_eq!(created.author, "bob");
}

#[test]
fn get_missing_post_is_none_not_error() {
    let service = service();
    assert!(service.get_post(404).unwrap().is_none());
    assert!(service.get_comment(404).unwrap().is_none());
    assert!(service.list_comments(404).unwrap().is_empty());
}

#[test]
fn create_post_rejects_long_author() {
    let service = service();
    let author = "a".repeat(POST_AUTHOR_MAX_CHARS + 1);

    let err = service.create_post(draft("A", &author)).unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(ref v) if v.field == "author"));
    assert!(service.list_posts().unwrap().is_empty());
}

#[test]
fn create_comment_on_missing_post_fails_and_writes_nothing() {
    let service = service();

    let err = service.create_comment("hi", "alice", 1).unwrap_err();
    assert!(matches!(err, BlogServiceError::PostNotFound(1)));

    let post = service.create_post(draft("A", "bob")).unwrap();
    assert!(service.list_comments(post.id).unwrap().is_empty());
}

#[test]
fn create_comment_rejects_long_author() {
    let service = service();
    let post = service.create_post(draft("A", "bob")).unwrap();
    let author = "a".repeat(COMMENT_AUTHOR_MAX_CHARS + 1);

    let err = service.create_comment("hi", author, post.id).unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(_)));
}

#[test]
fn update_missing_post_fails_and_leaves_storage_unchanged() {
    let service = service();
    let existing = service.create_post(draft("A", "bob")).unwrap();

    let err = service
        .update_post(existing.id + 1, draft("B", "carol"))
        .unwrap_err();
    assert!(matches!(err, BlogServiceError::PostNotFound(id) if id == existing.id + 1));
    assert_eq!(service.list_posts().unwrap(), vec![existing]);
}

#[test]
fn update_post_returns_stored_record() {
    let service = service();
    let created = service.create_post(draft("A", "bob")).unwrap();

    let updated = service
        .update_post(created.id, draft("A, revised", "carol"))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "A, revised");
    assert_eq!(service.get_post(created.id).unwrap().unwrap(), updated);
}

#[test]
fn delete_post_cascades_and_reports_missing_as_false() {
    let service = service();
    let post = service.create_post(draft("A", "bob")).unwrap();
    let comment = service.create_comment("hi", "alice", post.id).unwrap();

    assert!(service.delete_post(post.id).unwrap());
    assert!(service.get_post(post.id).unwrap().is_none());
    assert!(service.get_comment(comment.id).unwrap().is_none());

    assert!(!service.delete_post(post.id).unwrap());
    assert!(!service.delete_comment(comment.id).unwrap());
}

#[test]
fn create_post_with_comment_stores_both_records() {
    let service = service();

    let post = service
        .create_post_with_comment(draft("A", "bob"), "first!")
        .unwrap();

    let comments = service.list_comments(post.id).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "bob");
    assert_eq!(comments[0].text, "first!");
}

#[test]
fn create_post_with_comment_rejects_invalid_post_without_writing() {
    let service = service();
    let author = "a".repeat(POST_AUTHOR_MAX_CHARS + 1);

    let err = service
        .create_post_with_comment(draft("A", &author), "first!")
        .unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(_)));
    assert!(service.list_posts().unwrap().is_empty());
}

#[test]
fn scenario_create_comment_delete() {
    let service = service();

    let post = service.create_post(draft("A", "bob")).unwrap();
    assert_eq!(post.id, 1);

    let comment = service.create_comment("hi", "alice", 1).unwrap();
    assert_eq!(comment.post_id, 1);

    assert!(service.delete_post(1).unwrap());
    assert!(service.get_post(1).unwrap().is_none());
}
