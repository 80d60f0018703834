use async_graphql::{Request, Variables};
use blog_core::db::open_db_in_memory;
use blog_core::{BlogService, SqliteBlogRepository};
use blog_graphql::{build_schema, BlogSchema};
use serde_json::{json, Value};

fn schema() -> BlogSchema {
    let repo = SqliteBlogRepository::try_new(open_db_in_memory().unwrap()).unwrap();
    build_schema(BlogService::new(repo))
}

async fn run(schema: &BlogSchema, document: &str) -> Value {
    let response = schema.execute(document).await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

async fn run_with(schema: &BlogSchema, document: &str, variables: Value) -> Value {
    let request = Request::new(document).variables(Variables::from_json(variables));
    let response = schema.execute(request).await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

const CREATE_POST: &str = r#"
mutation {
  createPost(title: "A", description: "d", publishDate: "2024-01-01T00:00:00Z", author: "bob") {
    post { id title description publishDate author }
    error { code message field }
  }
}"#;

#[tokio::test]
async fn scenario_create_comment_delete_then_read_null() {
    let schema = schema();

    let created = run(&schema, CREATE_POST).await;
    assert_eq!(created["createPost"]["error"], Value::Null);
    let post = &created["createPost"]["post"];
    assert_eq!(post["id"], 1);
    assert_eq!(post["title"], "A");
    assert_eq!(post["author"], "bob");
    assert!(post["publishDate"]
        .as_str()
        .unwrap()
        .starts_with("2024-01-01T00:00:00"));

    let comment = run(
        &schema,
        r#"mutation { createComment(text: "hi", author: "alice", postId: 1) {
             comment { id text author postId }
             error { code }
           } }"#,
    )
    .await;
    assert_eq!(comment["createComment"]["comment"]["postId"], 1);
    assert_eq!(comment["createComment"]["comment"]["author"], "alice");

    let deleted = run(
        &schema,
        "mutation { deletePost(id: 1) { success error { code } } }",
    )
    .await;
    assert_eq!(deleted["deletePost"], json!({ "success": true, "error": null }));

    let read = run(&schema, "{ post(id: 1) { id } }").await;
    assert_eq!(read["post"], Value::Null);
}

#[tokio::test]
async fn create_comment_on_missing_post_returns_post_not_found() {
    let schema = schema();

    let data = run(
        &schema,
        r#"mutation { createComment(text: "hi", author: "alice", postId: 42) {
             comment { id }
             error { code field }
           } }"#,
    )
    .await;

    assert_eq!(data["createComment"]["comment"], Value::Null);
    assert_eq!(data["createComment"]["error"]["code"], "POST_NOT_FOUND");
    assert_eq!(data["createComment"]["error"]["field"], Value::Null);
}

#[tokio::test]
async fn update_missing_post_returns_post_not_found_and_changes_nothing() {
    let schema = schema();
    run(&schema, CREATE_POST).await;

    let data = run(
        &schema,
        r#"mutation { updatePost(id: 2, title: "B", description: "e",
                                  publishDate: "2024-02-01T00:00:00Z", author: "carol") {
             post { id }
             error { code }
           } }"#,
    )
    .await;
    assert_eq!(data["updatePost"]["post"], Value::Null);
    assert_eq!(data["updatePost"]["error"]["code"], "POST_NOT_FOUND");

    let posts = run(&schema, "{ posts { id title author } }").await;
    assert_eq!(
        posts["posts"],
        json!([{ "id": 1, "title": "A", "author": "bob" }])
    );
}

#[tokio::test]
async fn update_post_overwrites_fields() {
    let schema = schema();
    run(&schema, CREATE_POST).await;

    let data = run_with(
        &schema,
        r#"mutation Update($id: Int!, $date: DateTime!) {
             updatePost(id: $id, title: "B", description: "e", publishDate: $date, author: "carol") {
               post { id title description author publishDate }
               error { code }
             }
           }"#,
        json!({ "id": 1, "date": "2024-02-01T08:00:00+02:00" }),
    )
    .await;

    let post = &data["updatePost"]["post"];
    assert_eq!(post["id"], 1);
    assert_eq!(post["title"], "B");
    assert_eq!(post["description"], "e");
    assert_eq!(post["author"], "carol");
    assert!(post["publishDate"].as_str().unwrap().ends_with("+02:00"));
}

#[tokio::test]
async fn deletes_of_missing_records_report_false_without_error() {
    let schema = schema();

    let data = run(
        &schema,
        "mutation {
           deletePost(id: 5) { success error { code } }
           deleteComment(id: 5) { success error { code } }
         }",
    )
    .await;

    assert_eq!(data["deletePost"], json!({ "success": false, "error": null }));
    assert_eq!(data["deleteComment"], json!({ "success": false, "error": null }));
}

#[tokio::test]
async fn long_title_returns_validation_error() {
    let schema = schema();
    let title = "t".repeat(101);

    let data = run_with(
        &schema,
        r#"mutation Create($title: String!) {
             createPost(title: $title, description: "d", publishDate: "2024-01-01T00:00:00Z", author: "bob") {
               post { id }
               error { code field message }
             }
           }"#,
        json!({ "title": title }),
    )
    .await;

    assert_eq!(data["createPost"]["post"], Value::Null);
    assert_eq!(data["createPost"]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(data["createPost"]["error"]["field"], "title");

    let posts = run(&schema, "{ posts { id } }").await;
    assert_eq!(posts["posts"], json!([]));
}

#[tokio::test]
async fn create_post_with_comment_exposes_first_comment() {
    let schema = schema();

    let data = run(
        &schema,
        r#"mutation {
             createPostWithComment(title: "A", description: "d",
                                   publishDate: "2024-01-01T00:00:00Z",
                                   author: "bob", commentText: "first!") {
               post { id comments { text author postId } }
               error { code }
             }
           }"#,
    )
    .await;

    let post = &data["createPostWithComment"]["post"];
    assert_eq!(
        post["comments"],
        json!([{ "text": "first!", "author": "bob", "postId": post["id"] }])
    );
}

#[tokio::test]
async fn create_post_with_comment_is_all_or_nothing_on_validation() {
    let schema = schema();
    let author = "a".repeat(51);

    let data = run_with(
        &schema,
        r#"mutation Create($author: String!) {
             createPostWithComment(title: "A", description: "d",
                                   publishDate: "2024-01-01T00:00:00Z",
                                   author: $author, commentText: "first!") {
               post { id }
               error { code field }
             }
           }"#,
        json!({ "author": author }),
    )
    .await;

    assert_eq!(data["createPostWithComment"]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(data["createPostWithComment"]["error"]["field"], "author");
    let posts = run(&schema, "{ posts { id } }").await;
    assert_eq!(posts["posts"], json!([]));
}

#[tokio::test]
async fn comment_resolves_parent_post_and_deletes_individually() {
    let schema = schema();
    run(&schema, CREATE_POST).await;
    run(
        &schema,
        r#"mutation { createComment(text: "hi", author: "alice", postId: 1) { comment { id } } }"#,
    )
    .await;

    let data = run(&schema, "{ comment(id: 1) { text post { id title } } }").await;
    assert_eq!(
        data["comment"],
        json!({ "text": "hi", "post": { "id": 1, "title": "A" } })
    );

    let deleted = run(&schema, "mutation { deleteComment(id: 1) { success } }").await;
    assert_eq!(deleted["deleteComment"]["success"], true);

    let data = run(&schema, "{ post(id: 1) { id comments { id } } comment(id: 1) { id } }").await;
    assert_eq!(data["post"], json!({ "id": 1, "comments": [] }));
    assert_eq!(data["comment"], Value::Null);
}

#[tokio::test]
async fn posts_are_listed_in_id_order() {
    let schema = schema();
    for title in ["first", "second", "third"] {
        run_with(
            &schema,
            r#"mutation Create($title: String!) {
                 createPost(title: $title, description: "d", publishDate: "2024-01-01T00:00:00Z", author: "bob") {
                   post { id }
                 }
               }"#,
            json!({ "title": title }),
        )
        .await;
    }

    let data = run(&schema, "{ posts { id title } }").await;
    assert_eq!(
        data["posts"],
        json!([
            { "id": 1, "title": "first" },
            { "id": 2, "title": "second" },
            { "id": 3, "title": "third" }
        ])
    );
}

#[tokio::test]
async fn malformed_publish_date_is_rejected_by_the_engine() {
    let schema = schema();

    let response = schema
        .execute(
            r#"mutation { createPost(title: "A", description: "d", publishDate: "yesterday", author: "bob") { post { id } } }"#,
        )
        .await;

    assert!(!response.errors.is_empty());
    let posts = run(&schema, "{ posts { id } }").await;
    assert_eq!(posts["posts"], json!([]));
}
