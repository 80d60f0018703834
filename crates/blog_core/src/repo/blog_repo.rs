//! Post/comment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `posts` and `comments` tables.
//! - Allocate identities (SQLite `AUTOINCREMENT`).
//! - Keep comment rows referentially consistent with their parent post.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - A comment is only inserted after its parent was found inside the same
//!   immediate transaction.
//! - Deleting a post removes its comments in the same transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::post::{NewPost, Post, PostId};
use crate::model::validation::ValidationError;
use chrono::DateTime;
use log::debug;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};

pub const POSTS_TABLE: &str = "posts";
pub const COMMENTS_TABLE: &str = "comments";

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    publish_date,
    author
FROM posts";

const COMMENT_SELECT_SQL: &str = "SELECT
    id,
    text,
    author,
    post_id
FROM comments";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for post/comment persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Draft rejected before any SQL ran.
    Validation(ValidationError),
    Db(DbError),
    /// A targeted row does not exist.
    NotFound { table: &'static str, id: i64 },
    /// Persisted row could not be mapped back to a domain record.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A thread panicked while holding the connection.
    ConnectionPoisoned,
}

impl RepoError {
    /// Returns whether this error belongs to the underlying storage rather
    /// than to the caller's input.
    pub fn is_storage_failure(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { table, id } => write!(f, "{table} row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::ConnectionPoisoned => write!(f, "database connection lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for posts and comments.
pub trait BlogRepository {
    /// Inserts one post and returns its new identity.
    fn insert_post(&self, post: &NewPost) -> RepoResult<PostId>;
    /// Inserts a post and its first comment (authored by the post author)
    /// atomically.
    fn insert_post_with_comment(
        &self,
        post: &NewPost,
        comment_text: &str,
    ) -> RepoResult<(PostId, CommentId)>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Lists all posts ordered by id.
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
    /// Overwrites all mutable fields of an existing post.
    fn update_post(&self, post: &Post) -> RepoResult<()>;
    /// Deletes a post and its comments. Returns whether the post existed.
    fn delete_post_cascade(&self, id: PostId) -> RepoResult<bool>;
    /// Inserts a comment after resolving its parent post.
    fn insert_comment(&self, comment: &NewComment) -> RepoResult<CommentId>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Lists a post's comments ordered by id.
    fn list_comments_for_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>>;
    /// Deletes one comment. Returns whether it existed.
    fn delete_comment(&self, id: CommentId) -> RepoResult<bool>;
}

/// SQLite-backed blog repository.
///
/// Owns its connection so one instance can be shared by every request
/// handler; access is serialized by an internal mutex.
pub struct SqliteBlogRepository {
    conn: Mutex<Connection>,
}

impl SqliteBlogRepository {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails when the connection was not opened through `open_db*` (schema
    /// version mismatch) or the blog tables are missing.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_blog_connection_ready(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::ConnectionPoisoned)
    }
}

impl BlogRepository for SqliteBlogRepository {
    fn insert_post(&self, post: &NewPost) -> RepoResult<PostId> {
        post.validate()?;

        let conn = self.lock()?;
        let id = insert_post_row(&conn, post)?;
        debug!("event=post_insert module=repo status=ok post_id={id}");
        Ok(id)
    }

    fn insert_post_with_comment(
        &self,
        post: &NewPost,
        comment_text: &str,
    ) -> RepoResult<(PostId, CommentId)> {
        post.validate()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let post_id = insert_post_row(&tx, post)?;
        let comment = NewComment::new(comment_text, post.author.as_str(), post_id);
        comment.validate()?;
        let comment_id = insert_comment_row(&tx, &comment)?;
        tx.commit()?;

        debug!(
            "event=post_insert module=repo status=ok post_id={post_id} comment_id={comment_id}"
        );
        Ok((post_id, comment_id))
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }

        Ok(None)
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{POST_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn update_post(&self, post: &Post) -> RepoResult<()> {
        post.validate()?;

        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE posts
             SET
                title = ?1,
                description = ?2,
                publish_date = ?3,
                author = ?4
             WHERE id = ?5;",
            params![
                post.title.as_str(),
                post.description.as_str(),
                post.publish_date.to_rfc3339(),
                post.author.as_str(),
                post.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: POSTS_TABLE,
                id: post.id,
            });
        }

        Ok(())
    }

    fn delete_post_cascade(&self, id: PostId) -> RepoResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed_comments = tx.execute("DELETE FROM comments WHERE post_id = ?1;", [id])?;
        let removed_posts = tx.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        tx.commit()?;

        debug!(
            "event=post_delete module=repo status=ok post_id={id} found={} removed_comments={removed_comments}",
            removed_posts > 0
        );
        Ok(removed_posts > 0)
    }

    fn insert_comment(&self, comment: &NewComment) -> RepoResult<CommentId> {
        comment.validate()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !post_exists(&tx, comment.post_id)? {
            return Err(RepoError::NotFound {
                table: POSTS_TABLE,
                id: comment.post_id,
            });
        }
        let id = insert_comment_row(&tx, comment)?;
        tx.commit()?;

        debug!(
            "event=comment_insert module=repo status=ok comment_id={id} post_id={}",
            comment.post_id
        );
        Ok(id)
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }

        Ok(None)
    }

    fn list_comments_for_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare(&format!("{COMMENT_SELECT_SQL} WHERE post_id = ?1 ORDER BY id ASC;"))?;
        let mut rows = stmt.query([post_id])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }

        Ok(comments)
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM comments WHERE id = ?1;", [id])?;
        debug!(
            "event=comment_delete module=repo status=ok comment_id={id} found={}",
            removed > 0
        );
        Ok(removed > 0)
    }
}

fn insert_post_row(conn: &Connection, post: &NewPost) -> RepoResult<PostId> {
    conn.execute(
        "INSERT INTO posts (
            title,
            description,
            publish_date,
            author
        ) VALUES (?1, ?2, ?3, ?4);",
        params![
            post.title.as_str(),
            post.description.as_str(),
            post.publish_date.to_rfc3339(),
            post.author.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_comment_row(conn: &Connection, comment: &NewComment) -> RepoResult<CommentId> {
    conn.execute(
        "INSERT INTO comments (
            text,
            author,
            post_id
        ) VALUES (?1, ?2, ?3);",
        params![
            comment.text.as_str(),
            comment.author.as_str(),
            comment.post_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn post_exists(conn: &Connection, id: PostId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id: PostId = row.get("id")?;
    let publish_date_text: String = row.get("publish_date")?;
    let publish_date = DateTime::parse_from_rfc3339(&publish_date_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{publish_date_text}` in posts.publish_date (id={id})"
        ))
    })?;

    let post = Post {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        publish_date,
        author: row.get("author")?,
    };
    post.validate()
        .map_err(|err| RepoError::InvalidData(format!("posts row {id}: {err}")))?;
    Ok(post)
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let comment = Comment {
        id: row.get("id")?,
        text: row.get("text")?,
        author: row.get("author")?,
        post_id: row.get("post_id")?,
    };
    comment
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("comments row {}: {err}", comment.id)))?;
    Ok(comment)
}

fn ensure_blog_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let required: [(&'static str, &[&'static str]); 2] = [
        (
            POSTS_TABLE,
            &["id", "title", "description", "publish_date", "author"],
        ),
        (COMMENTS_TABLE, &["id", "text", "author", "post_id"]),
    ];
    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
