use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row};
use time::OffsetDateTime;

use crate::models::{
    Blog, BlogId, BlogUpdate, Category, CategoryDetail, CategoryId, CategoryInput, NewBlog,
};
use crate::Database;

/// Columns selected for every blog query, joined with the category name.
const BLOG_SELECT: &str = "SELECT b.id, b.title, b.content, b.category_id, b.author,
        b.created_at, b.updated_at, c.name
 FROM blogs b
 LEFT JOIN categories c ON b.category_id = c.id";

/// Service layer providing blog and category operations.
///
/// BlogService owns a Database instance. Each operation is a single
/// parameterized statement (plus a read-back where the caller needs the
/// stored row); there are no multi-table transactions.
///
/// # Examples
///
/// ```
/// use startup_blog::{BlogService, Database};
/// use startup_blog::models::CategoryInput;
///
/// # fn main() -> anyhow::Result<()> {
/// let service = BlogService::new(Database::in_memory()?);
/// let category = service.create_category(&CategoryInput {
///     name: "Funding".to_string(),
///     description: None,
/// })?;
/// assert_eq!(service.list_categories()?, vec![category]);
/// # Ok(())
/// # }
/// ```
pub struct BlogService {
    db: Database,
}

impl BlogService {
    /// Creates a new BlogService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // --- Categories ---

    /// Lists all categories ordered by name.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare("SELECT id, name, description FROM categories ORDER BY name")
            .context("Failed to prepare category query")?;
        let rows = stmt
            .query_map([], category_from_row)
            .context("Failed to query categories")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read category")
    }

    /// Retrieves a category with the number of posts filed under it.
    ///
    /// Returns `None` if no category has the given ID.
    pub fn get_category(&self, id: CategoryId) -> Result<Option<CategoryDetail>> {
        let conn = self.db.connection();
        let Some(category) = self.find_category(id)? else {
            return Ok(None);
        };

        let blog_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM blogs WHERE category_id = ?1",
            [id.get()],
            |row| row.get(0),
        )?;

        Ok(Some(CategoryDetail {
            category,
            blog_count,
        }))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Fails with a constraint violation (see [`is_constraint_violation`]) if
    /// the name is already taken.
    pub fn create_category(&self, input: &CategoryInput) -> Result<Category> {
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO categories (name, description) VALUES (?1, ?2)",
            (&input.name, &input.description),
        )?;

        let id = CategoryId::new(conn.last_insert_rowid());
        self.find_category(id)?
            .context("Category missing after insert")
    }

    /// Replaces a category's name and description.
    ///
    /// Returns `None` if no category has the given ID.
    pub fn update_category(&self, id: CategoryId, input: &CategoryInput) -> Result<Option<Category>> {
        let changed = self.db.connection().execute(
            "UPDATE categories SET name = ?1, description = ?2 WHERE id = ?3",
            (&input.name, &input.description, id.get()),
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.find_category(id)
    }

    /// Deletes a category. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Fails with a constraint violation if posts still reference it.
    pub fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM categories WHERE id = ?1", [id.get()])?;
        Ok(changed > 0)
    }

    fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let category = self
            .db
            .connection()
            .query_row(
                "SELECT id, name, description FROM categories WHERE id = ?1",
                [id.get()],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    // --- Blogs ---

    /// Lists all posts, newest first.
    pub fn list_blogs(&self) -> Result<Vec<Blog>> {
        self.query_blogs(
            &format!("{BLOG_SELECT} ORDER BY b.created_at DESC, b.id DESC"),
            [],
        )
    }

    /// Lists the posts in one category, newest first.
    pub fn list_blogs_by_category(&self, category_id: CategoryId) -> Result<Vec<Blog>> {
        self.query_blogs(
            &format!("{BLOG_SELECT} WHERE b.category_id = ?1 ORDER BY b.created_at DESC, b.id DESC"),
            [category_id.get()],
        )
    }

    /// Retrieves a post by ID. Returns `None` if it does not exist.
    pub fn get_blog(&self, id: BlogId) -> Result<Option<Blog>> {
        let blog = self
            .db
            .connection()
            .query_row(
                &format!("{BLOG_SELECT} WHERE b.id = ?1"),
                [id.get()],
                blog_from_row,
            )
            .optional()?;
        Ok(blog)
    }

    /// Creates a post with the current time as both timestamps.
    ///
    /// # Errors
    ///
    /// Fails with a constraint violation if `category_id` does not exist.
    pub fn create_blog(&self, blog: &NewBlog) -> Result<Blog> {
        let conn = self.db.connection();
        let now = OffsetDateTime::now_utc().unix_timestamp();

        conn.execute(
            "INSERT INTO blogs (title, content, category_id, author, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &blog.title,
                &blog.content,
                blog.category_id.map(CategoryId::get),
                &blog.author,
                now,
                now,
            ),
        )?;

        let id = BlogId::new(conn.last_insert_rowid());
        self.get_blog(id)?.context("Blog missing after insert")
    }

    /// Replaces a post's title, content and category, bumping `updated_at`.
    ///
    /// Returns `None` if no post has the given ID.
    pub fn update_blog(&self, id: BlogId, update: &BlogUpdate) -> Result<Option<Blog>> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let changed = self.db.connection().execute(
            "UPDATE blogs SET title = ?1, content = ?2, category_id = ?3, updated_at = ?4
             WHERE id = ?5",
            (
                &update.title,
                &update.content,
                update.category_id.map(CategoryId::get),
                now,
                id.get(),
            ),
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_blog(id)
    }

    /// Deletes a post. Returns `false` if it did not exist.
    pub fn delete_blog(&self, id: BlogId) -> Result<bool> {
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM blogs WHERE id = ?1", [id.get()])?;
        Ok(changed > 0)
    }

    fn query_blogs(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Blog>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(sql).context("Failed to prepare blog query")?;
        let rows = stmt
            .query_map(params, blog_from_row)
            .context("Failed to query blogs")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read blog")
    }
}

/// Returns `true` if `error` was caused by a SQLite constraint violation
/// (duplicate category name, dangling or still-referenced foreign key).
pub fn is_constraint_violation(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<rusqlite::Error>())
        .any(|e| e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation))
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: CategoryId::new(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn blog_from_row(row: &Row<'_>) -> rusqlite::Result<Blog> {
    Ok(Blog {
        id: BlogId::new(row.get(0)?),
        title: row.get(1)?,
        content: row.get(2)?,
        category_id: row.get::<_, Option<i64>>(3)?.map(CategoryId::new),
        author: row.get(4)?,
        created_at: timestamp(row, 5)?,
        updated_at: timestamp(row, 6)?,
        category_name: row.get(7)?,
    })
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<OffsetDateTime> {
    let secs: i64 = row.get(idx)?;
    OffsetDateTime::from_unix_timestamp(secs).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Integer, Box::new(e))
    })
}
