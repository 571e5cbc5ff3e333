/// Initial database schema for the blog.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// Deleting a category that still has posts is rejected by the foreign key.
pub const INITIAL_SCHEMA: &str = r#"
-- Categories: unique names (case-insensitive) with optional description
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    description TEXT
);

-- Blogs: posts with author and Unix timestamps
CREATE TABLE IF NOT EXISTS blogs (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    category_id INTEGER REFERENCES categories(id),
    author TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Newest-first listing
CREATE INDEX IF NOT EXISTS idx_blogs_created ON blogs(created_at);

-- Per-category listing and counts
CREATE INDEX IF NOT EXISTS idx_blogs_category ON blogs(category_id);
"#;
