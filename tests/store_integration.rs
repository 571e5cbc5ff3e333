//! Blog store integration tests against on-disk databases.
//!
//! Only types exported from the `startup_blog` crate root are used here; the
//! store must be usable without the HTTP layer or the CLI.

use anyhow::Result;
use startup_blog::models::{BlogUpdate, CategoryInput, NewBlog};
use startup_blog::{BlogService, Database};
use tempfile::tempdir;

fn new_blog(title: &str) -> NewBlog {
    NewBlog {
        title: title.to_string(),
        content: "Lessons from year one".to_string(),
        category_id: None,
        author: "Grace".to_string(),
    }
}

#[test]
fn posts_survive_reopening_the_database() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("blog.db");

    let (category_id, blog_id) = {
        let service = BlogService::new(Database::open(&path)?);
        let category = service.create_category(&CategoryInput {
            name: "Operations".to_string(),
            description: Some("Running the company".to_string()),
        })?;
        let blog = service.create_blog(&NewBlog {
            category_id: Some(category.id),
            ..new_blog("Year one")
        })?;
        (category.id, blog.id)
    };

    let service = BlogService::new(Database::open(&path)?);
    let blog = service.get_blog(blog_id)?.expect("blog should persist");

    assert_eq!(blog.title, "Year one");
    assert_eq!(blog.category_id, Some(category_id));
    assert_eq!(blog.category_name.as_deref(), Some("Operations"));
    assert_eq!(
        service.get_category(category_id)?.map(|detail| detail.blog_count),
        Some(1)
    );

    Ok(())
}

#[test]
fn moving_a_post_between_categories_updates_counts() -> Result<()> {
    let dir = tempdir()?;
    let service = BlogService::new(Database::open(dir.path().join("blog.db"))?);

    let from = service.create_category(&CategoryInput {
        name: "Product".to_string(),
        description: None,
    })?;
    let to = service.create_category(&CategoryInput {
        name: "Engineering".to_string(),
        description: None,
    })?;
    let blog = service.create_blog(&NewBlog {
        category_id: Some(from.id),
        ..new_blog("Shipping weekly")
    })?;

    let moved = service
        .update_blog(
            blog.id,
            &BlogUpdate {
                title: blog.title.clone(),
                content: blog.content.clone(),
                category_id: Some(to.id),
            },
        )?
        .expect("blog should exist");

    assert_eq!(moved.category_name.as_deref(), Some("Engineering"));
    assert!(service.list_blogs_by_category(from.id)?.is_empty());
    assert_eq!(service.list_blogs_by_category(to.id)?.len(), 1);

    // The emptied category can now be deleted.
    assert!(service.delete_category(from.id)?);

    Ok(())
}
