mod ai;
mod blog;
mod category;
mod ids;

pub use ai::{EnhancementRequest, EnhancementType, Idea, IdeaRequest, RelevanceReport};
pub use blog::{Blog, BlogUpdate, NewBlog};
pub use category::{Category, CategoryDetail, CategoryInput};
pub use ids::{BlogId, CategoryId};
