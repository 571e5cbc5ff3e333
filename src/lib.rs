pub mod assistant;
pub mod config;
pub mod db;
pub mod gemini;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod routes;
pub mod server;
pub mod service;

pub use assistant::{AssistError, ContentAssistant, ContentAssistantBuilder};
pub use config::AppConfig;
pub use db::Database;
pub use models::{Blog, Category, EnhancementType, Idea, RelevanceReport};
pub use normalizer::Normalized;
pub use server::{AppState, router};
pub use service::BlogService;
