//! Core business logic: expense records, derived metrics and AI insights

pub mod aggregate;
pub mod config;
pub mod expense;
pub mod insight;
pub mod log;

// Re-export main types for cleaner imports
pub use expense::{Category, Expense, NewExpense};
pub use insight::{Insight, InsightProvider, PromptContext, Sentiment};
