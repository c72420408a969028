pub mod dashboard;
pub mod expenses;
pub mod insight;
pub mod setup;
pub mod ui;
