pub mod chat;
pub mod health;
pub mod language;
pub mod metrics;
pub mod pages;
