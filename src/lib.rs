pub mod api;
pub mod chat;
pub mod config;
pub mod conversations;
pub mod data;
pub mod db;
pub mod llm;
pub mod prompt;
