//! Webtoon generation service.
//!
//! A story premise goes to a text-generation backend which returns a script;
//! each panel of that script is then drawn by an image-generation backend,
//! one panel at a time, while clients poll the story.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
