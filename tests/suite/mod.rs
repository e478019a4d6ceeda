//! Integration test suite modules

mod carousel;
mod config;
mod gemini;
mod render;
mod workflow;
