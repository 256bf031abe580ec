//! Core library for the newsreel agent
//!
//! This crate contains the domain model and the pipeline collaborators:
//! - Content items and the sources that supply them
//! - Media artifacts and the transformers that render them
//! - Publish results and the multi-target publisher
//! - Run records and agent configuration

pub mod config;
pub mod content;
pub mod error;
pub mod media;
pub mod publish;
pub mod run;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
