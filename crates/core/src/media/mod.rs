//! Media artifacts and the transformers that render them

mod card;
mod transformer;

pub use card::CardRenderer;
pub use transformer::{Artifact, MediaTransformer};
