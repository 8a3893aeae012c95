#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod checkpoint;
pub mod disease;
pub mod labels;
mod spec;

pub use labels::LabelCatalog;
pub use spec::Classifier;
