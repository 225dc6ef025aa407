//! Resume processing module
//! Record model, markup translation, block building and the generation pipeline

pub mod blocks;
pub mod generator;
pub mod markup;
pub mod record;

pub use generator::{EnrichmentPolicy, GeneratedDocument, ResumeGenerator};
pub use record::ResumeRecord;
