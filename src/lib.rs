pub mod config;
pub mod pipeline_config;
pub mod pipeline;

pub use pipeline::batch::{BatchFailure, BatchReport, BatchRunner};
pub use pipeline::extraction::{
    clean_text, truncate_to_budget, DocumentExtractor, DocumentRef, ExtractionError,
    ExtractionResult, ExtractionSource, TextExtractor,
};
pub use pipeline_config::ExtractionConfig;
