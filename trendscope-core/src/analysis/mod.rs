//! Snapshot assembly: indicator states combined into one record.

pub mod assembler;
pub mod snapshot;

pub use assembler::{AnalysisAssembler, AssemblySettings};
pub use snapshot::{AnalysisSnapshot, DataQuality, QualityGrade};
