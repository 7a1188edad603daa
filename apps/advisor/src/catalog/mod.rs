// Reference data: course catalog, curriculum tracks and the case knowledge base.
// Loaded from CSV once per process and shared read-only via `CatalogRepository`.

pub mod encoding;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod repository;

pub use models::{
    CaseRecord, CatalogSnapshot, CourseCatalog, CurriculumTrack, DataSource, DiagnosticSeverity,
    LoadDiagnostic,
};
pub use repository::CatalogRepository;
