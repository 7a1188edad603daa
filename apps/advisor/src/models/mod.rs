pub mod diagnosis;

pub use diagnosis::{CompanyType, DiagnosisInput};
