use clinic_domain::ClinicError;

use crate::seed::SeedError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Clinic(#[from] ClinicError),
    #[error("{0}")]
    Usage(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("write failed: {0}")]
    Output(#[from] std::io::Error),
}
