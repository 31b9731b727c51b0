use chronicle_domain::error::AuditError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("audit: {0}")]
    Audit(#[from] AuditError),

    #[error("infra: {0}")]
    Infra(String),
}
