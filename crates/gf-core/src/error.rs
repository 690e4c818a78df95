use thiserror::Error;

pub type GfResult<T> = Result<T, GfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
