use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}
