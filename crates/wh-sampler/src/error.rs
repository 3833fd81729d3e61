use thiserror::Error;

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("temperature must be a positive finite number, got {0}")]
    InvalidTemperature(f32),
}

pub type Result<T> = std::result::Result<T, SamplerError>;
