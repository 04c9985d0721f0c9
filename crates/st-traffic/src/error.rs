use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("density_factor must be a positive number, got {0}")]
    InvalidDensityFactor(f64),

    #[error("v_min must be a positive number, got {0}")]
    InvalidMinSpeed(f64),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
