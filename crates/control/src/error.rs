use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to spawn animation driver: {0}")]
    DriverSpawn(#[from] std::io::Error),
}
