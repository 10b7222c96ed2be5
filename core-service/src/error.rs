use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
