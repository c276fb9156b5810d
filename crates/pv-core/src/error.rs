use thiserror::Error;

pub type PvResult<T> = Result<T, PvError>;

#[derive(Error, Debug)]
pub enum PvError {
    #[error("Unknown table category: {name}")]
    UnknownCategory { name: String },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },
}
