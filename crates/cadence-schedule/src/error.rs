#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("calendar arithmetic out of range: {0}")]
    OutOfRange(&'static str),

    #[error("local time cannot be resolved in the schedule time zone")]
    InvalidLocalTime,
}

pub type Result<T> = core::result::Result<T, Error>;
