//! Error type for the app helpers.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Color(#[from] prism_color::Error),

    #[error("{0:?} is not a color space of the config")]
    UnknownMenuItem(String),
}
