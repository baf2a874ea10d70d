use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Invalid Configuration: {0}")]
    InvalidConfig(String),

    // Skeleton errors, both raised by tera
    #[error("Template Parse Error: {0}")]
    TemplateParse(#[source] tera::Error),

    #[error("Substitution Error: {0}")]
    Substitution(#[source] tera::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl PartialEq<Self> for GenError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
