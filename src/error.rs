pub type PromoreelResult<T> = Result<T, PromoreelError>;

#[derive(thiserror::Error, Debug)]
pub enum PromoreelError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("no usable images after decoding and deduplication")]
    NoUsableImages,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromoreelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            PromoreelError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            PromoreelError::NoUsableImages
                .to_string()
                .contains("no usable images")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PromoreelError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
