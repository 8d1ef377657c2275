use crate::validate::ValidationIssue;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Model parse error ({format}): {message}")]
    ModelParse {
        format: &'static str,
        message: String,
    },

    #[error("{} validation issue(s), first: {}", .issues.len(), first_issue(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn first_issue(issues: &[ValidationIssue]) -> String {
    issues
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

pub type Result<T> = std::result::Result<T, Error>;
