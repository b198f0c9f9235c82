/// Malformed document content.
///
/// Line numbers are 1-based and relative to the body passed to
/// [`parse`](crate::parse); [`MarkupError::offset_lines`] maps them to file
/// lines.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// Opening `---` fence without a closing one.
    #[error("frontmatter is not closed with a `---` line")]
    UnclosedFrontmatter,
    /// Frontmatter is not valid YAML or has a value of the wrong type.
    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
    /// A block tag was opened and never closed.
    #[error("line {line}: tag `{name}` is never closed")]
    UnclosedTag {
        /// Tag name.
        name: String,
        /// Line of the opening tag.
        line: usize,
    },
    /// A closing tag with no open tag.
    #[error("line {line}: closing tag `{name}` has no matching opening tag")]
    UnexpectedClose {
        /// Tag name.
        name: String,
        /// Line of the closing tag.
        line: usize,
    },
    /// A closing tag that does not match the innermost open tag.
    #[error("line {line}: expected closing tag `{expected}` (opened on line {opened}), found `{found}`")]
    MismatchedClose {
        /// Name of the innermost open tag.
        expected: String,
        /// Name on the closing tag.
        found: String,
        /// Line of the innermost opening tag.
        opened: usize,
        /// Line of the closing tag.
        line: usize,
    },
    /// A closing tag inside a markdown block that opened after its tag,
    /// such as a list item.
    #[error("line {line}: closing tag `{name}` is nested deeper than its opening tag on line {opened}")]
    Misnested {
        /// Tag name.
        name: String,
        /// Line of the opening tag.
        opened: usize,
        /// Line of the closing tag.
        line: usize,
    },
    /// Attribute list that cannot be parsed.
    #[error("line {line}: {message}")]
    Attribute {
        /// Line of the tag.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

impl MarkupError {
    /// Shift line numbers by `lines`, the length of whatever preceded the body.
    #[must_use]
    pub fn offset_lines(self, lines: usize) -> Self {
        match self {
            Self::UnclosedTag { name, line } => Self::UnclosedTag {
                name,
                line: line + lines,
            },
            Self::UnexpectedClose { name, line } => Self::UnexpectedClose {
                name,
                line: line + lines,
            },
            Self::MismatchedClose {
                expected,
                found,
                opened,
                line,
            } => Self::MismatchedClose {
                expected,
                found,
                opened: opened + lines,
                line: line + lines,
            },
            Self::Misnested { name, opened, line } => Self::Misnested {
                name,
                opened: opened + lines,
                line: line + lines,
            },
            Self::Attribute { line, message } => Self::Attribute {
                line: line + lines,
                message,
            },
            other @ (Self::UnclosedFrontmatter | Self::Frontmatter(_)) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_lines() {
        let err = MarkupError::MismatchedClose {
            expected: "tab".to_owned(),
            found: "tabs".to_owned(),
            opened: 2,
            line: 3,
        }
        .offset_lines(4);
        assert_eq!(
            err.to_string(),
            "line 7: expected closing tag `tab` (opened on line 6), found `tabs`"
        );
        assert!(matches!(
            MarkupError::UnclosedFrontmatter.offset_lines(4),
            MarkupError::UnclosedFrontmatter
        ));
    }
}
