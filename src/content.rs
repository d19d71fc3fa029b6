//! Rules for user-authored input: post drafts, comments, tags and search terms.

use serde::Deserialize;
use thiserror::Error;

use crate::db::NewPost;

/// Why a submission was rejected. The message is shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in title and content")]
    MissingTitleOrContent,
    #[error("Comment cannot be empty")]
    EmptyComment,
}

/// Split a comma-separated tag string, trimming entries and dropping empty ones.
///
/// Order and duplicates are preserved.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// The post composer's form fields, as typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tags: String,
}

impl PostDraft {
    /// Turn the draft into an insertable post authored by `author_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingTitleOrContent`] if the trimmed title
    /// or content is empty.
    pub fn validate(&self, author_id: i64) -> Result<NewPost, ValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();

        if title.is_empty() || content.is_empty() {
            return Err(ValidationError::MissingTitleOrContent);
        }

        Ok(NewPost {
            author_id,
            title: title.to_string(),
            content: content.to_string(),
            tags: parse_tags(&self.tags),
        })
    }
}

/// Trim a comment and reject it if nothing is left.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyComment`] for empty or whitespace-only text.
pub fn validate_comment(text: &str) -> Result<&str, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(text)
}

/// Normalize a feed search term; `None` means an unrestricted feed.
#[must_use]
pub fn normalize_search(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags("a, b ,, c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_tags_edge_cases() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
        assert_eq!(parse_tags("rust"), vec!["rust"]);
        assert_eq!(parse_tags("x, x"), vec!["x", "x"]);
        assert_eq!(parse_tags("web dev, react"), vec!["web dev", "react"]);
    }

    #[test]
    fn test_draft_validation() {
        let draft = PostDraft {
            title: "  Hello ".to_string(),
            content: "World\n".to_string(),
            tags: "x, y".to_string(),
        };
        let post = draft.validate(7).unwrap();
        assert_eq!(post.author_id, 7);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert_eq!(post.tags, vec!["x", "y"]);
    }

    #[test]
    fn test_draft_requires_title_and_content() {
        let missing_title = PostDraft {
            title: "   ".to_string(),
            content: "body".to_string(),
            tags: String::new(),
        };
        assert_eq!(
            missing_title.validate(1),
            Err(ValidationError::MissingTitleOrContent)
        );

        let missing_content = PostDraft {
            title: "title".to_string(),
            content: String::new(),
            tags: "a".to_string(),
        };
        assert_eq!(
            missing_content.validate(1),
            Err(ValidationError::MissingTitleOrContent)
        );
    }

    #[test]
    fn test_validate_comment() {
        assert_eq!(validate_comment("  nice post  "), Ok("nice post"));
        assert_eq!(validate_comment(""), Err(ValidationError::EmptyComment));
        assert_eq!(validate_comment(" \n\t"), Err(ValidationError::EmptyComment));
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search(None), None);
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(Some(" Rust ")), Some("Rust".to_string()));
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::MissingTitleOrContent.to_string(),
            "Please fill in title and content"
        );
        assert_eq!(ValidationError::EmptyComment.to_string(), "Comment cannot be empty");
    }
}
