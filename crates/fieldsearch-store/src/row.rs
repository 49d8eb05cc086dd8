//! Row types returned by the store.

/// A stored field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// A text value.
    Text(String),
    /// NULL, numeric or binary data; never matched by text search.
    NonText,
}

impl MetaValue {
    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::NonText => None,
        }
    }
}

/// One row of the field-value table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRow {
    /// Row identifier, defines storage order.
    pub meta_id: i64,
    /// Owning post.
    pub post_id: i64,
    /// Storage key.
    pub key: String,
    /// Stored value.
    pub value: MetaValue,
}

/// A post as returned by a search statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    /// Post identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Hand-written excerpt (often empty).
    pub excerpt: String,
    /// Body content.
    pub content: String,
}

/// A post to insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    /// Title.
    pub title: String,
    /// Hand-written excerpt.
    pub excerpt: String,
    /// Body content.
    pub content: String,
    /// Password; non-empty means the post is protected.
    pub password: String,
}

impl NewPost {
    /// Creates a post with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the body content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the excerpt.
    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_text() {
        assert_eq!(MetaValue::Text("x".into()).as_text(), Some("x"));
        assert_eq!(MetaValue::NonText.as_text(), None);
    }

    #[test]
    fn new_post_builder() {
        let post = NewPost::new("t").content("c").excerpt("e").password("p");
        assert_eq!(post.title, "t");
        assert_eq!(post.content, "c");
        assert_eq!(post.excerpt, "e");
        assert_eq!(post.password, "p");
    }
}
