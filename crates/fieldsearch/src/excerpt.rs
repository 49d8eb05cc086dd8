//! Excerpts stitched from matching field values.
//!
//! Field values that contain the search term are placed first, longest first,
//! followed by the rest and finally the post's own excerpt. The result has its
//! markup stripped and is cut back to a word boundary.

use std::{iter, sync::LazyLock};

use fieldsearch_config::ExcerptSettings;
use fieldsearch_fields::KeyMatcher;
use fieldsearch_store::{MetaRow, MetaStore};
use regex::Regex;
use tracing::{debug, warn};

/// Characters trimmed from both ends of every piece and of the result.
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B', '.'];

/// `<script>` and `<style>` blocks, including their content.
static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")
        .expect("script/style pattern is valid")
});

/// Any remaining tag.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

/// Length limit and truncation suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptOptions {
    /// Maximum length in characters before truncation.
    pub length: usize,
    /// Appended when the text was truncated.
    pub suffix: String,
}

impl Default for ExcerptOptions {
    fn default() -> Self {
        Self {
            length: 200,
            suffix: String::from(" [...]"),
        }
    }
}

impl From<&ExcerptSettings> for ExcerptOptions {
    fn from(settings: &ExcerptSettings) -> Self {
        Self {
            length: settings.length,
            suffix: settings.suffix.clone(),
        }
    }
}

/// Builds excerpts from the searchable field values of a post.
pub struct ExcerptBuilder<'a> {
    /// Maps storage keys to searchable fields.
    matcher: &'a KeyMatcher,
}

impl<'a> ExcerptBuilder<'a> {
    /// Creates a builder restricted to keys accepted by `matcher`.
    pub fn new(matcher: &'a KeyMatcher) -> Self {
        Self { matcher }
    }

    /// Builds the excerpt for `post_id`.
    ///
    /// If the store cannot be read the original excerpt is used on its own.
    pub fn build<S: MetaStore + ?Sized>(
        &self,
        store: &S,
        post_id: i64,
        original: &str,
        term: &str,
        options: &ExcerptOptions,
    ) -> String {
        let rows = match store.post_meta(post_id) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(post_id, error = %e, "could not read field values; using original excerpt");
                Vec::new()
            }
        };
        let values = self.field_values(&rows);
        debug!(post_id, values = values.len(), "building excerpt");
        compose_excerpt(&values, original, term, options)
    }

    /// Returns the text values of searchable fields, in catalog order.
    ///
    /// Values of the same field keep storage order.
    fn field_values<'r>(&self, rows: &'r [MetaRow]) -> Vec<&'r str> {
        let mut ranked: Vec<(usize, &str)> = rows
            .iter()
            .filter_map(|row| {
                let text = row.value.as_text()?;
                let field = self.matcher.field_index(&row.key)?;
                Some((field, text))
            })
            .collect();
        ranked.sort_by_key(|&(field, _)| field);
        ranked.into_iter().map(|(_, text)| text).collect()
    }
}

/// Composes an excerpt from candidate values and the original excerpt.
///
/// Values containing `term` (case-insensitively) are weighted by their length
/// and moved to the front; the sort is stable, so equal weights keep the order
/// given. The original excerpt always comes last.
pub fn compose_excerpt(
    values: &[&str],
    original: &str,
    term: &str,
    options: &ExcerptOptions,
) -> String {
    let needle = term.to_lowercase();
    let mut weighted: Vec<(usize, &str)> = values
        .iter()
        .map(|value| (weight(value, &needle), *value))
        .collect();
    weighted.sort_by(|a, b| b.0.cmp(&a.0));

    let mut text = String::new();
    for piece in weighted.iter().map(|&(_, v)| v).chain(iter::once(original)) {
        append_piece(&mut text, piece);
    }

    match truncate_words(&text, options.length) {
        Some(cut) if cut.is_empty() => String::new(),
        Some(cut) => format!("{cut}{}", options.suffix),
        None => text,
    }
}

/// Removes `<script>`/`<style>` blocks and then every tag.
pub fn strip_markup(text: &str) -> String {
    let without_blocks = SCRIPT_OR_STYLE.replace_all(text, "");
    TAG.replace_all(&without_blocks, "").into_owned()
}

/// The length of `value` in characters if it contains `needle`, else zero.
fn weight(value: &str, needle: &str) -> usize {
    if needle.is_empty() || !value.to_lowercase().contains(needle) {
        return 0;
    }
    value.chars().count()
}

/// Appends a cleaned piece, separated from previous text by one space.
fn append_piece(text: &mut String, piece: &str) {
    let stripped = strip_markup(piece);
    let cleaned = stripped.trim_matches(TRIM_CHARS);
    if cleaned.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(cleaned);
}

/// Cuts `text` to at most `max_chars` characters at a word boundary.
///
/// Returns `None` when the text already fits. A first word longer than the
/// limit yields an empty cut.
fn truncate_words(text: &str, max_chars: usize) -> Option<&str> {
    let (cut, _) = text.char_indices().nth(max_chars)?;
    let head = &text[..cut];
    let kept = if text[cut..].starts_with(char::is_whitespace) {
        head
    } else {
        head.rfind(char::is_whitespace).map_or("", |i| &head[..i])
    };
    Some(kept.trim_matches(TRIM_CHARS))
}

#[cfg(test)]
mod tests {
    use fieldsearch_fields::{FieldCatalog, FieldDefinition, FieldKind, resolve_patterns};
    use fieldsearch_sql::SqlError;
    use fieldsearch_store::{NewPost, SqliteStore, StoreError, StoreTables};

    use super::*;

    fn options(length: usize) -> ExcerptOptions {
        ExcerptOptions {
            length,
            suffix: String::from(" [...]"),
        }
    }

    #[test]
    fn longer_match_comes_first() {
        let values = ["short match", "a much longer matching text block"];
        let excerpt = compose_excerpt(&values, "", "match", &options(200));
        assert_eq!(excerpt, "a much longer matching text block short match");
    }

    #[test]
    fn matches_precede_non_matches_and_original_is_last() {
        let values = ["nothing here", "a match"];
        let excerpt = compose_excerpt(&values, "The post excerpt.", "MATCH", &options(200));
        assert_eq!(excerpt, "a match nothing here The post excerpt");
    }

    #[test]
    fn equal_weights_keep_given_order() {
        let values = ["match one", "match two"];
        let excerpt = compose_excerpt(&values, "", "match", &options(200));
        assert_eq!(excerpt, "match one match two");
    }

    #[test]
    fn truncates_at_word_boundary_with_suffix() {
        let excerpt = compose_excerpt(&[], "hello wonderful world", "x", &options(10));
        assert_eq!(excerpt, "hello [...]");
    }

    #[test]
    fn cut_on_a_space_keeps_the_whole_word() {
        let excerpt = compose_excerpt(&[], "hello world again", "x", &options(11));
        assert_eq!(excerpt, "hello world [...]");
    }

    #[test]
    fn no_suffix_without_truncation() {
        let excerpt = compose_excerpt(&[], "short", "x", &options(10));
        assert_eq!(excerpt, "short");
    }

    #[test]
    fn single_long_word_yields_empty() {
        let excerpt = compose_excerpt(&[], "supercalifragilistic", "x", &options(5));
        assert_eq!(excerpt, "");
    }

    #[test]
    fn empty_input_yields_empty() {
        assert_eq!(compose_excerpt(&[], "", "x", &options(10)), "");
        assert_eq!(compose_excerpt(&["<p></p>"], " . ", "x", &options(10)), "");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let excerpt = compose_excerpt(&[], "héllo wörld", "x", &options(8));
        assert_eq!(excerpt, "héllo [...]");
    }

    #[test]
    fn markup_is_stripped() {
        let text = "<p>Hello <b>there</b></p><script>alert('x')</script><STYLE>p{}</STYLE>";
        assert_eq!(strip_markup(text), "Hello there");
    }

    #[test]
    fn pieces_are_trimmed() {
        let values = ["\tfirst match.\n"];
        let excerpt = compose_excerpt(&values, "...original...", "match", &options(200));
        assert_eq!(excerpt, "first match original");
    }

    fn catalog_matcher() -> KeyMatcher {
        let catalog = FieldCatalog::from_definitions(vec![
            FieldDefinition::new("field_a", "a", FieldKind::TextLike).with_searchable(true),
            FieldDefinition::new("field_b", "b", FieldKind::TextLike).with_searchable(true),
            FieldDefinition::new("field_secret", "secret", FieldKind::TextLike),
        ]);
        KeyMatcher::new(&resolve_patterns(&catalog).unwrap()).unwrap()
    }

    #[test]
    fn builds_from_store_rows() {
        let store = SqliteStore::open_in_memory(StoreTables::default()).unwrap();
        store.create_schema().unwrap();
        let id = store.insert_post(&NewPost::new("Post")).unwrap();
        store.insert_meta(id, "b", "a much longer matching text block").unwrap();
        store.insert_meta(id, "a", "short match").unwrap();
        store.insert_meta(id, "secret", "matching secret value that is long").unwrap();
        store.insert_meta(id, "a", 42).unwrap();

        let matcher = catalog_matcher();
        let excerpt = ExcerptBuilder::new(&matcher).build(&store, id, "", "match", &options(200));
        assert_eq!(excerpt, "a much longer matching text block short match");
    }

    #[test]
    fn catalog_order_breaks_ties() {
        let store = SqliteStore::open_in_memory(StoreTables::default()).unwrap();
        store.create_schema().unwrap();
        let id = store.insert_post(&NewPost::new("Post")).unwrap();
        store.insert_meta(id, "b", "bbbb").unwrap();
        store.insert_meta(id, "a", "aaaa").unwrap();

        let matcher = catalog_matcher();
        let excerpt = ExcerptBuilder::new(&matcher).build(&store, id, "", "zzz", &options(200));
        assert_eq!(excerpt, "aaaa bbbb");
    }

    struct FailingStore;

    impl MetaStore for FailingStore {
        fn distinct_keys_matching(&self, _patterns: &[String]) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }

        fn post_meta(&self, _post_id: i64) -> Result<Vec<MetaRow>, StoreError> {
            Err(StoreError::Table(SqlError::InvalidIdentifier {
                name: String::from("broken table"),
            }))
        }
    }

    #[test]
    fn store_failure_falls_back_to_original() {
        let matcher = catalog_matcher();
        let excerpt =
            ExcerptBuilder::new(&matcher).build(&FailingStore, 1, "Original text.", "x", &options(200));
        assert_eq!(excerpt, "Original text");
    }
}
