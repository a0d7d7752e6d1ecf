use crate::mapping::parse_content_list;
use crate::types::ContentItem;

/// Bundled sample list in the same wire format the server returns.
pub const SAMPLE_CONTENT_JSON: &str = include_str!("../fixtures/movies.json");

/// Parse the bundled sample list.
pub fn sample_items() -> Result<Vec<ContentItem>, serde_json::Error> {
    parse_content_list(SAMPLE_CONTENT_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_parses_completely() {
        let items = sample_items().unwrap();
        assert_eq!(items.len(), 18);
        assert_eq!(items[0].id(), 369854);
        assert_eq!(items[0].title(), "Joe");
        assert!(items.iter().all(|i| i.image_url().is_some()));
    }
}
