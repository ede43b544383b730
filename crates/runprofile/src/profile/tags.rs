/// Splits a comma separated tag string. Each tag is trimmed and has its
/// internal spaces removed; empty tags are dropped. Order and duplicates
/// are kept.
#[must_use]
pub fn normalize_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|tag| tag.trim().replace(' ', ""))
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::normalize_tags;

    #[test]
    fn drops_empty_entries_and_spaces() {
        assert_eq!(normalize_tags("a, b ,, c"), vec!["a", "b", "c"]);
        assert_eq!(normalize_tags("smoke test, regression"), vec!["smoketest", "regression"]);
    }

    #[test]
    fn keeps_order_and_duplicates() {
        assert_eq!(normalize_tags("b,a,b"), vec!["b", "a", "b"]);
        assert!(normalize_tags(" , ,").is_empty());
        assert!(normalize_tags("").is_empty());
    }
}
