/// Case- and whitespace-insensitive form of a lookup key.
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_case_and_spacing() {
        assert_eq!(normalize_key("  Flour   1KG "), "flour 1kg");
        assert_eq!(normalize_key(""), "");
    }
}
