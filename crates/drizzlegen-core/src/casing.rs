//! snake_case to camelCase / PascalCase conversion.

/// Convert a snake_case identifier to camelCase (field-name form).
///
/// Empty segments from repeated, leading or trailing underscores are skipped.
/// A single-segment identifier is returned as-is, so the conversion is a
/// no-op on its own output. An identifier made only of underscores is
/// returned unchanged.
pub fn to_camel_case(ident: &str) -> String {
    let mut segments = segments(ident);
    let Some(first) = segments.next() else {
        return ident.to_string();
    };

    let rest: Vec<&str> = segments.collect();
    if rest.is_empty() {
        return first.to_string();
    }

    let mut out = first.to_lowercase();
    for segment in rest {
        push_capitalized(&mut out, segment);
    }
    out
}

/// Convert a snake_case identifier to PascalCase (type-name form).
pub fn to_pascal_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for segment in segments(ident) {
        push_capitalized(&mut out, segment);
    }
    if out.is_empty() {
        return ident.to_string();
    }
    out
}

fn segments(ident: &str) -> impl Iterator<Item = &str> {
    ident.split('_').filter(|s| !s.is_empty())
}

fn push_capitalized(out: &mut String, segment: &str) {
    let mut chars = segment.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_camel_case("source_order_id"), "sourceOrderId");
        assert_eq!(to_camel_case("Display_Mode"), "displayMode");
    }

    #[test]
    fn test_single_segment_unchanged() {
        assert_eq!(to_camel_case("name"), "name");
        assert_eq!(to_camel_case("userId"), "userId");
        assert_eq!(to_pascal_case("name"), "Name");
    }

    #[test]
    fn test_empty_segments_skipped() {
        assert_eq!(to_camel_case("tag__ids"), "tagIds");
        assert_eq!(to_camel_case("_internal_flag_"), "internalFlag");
        assert_eq!(to_pascal_case("order__items"), "OrderItems");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("storefront_config"), "StorefrontConfig");
        assert_eq!(to_pascal_case("order_items"), "OrderItems");
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(to_camel_case(""), "");
        assert_eq!(to_camel_case("__"), "__");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_camel_case_idempotent_and_underscore_free() {
        for ident in [
            "id",
            "created_at",
            "a_b_c",
            "top_products_count",
            "x__y",
            "_leading",
            "trailing_",
            "api_v2_key",
        ] {
            let once = to_camel_case(ident);
            assert!(!once.contains('_'), "{ident} -> {once}");
            assert_eq!(to_camel_case(&once), once);
        }
    }
}
