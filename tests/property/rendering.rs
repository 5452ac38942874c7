//! Renderer properties

use proptest::prelude::*;
use render_server::context::Params;
use render_server::render::render;

fn params() -> impl Strategy<Value = Params> {
    prop::collection::btree_map("[a-z_]{1,8}", "[ -~]{0,12}", 0..6)
}

proptest! {
    /// Text without any `%` is returned unchanged
    #[test]
    fn test_payload_without_markers_is_unchanged(payload in "[^%]{0,64}", params in params()) {
        prop_assert_eq!(render(&payload, &params), payload);
    }

    /// With no params every marker survives verbatim
    #[test]
    fn test_unknown_markers_are_preserved(payload in ".{0,64}") {
        prop_assert_eq!(render(&payload, &Params::new()), payload);
    }

    /// A marker whose key is present is always replaced by its value
    #[test]
    fn test_known_marker_is_replaced(
        key in "[a-z_]{1,8}",
        value in "[^%]{0,12}",
        prefix in "[^%]{0,8}",
        suffix in "[^%]{0,8}",
    ) {
        let params = Params::from([(key.clone(), value.clone())]);
        let payload = format!("{}%{}%{}", prefix, key, suffix);
        prop_assert_eq!(render(&payload, &params), format!("{}{}{}", prefix, value, suffix));
    }

    /// Substituted values are never rescanned
    #[test]
    fn test_values_are_not_rescanned(params in params()) {
        let payload: String = params.keys().map(|k| format!("%{}%", k)).collect();
        let expected: String = params.values().cloned().collect();
        prop_assert_eq!(render(&payload, &params), expected);
    }
}
