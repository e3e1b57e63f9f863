//! Property-based tests for qualifier matching, the item parser and the container codec

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dashi_bundle::syntax::parse_line;
use dashi_bundle::{
    BundleIndex, BundleSource, ContainerSource, Flavor, Item, Qualifier, ScreenClass, ScreenColor,
};
use proptest::prelude::*;

fn arb_language() -> impl Strategy<Value = String> {
    "[a-z]{2}(-[A-Z]{2})?"
}

fn arb_screen_class() -> impl Strategy<Value = ScreenClass> {
    prop::sample::select(ScreenClass::all().to_vec())
}

fn arb_screen_color() -> impl Strategy<Value = ScreenColor> {
    prop::sample::select(ScreenColor::all().to_vec())
}

fn arb_flavor() -> impl Strategy<Value = Flavor> {
    prop::sample::select(Flavor::all().to_vec())
}

fn arb_full() -> impl Strategy<Value = Qualifier> {
    (arb_language(), arb_screen_class(), arb_screen_color(), arb_flavor())
        .prop_map(|(lang, class, color, flavor)| Qualifier::full(lang, class, color, flavor))
}

fn arb_partial() -> impl Strategy<Value = Qualifier> {
    (
        proptest::option::of(arb_language()),
        proptest::option::of(arb_screen_class()),
        proptest::option::of(arb_screen_color()),
        proptest::option::of(arb_flavor()),
    )
        .prop_map(|(lang, class, color, flavor)| {
            let mut q = Qualifier::default();
            if let Some(lang) = lang {
                q = q.with_language(lang);
            }
            if let Some(class) = class {
                q = q.with_screen_class(class);
            }
            if let Some(color) = color {
                q = q.with_screen_color(color);
            }
            if let Some(flavor) = flavor {
                q = q.with_flavor(flavor);
            }
            q
        })
}

proptest! {
    /// Property: the universal qualifier matches every context
    #[test]
    fn proptest_universal_matches_everything(context in arb_partial()) {
        prop_assert!(Qualifier::universal().matches(&context));
    }

    /// Property: a fully specified qualifier matches itself
    #[test]
    fn proptest_full_qualifier_matches_itself(q in arb_full()) {
        prop_assert!(q.matches(&q));
    }

    /// Property: axes a pattern leaves unset never affect matching
    #[test]
    fn proptest_unset_axis_is_ignored(
        pattern in arb_partial(),
        a in arb_full(),
        flavor in arb_flavor(),
    ) {
        prop_assume!(pattern.flavor().is_none());
        let b = a.clone().with_flavor(flavor);

        prop_assert_eq!(pattern.matches(&a), pattern.matches(&b));
    }

    /// Property: sorted variant lists never decrease in qualifier order
    #[test]
    fn proptest_variant_lists_are_sorted(qualifiers in prop::collection::vec(arb_partial(), 0..12)) {
        let index = BundleIndex::from_items(
            qualifiers.into_iter().map(|q| ("inbox".to_string(), Item::builder(q).build())),
        );

        if let Some(list) = index.get("inbox") {
            for pair in list.variants().windows(2) {
                prop_assert!(pair[0].qualifier() <= pair[1].qualifier());
            }
        }
    }

    /// Property: resolution is deterministic
    #[test]
    fn proptest_resolution_is_idempotent(
        qualifiers in prop::collection::vec(arb_partial(), 1..8),
        runtime in arb_full(),
    ) {
        let index = BundleIndex::from_items(qualifiers.into_iter().enumerate().map(|(i, q)| {
            ("inbox".to_string(), Item::builder(q).ordinal(i as i64).build())
        }));

        let first = index.resolve("inbox", &runtime).unwrap();
        let second = index.resolve("inbox", &runtime).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Property: plain ids and unquoted values parse back unchanged
    #[test]
    fn proptest_simple_line_parses(
        id in "[a-zA-Z][a-zA-Z0-9_.-]{0,15}",
        pairs in prop::collection::vec(("[a-z]{1,8}", "[a-zA-Z0-9/.:-]{1,12}"), 0..5),
    ) {
        let mut line = id.clone();
        for (i, (key, value)) in pairs.iter().enumerate() {
            line.push_str(if i == 0 { " " } else { ", " });
            line.push_str(&format!("{key}={value}"));
        }

        let parsed = parse_line(&line).unwrap();

        prop_assert_eq!(parsed.id, id);
        prop_assert_eq!(parsed.fields, pairs);
    }

    /// Property: quoted values keep commas, spaces and equals signs
    #[test]
    fn proptest_quoted_value_is_verbatim(value in "[a-zA-Z0-9 ,=:]{0,24}") {
        let parsed = parse_line(&format!("inbox label=\"{value}\", next=1")).unwrap();

        prop_assert_eq!(&parsed.fields[0].1, &value);
        prop_assert_eq!(parsed.fields.len(), 2);
    }

    /// Property: a text entry body comes back verbatim
    #[test]
    fn proptest_container_text_entry_verbatim(body in "[a-zA-Z0-9 .,=#\"']{0,64}") {
        let source = ContainerSource::new(format!("dashi-bundle\n@@ body.txt\n{body}"));

        let content = source.open("body.txt").unwrap().into_text("body.txt").unwrap();

        prop_assert_eq!(content, body);
    }

    /// Property: base64 bodies decode the same however they are wrapped
    #[test]
    fn proptest_container_base64_wrapping(
        bytes in prop::collection::vec(any::<u8>(), 0..96),
        width in 1usize..20,
    ) {
        let encoded = STANDARD.encode(&bytes);
        let wrapped: Vec<String> = encoded
            .as_bytes()
            .chunks(width)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect();
        let source = ContainerSource::new(format!(
            "dashi-bundle\n@@ blob.bin;base64\n{}",
            wrapped.join("\n")
        ));

        let decoded = source.open("blob.bin").unwrap().into_bytes();

        prop_assert_eq!(decoded, bytes);
    }
}
