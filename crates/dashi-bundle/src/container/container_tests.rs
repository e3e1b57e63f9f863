#![allow(non_snake_case)]

use super::*;
use std::sync::Arc;
use std::thread;

fn text_of(source: &ContainerSource, name: &str) -> String {
    source.open(name).unwrap().into_text(name).unwrap()
}

// ============================================================================
// Prolog and separator line
// ============================================================================

#[test]
fn ContainerSource___magic_only___is_available_and_empty() {
    let source = ContainerSource::new("dashi-bundle");

    assert!(source.available());
    assert!(source.names().is_empty());
}

#[test]
fn ContainerSource___magic_with_trailing_newline___is_available_and_empty() {
    let source = ContainerSource::new("dashi-bundle v1\n");

    assert!(source.available());
    assert!(source.names().is_empty());
}

#[test]
fn ContainerSource___no_magic___is_unavailable() {
    let source = ContainerSource::new("bundle\n");

    assert!(!source.available());
    assert!(source.unavailable_reason().is_some());
}

#[test]
fn ContainerSource___magic_not_on_first_line___is_unavailable() {
    let source = ContainerSource::new("hello there\ndashi-bundle\nSEP a.txt\nA");

    assert!(!source.available());
}

#[test]
fn ContainerSource___absent_document___is_unavailable() {
    let source = ContainerSource::absent();

    assert!(!source.available());
    assert!(matches!(
        source.open("a.txt"),
        Err(BundleError::Unavailable(Some(_)))
    ));
}

#[test]
fn ContainerSource___prolog_text___is_ignored() {
    let source = ContainerSource::new("#!dashi-bundle format=1 \nSEP a.txt\nA");

    assert_eq!(text_of(&source, "a.txt"), "A");
}

#[test]
fn ContainerSource___separator_line_without_space___is_unavailable() {
    let source = ContainerSource::new("dashi-bundle\nSEPa.txt\nA");

    assert!(!source.available());
    assert!(source.names().is_empty());
}

#[test]
fn ContainerSource___separator_line_starting_with_space___is_unavailable() {
    let source = ContainerSource::new("dashi-bundle\n a.txt\nA");

    assert!(!source.available());
}

// ============================================================================
// Entries
// ============================================================================

#[test]
fn ContainerSource___text_entry___returns_body_verbatim() {
    let source = ContainerSource::new("dashi-bundle\nSEP hello.txt\nHello World!");

    assert!(source.exists("hello.txt"));
    assert_eq!(
        source.open("hello.txt").unwrap(),
        EntryContent::Text("Hello World!".to_string())
    );
}

#[test]
fn ContainerSource___base64_entry___decodes_bytes() {
    let source = ContainerSource::new("dashi-bundle\nSEP hello.bin;base64\nSGVsbG8gV29ybGQh");

    assert_eq!(
        source.open("hello.bin").unwrap(),
        EntryContent::Bytes(b"Hello World!".to_vec())
    );
}

#[test]
fn ContainerSource___base64_split_across_lines___decodes_identically() {
    let split = ContainerSource::new("dashi-bundle\nSEP hello.bin;base64\nSGV\nsbG8\ngV29\nybGQ\nh");
    let whole = ContainerSource::new("dashi-bundle\nSEP hello.bin;base64\nSGVsbG8gV29ybGQh");

    assert_eq!(split.open("hello.bin").unwrap(), whole.open("hello.bin").unwrap());
}

#[test]
fn ContainerSource___invalid_base64___fails_only_that_entry() {
    let source = ContainerSource::new("dashi-bundle\nSEP bad.bin;base64\n!!!!\nSEP ok.txt\nfine");

    assert!(matches!(source.open("bad.bin"), Err(BundleError::Base64 { .. })));
    assert_eq!(text_of(&source, "ok.txt"), "fine");
}

#[test]
fn ContainerSource___sequential_entries___do_not_bleed() {
    let source = ContainerSource::new(
        "dashi-bundle\n@@ first.txt\nline one\nline two\n@@ second.txt\nother",
    );

    assert_eq!(source.names(), vec!["first.txt", "second.txt"]);
    assert_eq!(text_of(&source, "first.txt"), "line one\nline two");
    assert_eq!(text_of(&source, "second.txt"), "other");
}

#[test]
fn ContainerSource___crlf_document___uses_crlf_separators() {
    let source = ContainerSource::new(
        "dashi-bundle\r\n-- a.txt\r\nalpha\r\nbeta\r\n-- b.bin;base64\r\nSGVs\r\nbG8=\r\n",
    );

    assert_eq!(text_of(&source, "a.txt"), "alpha\r\nbeta");
    assert_eq!(source.open("b.bin").unwrap().into_bytes(), b"Hello");
}

#[test]
fn ContainerSource___lf_separator_in_crlf_document___stays_in_body() {
    let source = ContainerSource::new("dashi-bundle\r\n-- a.txt\r\nalpha\n-- b.txt\r\nbeta");

    assert_eq!(source.names(), vec!["a.txt"]);
}

#[test]
fn ContainerSource___token_mid_line___is_not_a_separator() {
    let source = ContainerSource::new("dashi-bundle\n@@ a.txt\nsee @@ b.txt here");

    assert_eq!(source.names(), vec!["a.txt"]);
    assert_eq!(text_of(&source, "a.txt"), "see @@ b.txt here");
}

#[test]
fn ContainerSource___header_without_body___has_empty_entry() {
    let source = ContainerSource::new("dashi-bundle\n@@ empty.txt");

    assert_eq!(text_of(&source, "empty.txt"), "");
}

#[test]
fn ContainerSource___header_whitespace___is_trimmed() {
    let source = ContainerSource::new("dashi-bundle\n@@   padded.txt  \nbody");

    assert!(source.exists("padded.txt"));
}

#[test]
fn ContainerSource___nested_names___are_kept() {
    let source = ContainerSource::new("dashi-bundle\n@@ icons/lang__en/home.png;base64\nAAEC");

    assert_eq!(source.names(), vec!["icons/lang__en/home.png"]);
    assert_eq!(
        source.open("icons/lang__en/home.png").unwrap().into_bytes(),
        vec![0, 1, 2]
    );
}

#[test]
fn ContainerSource___duplicate_name___keeps_last_body_at_first_position() {
    let source = ContainerSource::new("dashi-bundle\n@@ a.txt\none\n@@ b.txt\nb\n@@ a.txt\ntwo");

    assert_eq!(source.names(), vec!["a.txt", "b.txt"]);
    assert_eq!(text_of(&source, "a.txt"), "two");
}

// ============================================================================
// All-or-nothing failure
// ============================================================================

#[test]
fn ContainerSource___empty_name_in_later_header___invalidates_everything() {
    let source = ContainerSource::new("dashi-bundle\n@@ good.txt\nok\n@@ ;base64\nAAAA");

    assert!(!source.available());
    assert!(!source.exists("good.txt"));
    assert!(source.names().is_empty());
}

#[test]
fn ContainerSource___leading_slash_name___invalidates_everything() {
    let source = ContainerSource::new("dashi-bundle\n@@ good.txt\nok\n@@ /abs.txt\nx");

    assert!(!source.available());
}

#[test]
fn ContainerSource___trailing_slash_name___invalidates_everything() {
    let source = ContainerSource::new("dashi-bundle\n@@ icons/\nx");

    assert!(!source.available());
}

#[test]
fn ContainerSource___open_unknown_name___returns_no_such_entry() {
    let source = ContainerSource::new("dashi-bundle\n@@ a.txt\nA");

    assert!(matches!(source.open("b.txt"), Err(BundleError::NoSuchEntry(_))));
}

#[test]
fn ContainerSource___from_invalid_utf8___is_unavailable() {
    let source = ContainerSource::from_bytes(vec![0xff; 20]);

    assert!(!source.available());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn ContainerSource___concurrent_first_access___observes_one_index() {
    let mut document = String::from("dashi-bundle\n@@ e0.txt\n0");
    for i in 1..200 {
        document.push_str(&format!("\n@@ e{i}.txt\n{i}"));
    }
    let source = Arc::new(ContainerSource::new(document));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let source = Arc::clone(&source);
            thread::spawn(move || source.names())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().len(), 200);
    }
}
