#![allow(non_snake_case)]

use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

const DOCUMENT: &str = "dashi-bundle\n\
@@ strings.items\n\
inbox label=Inbox, ordinal=3, app:route=/inbox\n\
broken label=\"open\n\
@@ icons/lang__de/inbox.png;base64\n\
iVBORw0K";

fn write_bundle(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("mail.bundle");
    fs::write(&path, DOCUMENT).unwrap();
    path
}

fn runtime(lang: &str) -> RuntimeArgs {
    RuntimeArgs {
        lang: Some(lang.to_string()),
        screen: Some("pc".to_string()),
        color: Some("COLOR".to_string()),
        flavor: Some("generic".to_string()),
    }
}

fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

// ============================================================================
// Runtime context
// ============================================================================

#[test]
fn RuntimeArgs___all_axes___builds_full_qualifier() {
    let qualifier = runtime("en").qualifier(&Qualifier::default()).unwrap();

    assert_eq!(
        qualifier,
        Qualifier::full("en", ScreenClass::Pc, ScreenColor::Color, Flavor::Generic)
    );
}

#[test]
fn RuntimeArgs___missing_axes___fall_back_to_config_context() {
    let args = RuntimeArgs {
        lang: Some("de".to_string()),
        ..RuntimeArgs::default()
    };
    let fallback = Qualifier::full("en", ScreenClass::Mini, ScreenColor::Gray, Flavor::List);

    let qualifier = args.qualifier(&fallback).unwrap();

    assert_eq!(qualifier.language(), Some("de"));
    assert_eq!(qualifier.screen_class(), Some(ScreenClass::Mini));
}

#[test]
fn RuntimeArgs___incomplete_context___is_error() {
    let args = RuntimeArgs {
        lang: Some("en".to_string()),
        ..RuntimeArgs::default()
    };

    let result = args.qualifier(&Qualifier::default());

    assert!(result.unwrap_err().to_string().contains("incomplete"));
}

#[test]
fn RuntimeArgs___unknown_screen___is_error() {
    let args = RuntimeArgs {
        screen: Some("tablet".to_string()),
        ..runtime("en")
    };

    let result = args.qualifier(&Qualifier::default());

    assert!(result.unwrap_err().to_string().contains("tablet"));
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn entries___lists_names_in_document_order() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir);
    let mut out = Vec::new();

    entries(&bundle, &mut out).unwrap();

    assert_eq!(output(out), "strings.items\nicons/lang__de/inbox.png\n");
}

#[test]
fn entries___unavailable_bundle___is_error() {
    let dir = TempDir::new().unwrap();
    let bundle = dir.path().join("broken.bundle");
    fs::write(&bundle, "not a bundle").unwrap();

    let result = entries(&bundle, &mut Vec::new());

    assert!(result.unwrap_err().to_string().contains("Bundle unavailable"));
}

#[test]
fn cat___decodes_binary_entry() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir);
    let mut out = Vec::new();

    cat(&bundle, "icons/lang__de/inbox.png", &mut out).unwrap();

    assert_eq!(out, b"\x89PNG\r\n");
}

#[test]
fn cat___unknown_entry___is_error() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir);

    let result = cat(&bundle, "missing.txt", &mut Vec::new());

    assert!(result.is_err());
}

#[test]
fn ids___lists_variants_and_reports_issues() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir);
    let mut out = Vec::new();
    let mut err = Vec::new();

    ids(&bundle, &BundleConfig::default(), &mut out, &mut err).unwrap();

    assert_eq!(output(out), "inbox\n  *\n  lang__de\n");
    let err = output(err);
    assert!(err.starts_with("warning: strings.items:2:"));
}

#[test]
fn resolve___prints_merged_fields() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir);
    let mut out = Vec::new();

    resolve(&bundle, "inbox", &runtime("de"), false, &BundleConfig::default(), &mut out).unwrap();

    let text = output(out);
    assert!(text.contains("qualifier: lang__de"));
    assert!(text.contains("label: Inbox"));
    assert!(text.contains("icon: internal:/icons/lang__de/inbox.png"));
    assert!(text.contains("app:route: /inbox"));
}

#[test]
fn resolve___json_output___parses() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir);
    let mut out = Vec::new();

    resolve(&bundle, "inbox", &runtime("en"), true, &BundleConfig::default(), &mut out).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["label"], "Inbox");
    assert_eq!(json["ordinal"], 3);
}

#[test]
fn resolve___unknown_id___prints_no_match() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir);
    let mut out = Vec::new();

    resolve(&bundle, "outbox", &runtime("en"), false, &BundleConfig::default(), &mut out).unwrap();

    assert!(output(out).starts_with("no match for outbox"));
}

#[test]
fn load_config___reads_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dashi.toml");
    fs::write(&path, "root = \"res\"\n[context]\nlanguage = \"fr\"\n").unwrap();

    let config = load_config(Some(path.as_path())).unwrap();

    assert_eq!(config.root, "res");
    assert_eq!(config.context.language(), Some("fr"));
}

#[test]
fn load_config___none___returns_default() {
    assert_eq!(load_config(None).unwrap(), BundleConfig::default());
}
