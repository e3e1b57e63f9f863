//! Bundle inspection commands

use anyhow::{Context, Result, bail};
use dashi_bundle::{
    BundleConfig, BundleSource, Field, Flavor, Item, Qualifier, ScreenClass, ScreenColor, collate,
    open_path,
};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Runtime context axes given on the command line.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct RuntimeArgs {
    /// Language tag (e.g. en, de-AT)
    #[arg(long)]
    pub lang: Option<String>,

    /// Screen class (none, micro, mini, pc)
    #[arg(long)]
    pub screen: Option<String>,

    /// Screen color (other, mono, gray, color)
    #[arg(long)]
    pub color: Option<String>,

    /// Flavor (generic, navigation, item, list, error, modal, input)
    #[arg(long)]
    pub flavor: Option<String>,
}

impl RuntimeArgs {
    /// Build the runtime qualifier, taking unset axes from `fallback`.
    ///
    /// The result must be fully specified.
    pub fn qualifier(&self, fallback: &Qualifier) -> Result<Qualifier> {
        let mut qualifier = Qualifier::default();
        if let Some(lang) = &self.lang {
            if lang.trim().is_empty() {
                bail!("Language must not be empty");
            }
            qualifier = qualifier.with_language(lang.trim());
        }
        if let Some(screen) = &self.screen {
            let screen = ScreenClass::parse(screen)
                .with_context(|| format!("Unknown screen class: {screen}"))?;
            qualifier = qualifier.with_screen_class(screen);
        }
        if let Some(color) = &self.color {
            let color = ScreenColor::parse(color)
                .with_context(|| format!("Unknown screen color: {color}"))?;
            qualifier = qualifier.with_screen_color(color);
        }
        if let Some(flavor) = &self.flavor {
            let flavor =
                Flavor::parse(flavor).with_context(|| format!("Unknown flavor: {flavor}"))?;
            qualifier = qualifier.with_flavor(flavor);
        }

        let qualifier = qualifier.or_else_from(fallback);
        if !qualifier.is_fully_specified() {
            bail!(
                "Runtime context {qualifier} is incomplete: give --lang, --screen, --color and \
                 --flavor, or set them in the config context"
            );
        }
        Ok(qualifier)
    }
}

/// Read a TOML configuration file, or use defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<BundleConfig> {
    let Some(path) = path else {
        return Ok(BundleConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    BundleConfig::from_toml(&text)
        .with_context(|| format!("Invalid config: {}", path.display()))
}

fn open_available(bundle: &Path) -> Result<Box<dyn BundleSource>> {
    let source =
        open_path(bundle).with_context(|| format!("Failed to open: {}", bundle.display()))?;
    if !source.available() {
        bail!("Bundle unavailable: {}", bundle.display());
    }
    Ok(source)
}

/// List raw entry names.
pub fn entries(bundle: &Path, out: &mut impl Write) -> Result<()> {
    let source = open_available(bundle)?;
    for name in source.names() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Write one entry's decoded bytes.
pub fn cat(bundle: &Path, entry: &str, out: &mut impl Write) -> Result<()> {
    let source = open_available(bundle)?;
    let content = source
        .open(entry)
        .with_context(|| format!("Failed to read entry: {entry}"))?;
    out.write_all(&content.into_bytes())?;
    Ok(())
}

/// List identifiers with their variant qualifiers. Issues go to `err`.
pub fn ids(
    bundle: &Path,
    config: &BundleConfig,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let source = open_available(bundle)?;
    let collation = collate(source.as_ref(), &config.collation_options())
        .with_context(|| format!("Failed to collate: {}", bundle.display()))?;

    for id in collation.index.ids() {
        let Some(list) = collation.index.get(id) else {
            continue;
        };
        writeln!(out, "{id}")?;
        for variant in list.variants() {
            writeln!(out, "  {}", variant.qualifier())?;
        }
    }
    for issue in &collation.issues {
        writeln!(err, "warning: {issue}")?;
    }
    Ok(())
}

/// Resolve `id` and print the merged item.
pub fn resolve(
    bundle: &Path,
    id: &str,
    runtime: &RuntimeArgs,
    json: bool,
    config: &BundleConfig,
    out: &mut impl Write,
) -> Result<()> {
    let qualifier = runtime.qualifier(&config.context)?;
    let source = open_available(bundle)?;
    let collation = collate(source.as_ref(), &config.collation_options())
        .with_context(|| format!("Failed to collate: {}", bundle.display()))?;
    tracing::debug!(id, runtime = %qualifier, "resolving");

    let item = collation
        .index
        .resolve(id, &qualifier)
        .with_context(|| format!("Failed to resolve: {id}"))?;

    match item {
        Some(item) if json => {
            serde_json::to_writer_pretty(&mut *out, &item)?;
            writeln!(out)?;
        }
        Some(item) => write_item(out, &item)?,
        None if json => writeln!(out, "null")?,
        None => writeln!(out, "no match for {id} at {qualifier}")?,
    }
    Ok(())
}

fn write_item(out: &mut impl Write, item: &Item) -> std::io::Result<()> {
    writeln!(out, "qualifier: {}", item.qualifier())?;
    for field in Field::all() {
        let value = item.field(*field);
        if !value.is_empty() {
            writeln!(out, "{field}: {value}")?;
        }
    }
    for (key, value) in item.extras() {
        writeln!(out, "{key}: {value}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "inspect/inspect_tests.rs"]
mod inspect_tests;
