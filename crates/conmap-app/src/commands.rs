use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use conmap_config::Config;
use conmap_core::{DictionaryResource, LoadStats, PhrasesByLength, join_tokens};
use conmap_lang_english::EnglishTokenizerFactory;

use crate::cli::{Cli, Command};

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Load => {
            let config = cli.config()?;
            let (_, stats) = load_dictionary(&config)?;
            writeln!(out, "loaded {}", config.dictionary.locator)?;
            writeln!(out, "variants: {}", stats.variants)?;
            writeln!(out, "skipped: {}", stats.skipped)?;
            writeln!(out, "keys: {}", stats.keys)?;
        }
        Command::Lookup { keys } => {
            let (resource, _) = load_dictionary(&cli.config()?)?;
            print_lookups(&mut out, &resource, keys)?;
        }
        Command::Dump => {
            let (resource, _) = load_dictionary(&cli.config()?)?;
            write!(out, "{resource}")?;
        }
        Command::Snapshot { out: path } => {
            let (resource, _) = load_dictionary(&cli.config()?)?;
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            resource.serialize(&mut writer)?;
            writer.flush()?;
            tracing::info!("snapshot written to {}", path.display());
        }
        Command::Inspect { snapshot, keys } => inspect(&mut out, snapshot, keys)?,
    }

    Ok(())
}

fn load_dictionary(config: &Config) -> anyhow::Result<(DictionaryResource, LoadStats)> {
    let locator = &config.dictionary.locator;
    let mut resource =
        DictionaryResource::with_capacity(config.dictionary.initial_capacity).with_classpath(config.classpath());

    resource
        .load(locator)
        .with_context(|| format!("opening dictionary {locator}"))?;
    let stats = resource
        .load_contents(&config.load_options(), &EnglishTokenizerFactory)
        .with_context(|| format!("loading dictionary {locator}"))?;

    Ok((resource, stats))
}

fn inspect(out: &mut impl Write, snapshot: &Path, keys: &[String]) -> anyhow::Result<()> {
    let file = File::open(snapshot).with_context(|| format!("opening snapshot {}", snapshot.display()))?;
    let resource = DictionaryResource::deserialize(BufReader::new(file))
        .with_context(|| format!("reading snapshot {}", snapshot.display()))?;

    if keys.is_empty() {
        writeln!(out, "keys: {}", resource.index().len())?;
        writeln!(out, "order independent: {}", resource.is_order_independent())?;
        writeln!(out, "attributes: {}", resource.schema().names().join(", "))?;
        return Ok(());
    }
    print_lookups(out, &resource, keys)
}

fn print_lookups(out: &mut impl Write, resource: &DictionaryResource, keys: &[String]) -> anyhow::Result<()> {
    for key in keys {
        match resource.lookup(key) {
            Some(phrases) => print_phrases(out, key, phrases)?,
            None => writeln!(out, "{key}: no entries")?,
        }
    }
    Ok(())
}

/// One line per entry, longest first: elements, source order if kept, then attributes
fn print_phrases(out: &mut impl Write, key: &str, phrases: &PhrasesByLength) -> io::Result<()> {
    writeln!(out, "{key}:")?;
    for (length, group) in phrases.iter() {
        for entry in group.iter() {
            write!(out, "  [{length}] {}", join_tokens(entry.elements()))?;
            if let Some(unsorted) = entry.unsorted() {
                write!(out, " ({unsorted})")?;
            }
            for (name, value) in entry.properties().iter() {
                write!(out, " {name}={value}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use conmap_core::DictionarySource;

    use super::*;

    fn drinks_config(dir: &Path) -> Config {
        let path = dir.join("drinks.xml");
        std::fs::write(
            &path,
            r#"<synonym><token id="D1"><variant base="tea green"/><variant base="tea"/></token></synonym>"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.dictionary.initial_capacity = 8;
        config.matching.order_independent = true;
        config.dictionary.locator = DictionarySource::from_path(&path).unwrap().locator().to_string();
        config
    }

    #[test]
    fn test_print_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let (resource, stats) = load_dictionary(&drinks_config(dir.path())).unwrap();
        assert_eq!(stats.variants, 2);

        let mut out = Vec::new();
        print_lookups(&mut out, &resource, &["tea".to_string(), "coffee".to_string()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("tea:\n  [2] green tea (tea green) id=D1\n  [1] tea (tea) id=D1\n"));
        assert!(text.contains("coffee: no entries"));
    }

    #[test]
    fn test_inspect_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let (resource, _) = load_dictionary(&drinks_config(dir.path())).unwrap();

        let snapshot = dir.path().join("drinks.json");
        resource.serialize(File::create(&snapshot).unwrap()).unwrap();

        let mut out = Vec::new();
        inspect(&mut out, &snapshot, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("keys: 2"));
        assert!(text.contains("order independent: true"));
        assert!(text.contains("attributes: base"));

        let mut out = Vec::new();
        inspect(&mut out, &snapshot, &["green".to_string()]).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("green:\n  [2] green tea"));
    }

    #[test]
    fn test_missing_dictionary_is_reported() {
        let mut config = Config::default();
        config.dictionary.locator = "classpath:missing.xml".into();
        let err = load_dictionary(&config).err().unwrap();
        assert!(err.to_string().contains("opening dictionary classpath:missing.xml"));
    }
}
