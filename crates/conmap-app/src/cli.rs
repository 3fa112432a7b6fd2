use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use conmap_config::Config;

/// Phrase dictionary loader and inspector
#[derive(Parser, Debug)]
#[command(name = "conmap", version)]
pub struct Cli {
    /// JSON config file; `CONMAP_*` variables still apply on top of it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Dictionary locator, `classpath:<path>` or `file:<absolute path>`
    #[arg(long, global = true)]
    pub dictionary: Option<String>,

    /// Case folding policy: insensitive, digitfold or ignoreall
    #[arg(long, global = true)]
    pub case_match: Option<String>,

    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Index every token of each phrase; `--order-independent=false` turns it off
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub order_independent: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the dictionary and print statistics
    Load,
    /// Load the dictionary and print the phrases reachable from each key
    Lookup {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Load the dictionary and print the full index
    Dump,
    /// Load the dictionary and write a snapshot
    Snapshot { out: PathBuf },
    /// Restore a snapshot and look up keys in it
    Inspect {
        snapshot: PathBuf,
        keys: Vec<String>,
    },
}

impl Cli {
    /// Config file (or defaults), then environment, then flags
    pub fn config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?
                .with_env(),
            None => Config::new(),
        };
        Ok(self.apply_flags(config))
    }

    fn apply_flags(&self, mut config: Config) -> Config {
        if let Some(locator) = &self.dictionary {
            config.dictionary.locator = locator.clone();
        }
        if let Some(case_match) = &self.case_match {
            config.matching.case_match = Some(case_match.clone());
        }
        if let Some(language) = &self.language {
            config.matching.language = language.clone();
        }
        if let Some(order_independent) = self.order_independent {
            config.matching.order_independent = order_independent;
        }
        config
    }
}
