use crate::config::Config;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML source configuration
    #[arg(long, default_value = "config/sources.yaml")]
    pub config: PathBuf,

    /// Override the artifact path from the config file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(&self.config)?;
        if let Some(output) = self.output {
            config.artifact.path = output;
        }
        Ok(config)
    }
}
