use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use photokit_core::config::ProjectConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Include example standard stars
    #[arg(long)]
    pub example: bool,

    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a full default ProjectConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = if args.example {
        ProjectConfig::example()
    } else {
        ProjectConfig::default()
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
