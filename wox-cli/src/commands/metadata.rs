//! Validate a plugin descriptor

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use wox_core::plugins::parse_plugin_metadata;
use wox_plugin_api::Metadata;

#[derive(Args)]
pub struct MetadataArgs {
    /// Path to a plugin.json
    pub path: PathBuf,
}

pub fn run(args: MetadataArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let metadata = parse_plugin_metadata(&raw)
        .with_context(|| format!("Invalid plugin descriptor {}", args.path.display()))?;

    print!("{}", describe(&metadata));
    Ok(())
}

fn describe(m: &Metadata) -> String {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    let mut out = String::new();
    out.push_str(&format!("Id:          {}\n", m.id));
    out.push_str(&format!("Name:        {}\n", m.name));
    out.push_str(&format!("Version:     {}\n", or_dash(&m.version)));
    out.push_str(&format!("Author:      {}\n", or_dash(&m.author)));
    out.push_str(&format!(
        "Runtime:     {} ({:?})\n",
        m.runtime,
        m.runtime.kind()
    ));
    out.push_str(&format!("Keywords:    {}\n", m.trigger_keywords.join(" ")));
    out.push_str(&format!("Website:     {}\n", or_dash(&m.website)));
    if !m.commands.is_empty() {
        out.push_str("\nCommands:\n");
        for cmd in &m.commands {
            out.push_str(&format!("  {}    {}\n", cmd.command, cmd.description));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WPM: &str = r#"{
        "Id": "e2c5f005-wpm",
        "Name": "Wox Plugin Manager",
        "Author": "Wox Launcher",
        "Version": "1.0.0",
        "Runtime": "GO",
        "TriggerKeywords": ["wpm"],
        "Commands": [
            { "Command": "install", "Description": "Install plugins" },
            { "Command": "uninstall", "Description": "Uninstall plugins" }
        ]
    }"#;

    #[test]
    fn test_describe_lists_commands() {
        let metadata = parse_plugin_metadata(WPM).unwrap();
        let text = describe(&metadata);
        assert!(text.contains("Wox Plugin Manager"));
        assert!(text.contains("InProcess"));
        assert!(text.contains("install    Install plugins"));
        assert!(text.contains("Website:     -"));
    }

    #[test]
    fn test_run_reports_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plugin.json");
        std::fs::write(&path, WPM.replace("[\"wpm\"]", "[]")).unwrap();

        let err = run(MetadataArgs { path }).unwrap_err();
        assert!(err.to_string().contains("Invalid plugin descriptor"));
    }

    #[test]
    fn test_run_missing_file() {
        let err = run(MetadataArgs {
            path: PathBuf::from("/nonexistent/plugin.json"),
        })
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
