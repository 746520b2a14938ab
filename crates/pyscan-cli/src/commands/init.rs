//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# pyscan configuration

# Rule preset: "recommended" (default) or "strict"
preset = "recommended"

[lexer]
# Columns a tab advances to (next multiple of this width)
tab_width = 8

[rules.too-many-parameters]
enabled = true
max_parameters = 5

[rules.deep-nesting]
enabled = true
max_depth = 3
# Count only if/elif/else blocks, not loops or with-blocks
conditionals_only = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("pyscan.toml"), force)?;

    println!("Created pyscan.toml");
    println!("\nNext steps:");
    println!("  1. Edit pyscan.toml to configure rules");
    println!("  2. Run: pyscan check <file>");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscan::Config;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_recommended_thresholds() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.lexer.tab_width, 8);
        assert_eq!(
            config
                .rule("too-many-parameters")
                .map(|r| r.get_usize("max_parameters", 0)),
            Some(5)
        );
        assert_eq!(
            config.rule("deep-nesting").map(|r| r.get_usize("max_depth", 0)),
            Some(3)
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pyscan.toml");
        std::fs::write(&path, "preset = \"strict\"\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "preset = \"strict\"\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
