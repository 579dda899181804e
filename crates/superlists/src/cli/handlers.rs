//! Command handlers for the `superlists` binary.
//!
//! Each handler writes its report to `out` and returns the library error
//! when the command fails, so the binary exits non-zero.

use std::io::Write;
use std::path::PathBuf;

use crate::cli::{ConfigCommand, ItemsCommand, ServeCommand};
use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

/// Load the configuration for `serve`, apply `--bind` and validate the result.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, or if the bind
/// address is still invalid after overrides.
pub fn serve_config(config_path: Option<PathBuf>, cmd: &ServeCommand) -> Result<Config> {
    let mut config = Config::load_raw(config_path)?;
    if let Some(bind) = &cmd.bind {
        config.server.bind_addr.clone_from(bind);
    }
    config.validate()?;
    Ok(config)
}

/// Run an `items` subcommand against the configured database.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried, or if
/// writing the output fails.
pub fn handle_items(config: &Config, cmd: ItemsCommand, out: &mut impl Write) -> Result<()> {
    let storage = Storage::open(config.database_path())?;

    match cmd {
        ItemsCommand::List { json } => {
            let items = storage.all()?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
            } else if items.is_empty() {
                writeln!(out, "The list is empty.")?;
            } else {
                for (index, item) in items.iter().enumerate() {
                    writeln!(out, "{}: {}", index + 1, item.text)?;
                }
            }
        }
        ItemsCommand::Add { text } => {
            let item = storage.create(text)?;
            writeln!(out, "Added item {}", item.id.unwrap_or_default())?;
        }
        ItemsCommand::Clear { yes } => {
            if yes {
                let deleted = storage.clear()?;
                writeln!(out, "Deleted {deleted} items.")?;
            } else {
                writeln!(
                    out,
                    "This will delete all {} items from {}.",
                    storage.count()?,
                    storage.path().display()
                )?;
                writeln!(out, "Use --yes to confirm.")?;
            }
        }
    }
    Ok(())
}

/// Run a `config` subcommand.
///
/// `config_path` is the global `--config` value. `show` reports the loaded
/// values without validating them, `path` needs no loading at all.
///
/// # Errors
///
/// Returns an error if `show` cannot load the configuration, if `validate`
/// finds the file invalid, or if writing the output fails.
pub fn handle_config(
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_raw(config_path)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Server]")?;
                writeln!(out, "  Bind address:       {}", config.server.bind_addr)?;
                writeln!(out)?;
                writeln!(out, "[Storage]")?;
                writeln!(
                    out,
                    "  Database path:      {}",
                    config.database_path().display()
                )?;
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            writeln!(out, "{}", path.display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            Config::load_from(Some(path))?;
            writeln!(out, "Configuration is valid.")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::{NamedTempFile, TempDir};

    use super::*;
    use crate::error::Error;

    fn temp_config() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.database_path = Some(dir.path().join("db.sqlite3"));
        (dir, config)
    }

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{contents}").unwrap();
        file
    }

    fn run_items(config: &Config, cmd: ItemsCommand) -> String {
        let mut out = Vec::new();
        handle_items(config, cmd, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn run_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> Result<String> {
        let mut out = Vec::new();
        handle_config(config_path, cmd, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_items_list_empty() {
        let (_dir, config) = temp_config();

        let output = run_items(&config, ItemsCommand::List { json: false });

        assert_eq!(output, "The list is empty.\n");
    }

    #[test]
    fn test_items_add_then_list() {
        let (_dir, config) = temp_config();

        let added = run_items(
            &config,
            ItemsCommand::Add {
                text: "Buy peacock feathers".to_string(),
            },
        );
        run_items(
            &config,
            ItemsCommand::Add {
                text: "Make a fly".to_string(),
            },
        );
        let listed = run_items(&config, ItemsCommand::List { json: false });

        assert_eq!(added, "Added item 1\n");
        assert_eq!(listed, "1: Buy peacock feathers\n2: Make a fly\n");
    }

    #[test]
    fn test_items_list_json() {
        let (_dir, config) = temp_config();
        run_items(
            &config,
            ItemsCommand::Add {
                text: "Buy milk".to_string(),
            },
        );

        let output = run_items(&config, ItemsCommand::List { json: true });

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["text"], "Buy milk");
        assert_eq!(value[0]["id"], 1);
    }

    #[test]
    fn test_items_add_blank_fails() {
        let (_dir, config) = temp_config();
        let mut out = Vec::new();

        let result = handle_items(
            &config,
            ItemsCommand::Add {
                text: "   ".to_string(),
            },
            &mut out,
        );

        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_items_clear_without_yes_keeps_items() {
        let (_dir, config) = temp_config();
        run_items(
            &config,
            ItemsCommand::Add {
                text: "keep me".to_string(),
            },
        );

        let output = run_items(&config, ItemsCommand::Clear { yes: false });

        assert!(output.contains("This will delete all 1 items"));
        assert!(output.contains("Use --yes to confirm."));
        let storage = Storage::open(config.database_path()).unwrap();
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_items_clear_with_yes_deletes_items() {
        let (_dir, config) = temp_config();
        run_items(&config, ItemsCommand::Add { text: "a".to_string() });
        run_items(&config, ItemsCommand::Add { text: "b".to_string() });

        let output = run_items(&config, ItemsCommand::Clear { yes: true });

        assert_eq!(output, "Deleted 2 items.\n");
        assert_eq!(
            run_items(&config, ItemsCommand::List { json: false }),
            "The list is empty.\n"
        );
    }

    #[test]
    fn test_serve_bind_overrides_bad_config() {
        let file = config_file("[server]\nbind_addr = \"nonsense\"");
        let cmd = ServeCommand {
            bind: Some("127.0.0.1:9000".to_string()),
        };

        let config = serve_config(Some(file.path().to_path_buf()), &cmd).unwrap();

        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_serve_without_bind_rejects_bad_config() {
        let file = config_file("[server]\nbind_addr = \"nonsense\"");
        let cmd = ServeCommand { bind: None };

        let result = serve_config(Some(file.path().to_path_buf()), &cmd);

        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_serve_rejects_bad_bind_flag() {
        let cmd = ServeCommand {
            bind: Some("not an address".to_string()),
        };

        let result = serve_config(Some(PathBuf::from("/nonexistent/config.toml")), &cmd);

        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_validate_good_file() {
        let file = config_file("[server]\nbind_addr = \"127.0.0.1:9000\"");

        let output = run_config(
            None,
            ConfigCommand::Validate {
                file: Some(file.path().to_path_buf()),
            },
        )
        .unwrap();

        assert!(output.starts_with("Validating configuration:"));
        assert!(output.ends_with("Configuration is valid.\n"));
    }

    #[test]
    fn test_config_validate_bad_file_is_error() {
        let file = config_file("[server]\nbind_addr = \"nonsense\"");

        let result = run_config(
            None,
            ConfigCommand::Validate {
                file: Some(file.path().to_path_buf()),
            },
        );

        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_validate_file_ignores_bad_global_config() {
        let bad = config_file("[server]\nbind_addr = \"nonsense\"");
        let good = config_file("[server]\nbind_addr = \"127.0.0.1:9000\"");

        let result = run_config(
            Some(bad.path().to_path_buf()),
            ConfigCommand::Validate {
                file: Some(good.path().to_path_buf()),
            },
        );

        assert!(result.is_ok());
    }

    #[test]
    fn test_config_validate_uses_global_config() {
        let bad = config_file("[server]\nbind_addr = \"nonsense\"");

        let result = run_config(
            Some(bad.path().to_path_buf()),
            ConfigCommand::Validate { file: None },
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_config_show_json_with_bad_bind_addr() {
        let file = config_file("[server]\nbind_addr = \"nonsense\"");

        let output = run_config(
            Some(file.path().to_path_buf()),
            ConfigCommand::Show { json: true },
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["server"]["bind_addr"], "nonsense");
    }

    #[test]
    fn test_config_show_text() {
        let output = run_config(
            Some(PathBuf::from("/nonexistent/config.toml")),
            ConfigCommand::Show { json: false },
        )
        .unwrap();

        assert!(output.starts_with("Current Configuration\n"));
        assert!(output.contains("Bind address:       127.0.0.1:8000"));
    }

    #[test]
    fn test_config_path_prefers_global_config() {
        let output = run_config(
            Some(PathBuf::from("/custom/config.toml")),
            ConfigCommand::Path,
        )
        .unwrap();

        assert_eq!(output, "/custom/config.toml\n");
    }
}
