use std::fs;

use anyhow::Result;
use shell_config::{ConfigError, ShellConfig};

#[test]
fn loads_overrides_from_file() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("appshell.toml");
    fs::write(
        &path,
        r##"
        [selectors]
        wrapper = "#shell"
        library_headers = [".banner"]

        [handoff]
        delay_ms = 500

        [demo]
        fixture = "pages/library.json"
        "##,
    )?;

    let config = ShellConfig::load_from_file(&path)?;
    assert_eq!(config.selectors.wrapper, "#shell");
    assert_eq!(config.selectors.library_headers, vec![".banner".to_string()]);
    assert_eq!(config.selectors.toggle_nav, ".toggle-nav");
    assert_eq!(config.handoff.delay_ms, 500);
    assert_eq!(config.handoff.tile_z_index, 100);
    assert_eq!(
        config.demo.fixture.as_deref(),
        Some(std::path::Path::new("pages/library.json"))
    );
    Ok(())
}

#[test]
fn missing_file_reports_path() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("absent.toml");

    match ShellConfig::load_from_file(&path) {
        Err(ConfigError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected read error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_parse_error() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("broken.toml");
    fs::write(&path, "[library\ncolumn_width = 1")?;

    assert!(matches!(
        ShellConfig::load_from_file(&path),
        Err(ConfigError::Parse(_))
    ));
    Ok(())
}
