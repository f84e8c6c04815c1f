use std::env;
use std::fs;

use ddev_config::types::XhprofMode;
use ddev_config::GlobalConfig;
use serial_test::serial;
use tempfile::TempDir;

/// Points DDEV_GLOBAL_DIR at a temp directory for the lifetime of the fixture
struct GlobalDirFixture {
    dir: TempDir,
}

impl GlobalDirFixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        env::set_var("DDEV_GLOBAL_DIR", dir.path());
        Self { dir }
    }

    fn write_config(&self, content: &str) {
        fs::write(self.dir.path().join("global_config.yaml"), content).expect("write config");
    }
}

impl Drop for GlobalDirFixture {
    fn drop(&mut self) {
        env::remove_var("DDEV_GLOBAL_DIR");
    }
}

#[test]
#[serial]
fn test_missing_global_config_uses_defaults() {
    let _fixture = GlobalDirFixture::new();

    let config = GlobalConfig::load().unwrap();
    assert_eq!(config.xhgui_http_port, "8143");
    assert_eq!(config.xhgui_https_port, "8142");
    assert_eq!(config.xhprof_mode, XhprofMode::Prepend);
    assert!(config.router_enabled);
    assert_eq!(config.project_tld, "ddev.site");
}

#[test]
#[serial]
fn test_global_config_overrides() {
    let fixture = GlobalDirFixture::new();
    fixture.write_config(
        "xhprof_mode: xhgui\nxhgui_http_port: \"9143\"\nrouter_enabled: false\nfuture_key: 1\n",
    );

    let config = GlobalConfig::load().unwrap();
    assert_eq!(config.xhprof_mode, XhprofMode::Xhgui);
    assert_eq!(config.xhgui_http_port, "9143");
    assert_eq!(config.xhgui_https_port, "8142");
    assert!(!config.router_enabled);
    assert!(config.extra.contains_key("future_key"));
}

#[test]
#[serial]
fn test_global_mode_cannot_defer() {
    let fixture = GlobalDirFixture::new();
    fixture.write_config("xhprof_mode: global\nxhgui_https_port: \"\"\n");

    let config = GlobalConfig::load().unwrap();
    assert_eq!(config.xhprof_mode, XhprofMode::Prepend);
    assert_eq!(config.xhgui_https_port, "8142");
}

#[test]
#[serial]
fn test_invalid_global_config_is_a_config_error() {
    let fixture = GlobalDirFixture::new();
    fixture.write_config("xhprof_mode: [not, a, mode]\n");

    let err = GlobalConfig::load().unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}
