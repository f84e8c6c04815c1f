use std::path::Path;

use ddev_config::{DatabaseDesc, DatabaseEngine, GlobalConfig, Project, XhprofMode};
use ddev_core::error::DdevError;
use ddev_provider::mock::MockProvider;
use ddev_provider::XHGUI_SERVICE;
use ddev_xhprof::Profiler;

fn project(engine: DatabaseEngine, version: &str) -> Project {
    let mut project = Project::new("xh", Path::new("/srv/xh"));
    project.database = Some(DatabaseDesc::new(engine, version));
    project.xhprof_mode = XhprofMode::Xhgui;
    project
}

#[test]
fn test_xhgui_setup_on_postgres_is_idempotent() {
    let project = project(DatabaseEngine::Postgres, "16");
    let global = GlobalConfig::default();
    let mock = MockProvider::running();
    let profiler = Profiler::new(&project, &global, &mock);

    profiler.xhgui_setup().unwrap();
    profiler.xhgui_setup().unwrap();

    assert_eq!(
        mock.state().databases.iter().collect::<Vec<_>>(),
        vec!["xhgui"]
    );
    assert!(profiler.status().unwrap());
    assert!(profiler.xhgui_status().unwrap());
}

#[test]
fn test_xhgui_setup_on_mariadb_is_idempotent() {
    let project = project(DatabaseEngine::Mariadb, "10.11");
    let global = GlobalConfig::default();
    let mock = MockProvider::running();
    let profiler = Profiler::new(&project, &global, &mock);

    profiler.xhgui_setup().unwrap();
    profiler.xhgui_setup().unwrap();

    assert_eq!(mock.state().databases.len(), 1);
    let starts = mock
        .calls()
        .iter()
        .filter(|c| c.starts_with("start_optional_profile"))
        .count();
    assert_eq!(starts, 1, "sidecar is only started when absent");
}

#[test]
fn test_xhgui_setup_order() {
    let project = project(DatabaseEngine::Mysql, "8.0");
    let global = GlobalConfig::default();
    let mock = MockProvider::running();
    Profiler::new(&project, &global, &mock).xhgui_setup().unwrap();

    let calls = mock.calls();
    let pos = |needle: &str| {
        calls
            .iter()
            .position(|c| c.starts_with(needle))
            .unwrap_or_else(|| panic!("missing call {needle}: {calls:?}"))
    };
    assert!(pos("exec db mysql -uroot -proot -e") < pos("exec web enable_xhprof"));
    assert!(pos("exec web enable_xhprof") < pos("start_optional_profile xhgui"));
    assert!(pos("start_optional_profile xhgui") < pos("ensure_service xhgui"));
    assert!(pos("ensure_service xhgui") < pos("sync_flush"));
}

#[test]
fn test_xhgui_sidecar_timeout() {
    let project = project(DatabaseEngine::Mariadb, "10.11");
    let global = GlobalConfig::default();
    let mock = MockProvider::running();
    mock.never_ready(XHGUI_SERVICE);
    let err = Profiler::new(&project, &global, &mock)
        .xhgui_setup()
        .unwrap_err();
    assert!(matches!(err, DdevError::Timeout(_)));
}

#[test]
fn test_disable_leaves_sidecar_running() {
    let project = project(DatabaseEngine::Mariadb, "10.11");
    let global = GlobalConfig::default();
    let mock = MockProvider::running();
    let profiler = Profiler::new(&project, &global, &mock);

    profiler.xhgui_setup().unwrap();
    profiler.xhgui_disable().unwrap();

    assert!(!profiler.status().unwrap());
    assert!(!profiler.xhgui_status().unwrap());
    assert!(mock.state().running.contains(XHGUI_SERVICE));
}

#[test]
fn test_xhgui_status_requires_xhgui_mode() {
    let mut project = project(DatabaseEngine::Mariadb, "10.11");
    project.xhprof_mode = XhprofMode::Prepend;
    let global = GlobalConfig::default();
    let mock = MockProvider::running();
    let profiler = Profiler::new(&project, &global, &mock);

    profiler.xhgui_setup().unwrap();
    assert!(profiler.status().unwrap());
    assert!(!profiler.xhgui_status().unwrap());
}

#[test]
fn test_xhgui_status_inherits_global_mode() {
    let mut project = project(DatabaseEngine::Mariadb, "10.11");
    project.xhprof_mode = XhprofMode::Empty;
    let mut global = GlobalConfig::default();
    global.xhprof_mode = XhprofMode::Xhgui;
    let mock = MockProvider::running();
    let profiler = Profiler::new(&project, &global, &mock);

    profiler.xhgui_setup().unwrap();
    assert!(profiler.xhgui_status().unwrap());
}

#[test]
fn test_xhgui_url_through_router() {
    let mut project = project(DatabaseEngine::Mariadb, "10.11");
    let global = GlobalConfig::default();
    let mock = MockProvider::running();

    assert_eq!(
        Profiler::new(&project, &global, &mock).xhgui_url().unwrap(),
        "https://xh.ddev.site:8142"
    );

    project.http_only = true;
    assert_eq!(
        Profiler::new(&project, &global, &mock).xhgui_url().unwrap(),
        "http://xh.ddev.site:8143"
    );
}

#[test]
fn test_xhgui_url_without_router() {
    let mut project = project(DatabaseEngine::Mariadb, "10.11");
    let mut global = GlobalConfig::default();
    global.router_enabled = false;
    let mock = MockProvider::running().with_docker_ip("192.168.5.2");

    assert_eq!(
        Profiler::new(&project, &global, &mock).xhgui_url().unwrap(),
        "http://192.168.5.2:8143"
    );

    project.xhgui_http_port = "9143".into();
    assert_eq!(
        Profiler::new(&project, &global, &mock).xhgui_url().unwrap(),
        "http://192.168.5.2:9143"
    );

    mock.set_env(XHGUI_SERVICE, "HTTP_EXPOSE", "7143:80,7142:443");
    assert_eq!(
        Profiler::new(&project, &global, &mock).xhgui_url().unwrap(),
        "http://192.168.5.2:7143"
    );
}
