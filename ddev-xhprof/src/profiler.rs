//! XHProf extension control and the XHGui lifecycle.

use tracing::{debug, info, instrument};

use crate::ports::resolve_xhgui_ports;
use crate::xhgui::xhgui_database_command;
use ddev_config::{GlobalConfig, Project, WebserverType, XhprofMode};
use ddev_core::error::{DdevError, Result};
use ddev_provider::{
    describe_urls, Provider, DB_SERVICE, WEB_SERVICE, XHGUI_SERVICE, XHGUI_READY_TIMEOUT,
};

/// PHP one-liner printing whether the extension is loaded.
pub const XHPROF_LOADED_CHECK: &str = r#"echo extension_loaded("xhprof") ? "true" : "false";"#;

const ENABLE_COMMAND: &str = "enable_xhprof";
const DISABLE_COMMAND: &str = "disable_xhprof";

/// Project mode, with `""` and `global` resolved against the global config.
pub fn effective_mode(project: &Project, global: &GlobalConfig) -> XhprofMode {
    if project.xhprof_mode.defers_to_global() {
        global.xhprof_mode
    } else {
        project.xhprof_mode
    }
}

/// XHProf is a PHP extension; python stacks have nothing to load it into.
pub fn ensure_supported(project: &Project) -> Result<()> {
    if project.webserver_type == Some(WebserverType::NginxGunicorn) {
        return Err(DdevError::ProfilerUnsupported(format!(
            "webserver_type {} does not run PHP",
            WebserverType::NginxGunicorn
        )));
    }
    if let Some(app_type) = project.app_type.filter(|t| t.is_python()) {
        return Err(DdevError::ProfilerUnsupported(format!(
            "app type {app_type} does not run PHP"
        )));
    }
    Ok(())
}

/// Profiler controller bound to one project and its provider.
pub struct Profiler<'a> {
    project: &'a Project,
    global: &'a GlobalConfig,
    provider: &'a dyn Provider,
}

impl<'a> Profiler<'a> {
    pub fn new(project: &'a Project, global: &'a GlobalConfig, provider: &'a dyn Provider) -> Self {
        Self {
            project,
            global,
            provider,
        }
    }

    pub fn mode(&self) -> XhprofMode {
        effective_mode(self.project, self.global)
    }

    fn web_exec(&self, argv: &[&str], what: &str) -> Result<String> {
        let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        let output = self
            .provider
            .exec(self.project, WEB_SERVICE, &argv)?
            .check(what)?;
        Ok(output.stdout)
    }

    /// Whether the extension is loaded in the web container.
    pub fn status(&self) -> Result<bool> {
        ensure_supported(self.project)?;
        let stdout = self.web_exec(&["php", "-r", XHPROF_LOADED_CHECK], "xhprof status check")?;
        match stdout.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(DdevError::Command(format!(
                "unexpected xhprof status output: '{other}'"
            ))),
        }
    }

    #[instrument(skip(self), fields(project = %self.project.name))]
    pub fn enable(&self) -> Result<()> {
        ensure_supported(self.project)?;
        self.web_exec(&[ENABLE_COMMAND], ENABLE_COMMAND)?;
        if !self.status()? {
            return Err(DdevError::Command(
                "xhprof is still not loaded after enable_xhprof".to_string(),
            ));
        }
        info!(mode = %self.mode(), "xhprof enabled");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.project.name))]
    pub fn disable(&self) -> Result<()> {
        ensure_supported(self.project)?;
        self.web_exec(&[DISABLE_COMMAND], DISABLE_COMMAND)?;
        if self.status()? {
            return Err(DdevError::Command(
                "xhprof is still loaded after disable_xhprof".to_string(),
            ));
        }
        info!("xhprof disabled");
        Ok(())
    }

    /// Create the xhgui database, enable the extension and bring up the
    /// sidecar. Safe to repeat.
    #[instrument(skip(self), fields(project = %self.project.name, engine = %self.project.database_engine()))]
    pub fn xhgui_setup(&self) -> Result<()> {
        ensure_supported(self.project)?;

        let argv = xhgui_database_command(self.project);
        self.provider
            .exec(self.project, DB_SERVICE, &argv)?
            .check("xhgui database setup")?;
        debug!("xhgui database ready");

        self.enable()?;

        if self.provider.service_exists(self.project, XHGUI_SERVICE)? {
            debug!("xhgui sidecar already present");
        } else {
            self.provider
                .start_optional_profile(self.project, &[XHGUI_SERVICE])?;
        }
        self.provider
            .ensure_service(self.project, XHGUI_SERVICE, XHGUI_READY_TIMEOUT)?;
        self.provider.sync_flush(self.project)?;
        info!("xhgui active");
        Ok(())
    }

    /// Stop profiling; the sidecar keeps running so collected runs stay browsable.
    pub fn xhgui_disable(&self) -> Result<()> {
        self.disable()
    }

    pub fn xhgui_status(&self) -> Result<bool> {
        if self.mode() != XhprofMode::Xhgui {
            return Ok(false);
        }
        if !self.status()? {
            return Ok(false);
        }
        self.provider.service_exists(self.project, XHGUI_SERVICE)
    }

    /// Where the xhgui UI is reachable from the host.
    pub fn xhgui_url(&self) -> Result<String> {
        if self.global.router_enabled {
            let urls = describe_urls(self.project, self.global);
            return Ok(if self.project.http_only {
                urls.xhgui_url
            } else {
                urls.xhgui_https_url
            });
        }
        let (http_port, _) = resolve_xhgui_ports(self.project, self.global, self.provider)?;
        Ok(format!("http://{}:{}", self.provider.docker_ip()?, http_port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddev_config::AppType;
    use ddev_provider::mock::MockProvider;
    use std::path::Path;

    fn project() -> Project {
        Project::new("prof", Path::new("/srv/prof"))
    }

    #[test]
    fn test_effective_mode() {
        let mut p = project();
        let mut global = GlobalConfig::default();
        global.xhprof_mode = XhprofMode::Xhgui;
        assert_eq!(effective_mode(&p, &global), XhprofMode::Xhgui);
        p.xhprof_mode = XhprofMode::Global;
        assert_eq!(effective_mode(&p, &global), XhprofMode::Xhgui);
        p.xhprof_mode = XhprofMode::Prepend;
        assert_eq!(effective_mode(&p, &global), XhprofMode::Prepend);
    }

    #[test]
    fn test_unsupported_projects() {
        let mut p = project();
        assert!(ensure_supported(&p).is_ok());
        p.app_type = Some(AppType::Django4);
        assert!(matches!(
            ensure_supported(&p),
            Err(DdevError::ProfilerUnsupported(_))
        ));
        p.app_type = Some(AppType::Php);
        p.webserver_type = Some(WebserverType::NginxGunicorn);
        assert!(matches!(
            ensure_supported(&p),
            Err(DdevError::ProfilerUnsupported(_))
        ));
    }

    #[test]
    fn test_unsupported_project_never_reaches_provider() {
        let mut p = project();
        p.app_type = Some(AppType::Python);
        let global = GlobalConfig::default();
        let mock = MockProvider::running();
        assert!(Profiler::new(&p, &global, &mock).enable().is_err());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_enable_then_disable() {
        let p = project();
        let global = GlobalConfig::default();
        let mock = MockProvider::running();
        let profiler = Profiler::new(&p, &global, &mock);

        assert!(!profiler.status().unwrap());
        profiler.enable().unwrap();
        assert!(profiler.status().unwrap());
        profiler.disable().unwrap();
        assert!(!profiler.status().unwrap());
    }

    #[test]
    fn test_enable_fails_when_extension_check_disagrees() {
        let p = project();
        let global = GlobalConfig::default();
        let mock = MockProvider::running();
        mock.fail_on("extension_loaded");
        let err = Profiler::new(&p, &global, &mock).enable().unwrap_err();
        assert!(matches!(err, DdevError::Command(_)));
    }

    #[test]
    fn test_status_needs_running_web() {
        let p = project();
        let global = GlobalConfig::default();
        let mock = MockProvider::new();
        assert!(Profiler::new(&p, &global, &mock).status().is_err());
    }
}
