//! Container collaborator abstraction.
//!
//! The core never talks to docker directly. Everything it needs from the
//! running stack (exec in a service, starting a compose profile, waiting for a
//! service, reading a service's environment) goes through [`Provider`].

use std::time::Duration;

use ddev_config::Project;
use ddev_core::command_stream::ExecOutput;
use ddev_core::error::{DdevError, Result};

pub mod describe;
#[cfg(feature = "docker")]
pub mod docker;
pub mod mkcert;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use describe::{describe_urls, DescribeUrls};

pub const WEB_SERVICE: &str = "web";
pub const DB_SERVICE: &str = "db";
pub const XHGUI_SERVICE: &str = "xhgui";

/// Upper bound for the web container to report ready after `compose_up`.
pub const WEB_READY_TIMEOUT: Duration = Duration::from_secs(60);
/// Upper bound for the xhgui sidecar to report ready after its profile starts.
pub const XHGUI_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the core needs from the container runtime.
pub trait Provider {
    /// Get the name of the provider (e.g., "docker", "mock").
    fn name(&self) -> &'static str;

    /// Run `argv` inside `service`. A non-zero exit is `DdevError::Command`.
    fn exec(&self, project: &Project, service: &str, argv: &[String]) -> Result<ExecOutput>;

    /// Bring up the project's default services.
    fn compose_up(&self, project: &Project) -> Result<()>;

    /// Stop and remove the project's containers.
    fn compose_down(&self, project: &Project) -> Result<()>;

    /// Start services that only run under the given compose profiles.
    fn start_optional_profile(&self, project: &Project, profiles: &[&str]) -> Result<()>;

    /// Wait until `service` is running and healthy; `DdevError::Timeout` past `timeout`.
    fn ensure_service(&self, project: &Project, service: &str, timeout: Duration) -> Result<()>;

    /// Whether `service` currently has a running container.
    fn service_exists(&self, project: &Project, service: &str) -> Result<bool>;

    /// Value of environment variable `key` in the `service` container.
    fn service_env(&self, project: &Project, service: &str, key: &str) -> Result<Option<String>>;

    /// Make host and container file views agree before reading results.
    fn sync_flush(&self, project: &Project) -> Result<()>;

    /// Address on which published container ports are reachable from the host.
    fn docker_ip(&self) -> Result<String>;
}

/// Select a provider by name. `DDEV_PROVIDER` is consulted by the binary;
/// the default is docker.
pub fn get_provider(name: Option<&str>) -> Result<Box<dyn Provider>> {
    let provider_name = name.unwrap_or("docker");

    #[cfg(any(test, feature = "test-helpers"))]
    if provider_name == "mock" {
        return Ok(Box::new(mock::MockProvider::new()));
    }

    match provider_name {
        #[cfg(feature = "docker")]
        "docker" => Ok(Box::new(docker::DockerProvider::new())),
        _ => Err(DdevError::Config(format!(
            "Unknown provider: {provider_name}"
        ))),
    }
}
