//! Docker implementation of [`Provider`].
//!
//! Containers follow the `ddev-<project>-<service>` naming scheme and compose
//! runs against the project's rendered `.ddev/.ddev-docker-compose-full.yaml`.

use std::env;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::Provider;
use ddev_config::project::CONFIG_DIR;
use ddev_config::Project;
use ddev_core::command_stream::{run_captured, ExecOutput};
use ddev_core::error::{DdevError, Result};

pub const COMPOSE_FILE: &str = ".ddev-docker-compose-full.yaml";

const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub fn container_name(project: &Project, service: &str) -> String {
    format!("ddev-{}-{}", project.name, service)
}

pub fn compose_project_name(project: &Project) -> String {
    format!("ddev-{}", project.name.to_lowercase())
}

/// Builder for `docker compose` invocations scoped to one project.
#[derive(Debug, Clone)]
pub struct ComposeCommand {
    args: Vec<String>,
}

impl ComposeCommand {
    pub fn new(project: &Project) -> Self {
        let compose_file = project.approot.join(CONFIG_DIR).join(COMPOSE_FILE);
        Self {
            args: vec![
                "compose".to_string(),
                "-p".to_string(),
                compose_project_name(project),
                "-f".to_string(),
                compose_file.to_string_lossy().to_string(),
            ],
        }
    }

    pub fn profile(mut self, profile: &str) -> Self {
        self.args.push("--profile".to_string());
        self.args.push(profile.to_string());
        self
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn build_args(&self) -> &[String] {
        &self.args
    }

    pub fn execute(self, what: &str) -> Result<()> {
        docker(&self.args)?.check(what)?;
        Ok(())
    }
}

fn docker(args: &[String]) -> Result<ExecOutput> {
    run_captured("docker", args)
}

#[derive(Debug, Default)]
pub struct DockerProvider;

impl DockerProvider {
    pub fn new() -> Self {
        Self
    }

    fn inspect(&self, container: &str, format: &str) -> Result<Option<String>> {
        let args = vec![
            "inspect".to_string(),
            "-f".to_string(),
            format.to_string(),
            container.to_string(),
        ];
        inspect_result(docker(&args)?, container)
    }
}

/// A missing container is `None`; any other inspect failure is an error.
fn inspect_result(output: ExecOutput, container: &str) -> Result<Option<String>> {
    if output.success() {
        return Ok(Some(output.stdout.trim().to_string()));
    }
    if is_missing_container(&output.stderr) {
        return Ok(None);
    }
    output.check(&format!("docker inspect {}", container))?;
    Ok(None)
}

fn is_missing_container(stderr: &str) -> bool {
    stderr.contains("No such object") || stderr.contains("No such container")
}

impl Provider for DockerProvider {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn exec(&self, project: &Project, service: &str, argv: &[String]) -> Result<ExecOutput> {
        let container = container_name(project, service);
        let mut args = vec!["exec".to_string(), container.clone()];
        args.extend(argv.iter().cloned());
        debug!(container = %container, command = %argv.join(" "), "exec");
        docker(&args)?.check(&format!("{} in {}", argv.join(" "), container))
    }

    fn compose_up(&self, project: &Project) -> Result<()> {
        info!(project = %project.name, "starting containers");
        ComposeCommand::new(project)
            .arg("up")
            .arg("-d")
            .execute("docker compose up")
    }

    fn compose_down(&self, project: &Project) -> Result<()> {
        info!(project = %project.name, "stopping containers");
        ComposeCommand::new(project)
            .arg("down")
            .execute("docker compose down")
    }

    fn start_optional_profile(&self, project: &Project, profiles: &[&str]) -> Result<()> {
        let mut compose = ComposeCommand::new(project);
        for profile in profiles {
            compose = compose.profile(profile);
        }
        compose
            .arg("up")
            .arg("-d")
            .execute(&format!("docker compose --profile {}", profiles.join(",")))
    }

    fn ensure_service(&self, project: &Project, service: &str, timeout: Duration) -> Result<()> {
        let container = container_name(project, service);
        let start = Instant::now();
        loop {
            let state = self.inspect(
                &container,
                "{{.State.Status}} {{if .State.Health}}{{.State.Health.Status}}{{end}}",
            )?;
            if let Some(state) = state {
                let mut parts = state.split_whitespace();
                let status = parts.next().unwrap_or_default();
                let health = parts.next();
                if status == "running" && matches!(health, None | Some("healthy")) {
                    debug!(container = %container, "ready");
                    return Ok(());
                }
            }
            if start.elapsed() >= timeout {
                return Err(DdevError::Timeout(format!(
                    "{} did not become ready within {}s",
                    container,
                    timeout.as_secs()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn service_exists(&self, project: &Project, service: &str) -> Result<bool> {
        let state = self.inspect(&container_name(project, service), "{{.State.Status}}")?;
        Ok(state.as_deref() == Some("running"))
    }

    fn service_env(&self, project: &Project, service: &str, key: &str) -> Result<Option<String>> {
        let env_dump = self.inspect(
            &container_name(project, service),
            "{{range .Config.Env}}{{println .}}{{end}}",
        )?;
        Ok(env_dump.and_then(|dump| lookup_env(&dump, key)))
    }

    fn sync_flush(&self, project: &Project) -> Result<()> {
        self.exec(project, crate::WEB_SERVICE, &["sync".to_string()])?;
        Ok(())
    }

    fn docker_ip(&self) -> Result<String> {
        Ok(docker_ip_from_host(env::var("DOCKER_HOST").ok().as_deref()))
    }
}

/// `KEY=value` lookup in a newline-separated environment dump.
pub fn lookup_env(dump: &str, key: &str) -> Option<String> {
    dump.lines().find_map(|line| {
        line.split_once('=')
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
}

/// Host part of a `tcp://host:port` DOCKER_HOST, otherwise loopback.
pub fn docker_ip_from_host(docker_host: Option<&str>) -> String {
    docker_host
        .and_then(|h| h.strip_prefix("tcp://"))
        .and_then(|rest| rest.split(':').next())
        .filter(|host| !host.is_empty())
        .unwrap_or("127.0.0.1")
        .to_string()
}
