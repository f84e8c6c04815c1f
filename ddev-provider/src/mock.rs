//! In-memory provider for tests.
//!
//! Models just enough of a running stack to drive the profiler and start
//! sequences: which services run, whether xhprof is loaded in web, and which
//! databases exist in db. Every call is recorded.

use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::{Provider, DB_SERVICE, WEB_SERVICE};
use ddev_config::Project;
use ddev_core::command_stream::ExecOutput;
use ddev_core::error::{DdevError, Result};

#[derive(Debug, Default)]
pub struct MockState {
    pub running: BTreeSet<String>,
    pub xhprof_loaded: bool,
    pub databases: BTreeSet<String>,
    /// `(service, key) -> value`
    pub env: BTreeMap<(String, String), String>,
    pub calls: Vec<String>,
    /// Any call whose description contains this substring fails.
    pub fail_on: Option<String>,
    /// Services that start but never become ready.
    pub never_ready: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct MockProvider {
    state: RefCell<MockState>,
    docker_ip: String,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MockState::default()),
            docker_ip: "127.0.0.1".to_string(),
        }
    }

    /// Provider whose default services are already up.
    pub fn running() -> Self {
        let mock = Self::new();
        {
            let mut state = mock.state.borrow_mut();
            state.running.insert(WEB_SERVICE.to_string());
            state.running.insert(DB_SERVICE.to_string());
        }
        mock
    }

    pub fn with_docker_ip(mut self, ip: &str) -> Self {
        self.docker_ip = ip.to_string();
        self
    }

    pub fn fail_on(&self, needle: &str) {
        self.state.borrow_mut().fail_on = Some(needle.to_string());
    }

    pub fn set_env(&self, service: &str, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .env
            .insert((service.to_string(), key.to_string()), value.to_string());
    }

    pub fn never_ready(&self, service: &str) {
        self.state.borrow_mut().never_ready.insert(service.to_string());
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let failing = state
            .fail_on
            .as_deref()
            .is_some_and(|needle| call.contains(needle));
        state.calls.push(call.clone());
        if failing {
            return Err(DdevError::Command(format!("mock failure: {call}")));
        }
        Ok(())
    }

    fn run_sql(&self, script: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for (name, guarded) in created_databases(script) {
            if !state.databases.insert(name.clone()) && !guarded {
                return Err(DdevError::Command(format!(
                    "database \"{name}\" already exists"
                )));
            }
        }
        Ok(())
    }
}

/// `CREATE DATABASE` targets in a script, with whether each is existence-guarded.
fn created_databases(script: &str) -> Vec<(String, bool)> {
    let upper = script.to_ascii_uppercase();
    let mut found = Vec::new();
    let mut rest = upper.as_str();
    let mut offset = 0;
    while let Some(pos) = rest.find("CREATE DATABASE") {
        let start = offset + pos + "CREATE DATABASE".len();
        let tail = &script[start..];
        let tail_upper = &upper[start..];
        let (guarded, tail) = match tail_upper.trim_start().strip_prefix("IF NOT EXISTS") {
            Some(_) => {
                let skip = tail_upper.len() - tail_upper.trim_start().len() + "IF NOT EXISTS".len();
                (true, &tail[skip..])
            }
            None => (upper.contains("WHERE NOT EXISTS"), tail),
        };
        let name: String = tail
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if !name.is_empty() {
            found.push((name.to_lowercase(), guarded));
        }
        offset = start;
        rest = &upper[offset..];
    }
    found
}

impl Provider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn exec(&self, _project: &Project, service: &str, argv: &[String]) -> Result<ExecOutput> {
        let command = argv.join(" ");
        self.record(format!("exec {service} {command}"))?;
        if !self.state.borrow().running.contains(service) {
            return Err(DdevError::Command(format!("service {service} is not running")));
        }

        let mut stdout = String::new();
        if service == WEB_SERVICE {
            if command.contains("enable_xhprof") {
                self.state.borrow_mut().xhprof_loaded = true;
            } else if command.contains("disable_xhprof") {
                self.state.borrow_mut().xhprof_loaded = false;
            } else if command.contains("extension_loaded(\"xhprof\")") {
                stdout = self.state.borrow().xhprof_loaded.to_string();
            }
        } else if service == DB_SERVICE {
            self.run_sql(&command)?;
        }

        Ok(ExecOutput {
            stdout,
            stderr: String::new(),
            exit_code: Some(0),
        })
    }

    fn compose_up(&self, project: &Project) -> Result<()> {
        self.record(format!("compose_up {}", project.name))?;
        let mut state = self.state.borrow_mut();
        state.running.insert(WEB_SERVICE.to_string());
        state.running.insert(DB_SERVICE.to_string());
        Ok(())
    }

    fn compose_down(&self, project: &Project) -> Result<()> {
        self.record(format!("compose_down {}", project.name))?;
        self.state.borrow_mut().running.clear();
        Ok(())
    }

    fn start_optional_profile(&self, _project: &Project, profiles: &[&str]) -> Result<()> {
        self.record(format!("start_optional_profile {}", profiles.join(",")))?;
        let mut state = self.state.borrow_mut();
        for profile in profiles {
            state.running.insert(profile.to_string());
        }
        Ok(())
    }

    fn ensure_service(&self, _project: &Project, service: &str, timeout: Duration) -> Result<()> {
        self.record(format!("ensure_service {service}"))?;
        let state = self.state.borrow();
        if state.running.contains(service) && !state.never_ready.contains(service) {
            Ok(())
        } else {
            Err(DdevError::Timeout(format!(
                "{service} did not become ready within {}s",
                timeout.as_secs()
            )))
        }
    }

    fn service_exists(&self, _project: &Project, service: &str) -> Result<bool> {
        self.record(format!("service_exists {service}"))?;
        Ok(self.state.borrow().running.contains(service))
    }

    fn service_env(&self, _project: &Project, service: &str, key: &str) -> Result<Option<String>> {
        self.record(format!("service_env {service} {key}"))?;
        Ok(self
            .state
            .borrow()
            .env
            .get(&(service.to_string(), key.to_string()))
            .cloned())
    }

    fn sync_flush(&self, _project: &Project) -> Result<()> {
        self.record("sync_flush".to_string())
    }

    fn docker_ip(&self) -> Result<String> {
        Ok(self.docker_ip.clone())
    }
}
