//! Published xhgui ports.

use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_provider::describe::xhgui_ports;
use ddev_provider::{Provider, XHGUI_SERVICE};
use tracing::debug;

/// Container port the xhgui UI listens on.
pub const XHGUI_CONTAINER_PORT: &str = "80";

/// Host port mapped to `container_port` in an `HTTP_EXPOSE`-style value such
/// as `8143:80,8142:443`. An entry without a colon maps a port to itself.
pub fn parse_expose(value: &str, container_port: &str) -> Option<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .find_map(|entry| {
            let (host, container) = entry.split_once(':').unwrap_or((entry, entry));
            (container.trim() == container_port && !host.trim().is_empty())
                .then(|| host.trim().to_string())
        })
}

/// `(http, https)` ports for xhgui.
///
/// What the running sidecar publishes wins, then the project's own setting,
/// then the global default.
pub fn resolve_xhgui_ports(
    project: &Project,
    global: &GlobalConfig,
    provider: &dyn Provider,
) -> Result<(String, String)> {
    let (http_default, https_default) = xhgui_ports(project, global);
    let from_env = |key: &str| -> Result<Option<String>> {
        let value = provider.service_env(project, XHGUI_SERVICE, key)?;
        Ok(value.and_then(|v| parse_expose(&v, XHGUI_CONTAINER_PORT)))
    };

    let http = from_env("HTTP_EXPOSE")?.unwrap_or_else(|| http_default.to_string());
    let https = from_env("HTTPS_EXPOSE")?.unwrap_or_else(|| https_default.to_string());
    debug!(project = %project.name, %http, %https, "resolved xhgui ports");
    Ok((http, https))
}
