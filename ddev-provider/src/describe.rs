//! Router URL lookup for a project.

use serde::Serialize;

use ddev_config::{GlobalConfig, Project};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescribeUrls {
    pub httpurl: String,
    pub httpsurl: String,
    pub xhgui_url: String,
    pub xhgui_https_url: String,
}

/// Project override when set, otherwise the global value.
pub fn xhgui_ports<'a>(project: &'a Project, global: &'a GlobalConfig) -> (&'a str, &'a str) {
    let pick = |own: &'a str, fallback: &'a str| {
        if own.trim().is_empty() {
            fallback
        } else {
            own
        }
    };
    (
        pick(&project.xhgui_http_port, &global.xhgui_http_port),
        pick(&project.xhgui_https_port, &global.xhgui_https_port),
    )
}

/// URLs the router publishes for the project and its xhgui sidecar.
pub fn describe_urls(project: &Project, global: &GlobalConfig) -> DescribeUrls {
    let host = project.hostname(global);
    let (xhgui_http, xhgui_https) = xhgui_ports(project, global);
    DescribeUrls {
        httpurl: project.http_url(global),
        httpsurl: project.https_url(global),
        xhgui_url: format!("http://{host}:{xhgui_http}"),
        xhgui_https_url: format!("https://{host}:{xhgui_https}"),
    }
}
