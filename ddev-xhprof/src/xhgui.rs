//! Database bootstrap for the xhgui sidecar.

use ddev_config::Project;

const MYSQL_SETUP: &str =
    "CREATE DATABASE IF NOT EXISTS xhgui; GRANT ALL ON xhgui.* TO 'db'@'%';";

const POSTGRES_SETUP: &str = r#"psql -q -U db -d postgres <<'EOF'
SELECT 'CREATE DATABASE xhgui' WHERE NOT EXISTS (SELECT FROM pg_database WHERE datname = 'xhgui')\gexec
GRANT ALL PRIVILEGES ON DATABASE xhgui TO db;
EOF"#;

/// Command run in the db service that creates the `xhgui` database if it is
/// missing and grants it to the `db` user.
pub fn xhgui_database_command(project: &Project) -> Vec<String> {
    if project.database_engine().is_mysql_family() {
        vec![
            project.db_client_command().to_string(),
            "-uroot".to_string(),
            "-proot".to_string(),
            "-e".to_string(),
            MYSQL_SETUP.to_string(),
        ]
    } else {
        vec!["bash".to_string(), "-c".to_string(), POSTGRES_SETUP.to_string()]
    }
}
