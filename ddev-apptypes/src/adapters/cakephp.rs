use std::path::PathBuf;

use tracing::debug;

use super::{composer_requires, env_values, merge_env_target, resolve_env_target, EnvWrite};
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_core::file_system::replace_in_file_optional;
use ddev_core::{ddev_info, ddev_success};
use ddev_settings::db::{mailer_url, DbSettings};
use ddev_settings::signature::{ddev_sibling, ownership, Ownership};
use ddev_settings::templates::project_salt;

const PHP_VERSION: &str = "8.3";

const DOTENV_COMMENTED: &str = "// if (!env('APP_NAME') && file_exists(CONFIG . '.env')) {
//     $dotenv = new \\josegonzalez\\Dotenv\\Loader([CONFIG . '.env']);
//     $dotenv->parse()
//         ->putenv()
//         ->toEnv()
//         ->toServer();
// }";

const DOTENV_ENABLED: &str = "if (!env('APP_NAME') && file_exists(CONFIG . '.env')) {
    $dotenv = new \\josegonzalez\\Dotenv\\Loader([CONFIG . '.env']);
    $dotenv->parse()
        ->putenv()
        ->toEnv()
        ->toServer();
}";

fn config_dir(project: &Project) -> PathBuf {
    project.composer_root_path().join("config")
}

pub fn detect(project: &Project) -> bool {
    let root = project.composer_root_path();
    root.join("bin/cake").is_file()
        || root.join("bin/cake.php").is_file()
        || (root.join("config/app.php").is_file() && composer_requires(project, "cakephp/cakephp"))
}

/// `config/.env`, or `config/.env.ddev` when the user already owns `config/.env`.
pub fn set_settings_paths(project: &mut Project) {
    let env = config_dir(project).join(".env");
    let target = match ddev_sibling(&env) {
        Some(sibling) if ownership(&env) == Ownership::UserOwned => {
            debug!(path = %env.display(), "user-owned .env, using its .ddev sibling");
            sibling
        }
        _ => env,
    };
    project.site_settings_path = Some(target);
}

pub fn config_override(project: &mut Project) -> Result<()> {
    project.php_version = PHP_VERSION.to_string();
    project.disable_upload_dirs_warning = true;
    Ok(())
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    let Some(path) = project.site_settings_path.as_deref() else {
        return Ok(());
    };
    let db = DbSettings::for_project(project);

    let mut values = env_values([
        ("export APP_NAME", project.name.clone()),
        ("export DEBUG", "true".to_string()),
        ("export APP_ENCODING", "UTF-8".to_string()),
        ("export APP_DEFAULT_LOCALE", "en_US".to_string()),
        ("export APP_DEFAULT_TIMEZONE", "UTC".to_string()),
        ("export APP_FULL_BASE_URL", project.primary_url(global)),
        ("export DATABASE_URL", db.url()),
        ("export EMAIL_TRANSPORT_DEFAULT_URL", mailer_url()),
    ]);
    if let Some(target) = resolve_env_target(path)? {
        let existing_salt = ddev_settings::read_env_file(&target)?
            .and_then(|env| env.get("export SECURITY_SALT"))
            .filter(|salt| !salt.is_empty());
        if existing_salt.is_none() {
            values.insert("export SECURITY_SALT".to_string(), project_salt(project));
        }

        let example = config_dir(project).join(".env.example");
        let example = Some(example.as_path()).filter(|_| target == path);
        if merge_env_target(&target, example, &values)? == EnvWrite::Created {
            ddev_success!("Created {}", target.display());
        }
    }

    let bootstrap = config_dir(project).join("bootstrap.php");
    if bootstrap.is_file() && replace_in_file_optional(&bootstrap, DOTENV_COMMENTED, DOTENV_ENABLED)? {
        ddev_info!("Enabled .env loading in {}", bootstrap.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> Project {
        Project::new("cake", dir.path())
    }

    #[test]
    fn test_settings_path_prefers_env() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        set_settings_paths(&mut p);
        assert_eq!(p.site_settings_path, Some(dir.path().join("config/.env")));
    }

    #[test]
    fn test_settings_path_falls_back_for_user_env() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config/.env"), "CUSTOM=1\n").unwrap();
        let mut p = project(&dir);
        set_settings_paths(&mut p);
        assert_eq!(p.site_settings_path, Some(dir.path().join("config/.env.ddev")));
    }

    #[test]
    fn test_config_override() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        p.php_version = "7.4".into();
        config_override(&mut p).unwrap();
        assert_eq!(p.php_version, "8.3");
        assert!(p.disable_upload_dirs_warning);
    }

    #[test]
    fn test_bootstrap_is_enabled_once() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let bootstrap = dir.path().join("config/bootstrap.php");
        fs::write(&bootstrap, format!("<?php\n{DOTENV_COMMENTED}\n")).unwrap();
        let mut p = project(&dir);
        set_settings_paths(&mut p);

        post_start(&p, &GlobalConfig::default()).unwrap();
        let enabled = fs::read_to_string(&bootstrap).unwrap();
        assert!(enabled.contains(DOTENV_ENABLED));
        assert!(!enabled.contains("// if (!env('APP_NAME')"));

        post_start(&p, &GlobalConfig::default()).unwrap();
        assert_eq!(fs::read_to_string(&bootstrap).unwrap(), enabled);
    }

    #[test]
    fn test_existing_salt_is_kept() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config/.env"),
            "# #ddev-generated\nexport SECURITY_SALT=\"keep-me\"\n",
        )
        .unwrap();
        let mut p = project(&dir);
        set_settings_paths(&mut p);
        post_start(&p, &GlobalConfig::default()).unwrap();

        let env = fs::read_to_string(dir.path().join("config/.env")).unwrap();
        assert!(env.contains("export SECURITY_SALT=\"keep-me\""));
        assert_eq!(env.matches("SECURITY_SALT").count(), 1);
    }
}
