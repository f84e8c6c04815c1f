//! Generated settings files.
//!
//! Every template embeds the ownership signature; rendering goes through a
//! single shared `Tera` instance with autoescaping disabled (PHP and XML
//! output are not HTML).

use once_cell::sync::OnceCell;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tera::{Context, Tera};

use crate::db::{DbSettings, MAILER_HOST, MAILER_PORT};
use crate::signature::SIGNATURE;
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTemplate {
    Typo3AdditionalConfiguration,
    DrupalSettings,
    DrupalSettingsDdev,
    WordpressConfig,
    WordpressConfigDdev,
    DjangoSettingsDdev,
    Magento2Env,
    MagentoLocalXml,
}

impl SettingsTemplate {
    const ALL: [SettingsTemplate; 8] = [
        SettingsTemplate::Typo3AdditionalConfiguration,
        SettingsTemplate::DrupalSettings,
        SettingsTemplate::DrupalSettingsDdev,
        SettingsTemplate::WordpressConfig,
        SettingsTemplate::WordpressConfigDdev,
        SettingsTemplate::DjangoSettingsDdev,
        SettingsTemplate::Magento2Env,
        SettingsTemplate::MagentoLocalXml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SettingsTemplate::Typo3AdditionalConfiguration => "typo3_additional_configuration.php",
            SettingsTemplate::DrupalSettings => "drupal_settings.php",
            SettingsTemplate::DrupalSettingsDdev => "drupal_settings_ddev.php",
            SettingsTemplate::WordpressConfig => "wordpress_wp_config.php",
            SettingsTemplate::WordpressConfigDdev => "wordpress_wp_config_ddev.php",
            SettingsTemplate::DjangoSettingsDdev => "django_settings_ddev.py",
            SettingsTemplate::Magento2Env => "magento2_env.php",
            SettingsTemplate::MagentoLocalXml => "magento_local.xml",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            SettingsTemplate::Typo3AdditionalConfiguration => {
                include_str!("../templates/typo3_additional_configuration.php")
            }
            SettingsTemplate::DrupalSettings => include_str!("../templates/drupal_settings.php"),
            SettingsTemplate::DrupalSettingsDdev => {
                include_str!("../templates/drupal_settings_ddev.php")
            }
            SettingsTemplate::WordpressConfig => include_str!("../templates/wordpress_wp_config.php"),
            SettingsTemplate::WordpressConfigDdev => {
                include_str!("../templates/wordpress_wp_config_ddev.php")
            }
            SettingsTemplate::DjangoSettingsDdev => {
                include_str!("../templates/django_settings_ddev.py")
            }
            SettingsTemplate::Magento2Env => include_str!("../templates/magento2_env.php"),
            SettingsTemplate::MagentoLocalXml => include_str!("../templates/magento_local.xml"),
        }
    }
}

/// Values available to every settings template.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsContext {
    pub signature: &'static str,
    pub project_name: String,
    pub primary_url: String,
    pub db: DbSettings,
    pub mailer_host: &'static str,
    pub mailer_port: u16,
    /// Stable per project so regenerated files stay byte-identical
    pub hash_salt: String,
}

impl SettingsContext {
    pub fn for_project(project: &Project, global: &GlobalConfig) -> Self {
        Self {
            signature: SIGNATURE,
            project_name: project.name.clone(),
            primary_url: project.primary_url(global),
            db: DbSettings::for_project(project),
            mailer_host: MAILER_HOST,
            mailer_port: MAILER_PORT,
            hash_salt: project_salt(project),
        }
    }
}

/// Per-project salt: SHA-256 over the project name and approot, hex encoded.
pub fn project_salt(project: &Project) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"ddev-salt\0");
    hasher.update(project.name.as_bytes());
    hasher.update(b"\0");
    hasher.update(project.approot.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

static SETTINGS_TERA: OnceCell<Tera> = OnceCell::new();

fn settings_tera() -> Result<&'static Tera> {
    let tera = SETTINGS_TERA.get_or_try_init(|| -> std::result::Result<Tera, tera::Error> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(
            SettingsTemplate::ALL
                .iter()
                .map(|t| (t.name(), t.source())),
        )?;
        Ok(tera)
    })?;
    Ok(tera)
}

pub fn render(template: SettingsTemplate, ctx: &SettingsContext) -> Result<String> {
    let context = Context::from_serialize(ctx)?;
    Ok(settings_tera()?.render(template.name(), &context)?)
}
