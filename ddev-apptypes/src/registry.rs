//! Ordered catalog of app-type descriptors.
//!
//! Order matters: detection walks the list front to back and the first
//! detector that matches wins, so more specific frameworks come first.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::adapters::{
    cakephp, contao, django, drupal, expressionengine, laravel, magento, python, shopware6,
    silverstripe, typo3, wordpress,
};
use ddev_config::{AppType, GlobalConfig, Project};
use ddev_core::error::{DdevError, Result};

pub type Detector = fn(&Project) -> bool;
pub type SettingsPathSetter = fn(&mut Project);
pub type ConfigOverride = fn(&mut Project) -> Result<()>;
pub type PostStart = fn(&Project, &GlobalConfig) -> Result<()>;
/// Upload directories relative to the docroot.
pub type UploadDirs = fn(&Project) -> Vec<String>;

#[derive(Debug, Clone, Copy)]
pub struct AppTypeDescriptor {
    pub app_type: AppType,
    pub detector: Option<Detector>,
    pub settings_path_setter: Option<SettingsPathSetter>,
    pub config_override: Option<ConfigOverride>,
    pub post_start: Option<PostStart>,
    pub upload_dirs: Option<UploadDirs>,
}

impl AppTypeDescriptor {
    const fn bare(app_type: AppType) -> Self {
        Self {
            app_type,
            detector: None,
            settings_path_setter: None,
            config_override: None,
            post_start: None,
            upload_dirs: None,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.app_type.as_str()
    }
}

pub struct Registry {
    descriptors: Vec<AppTypeDescriptor>,
    index: HashMap<AppType, usize>,
}

impl Registry {
    fn new(descriptors: Vec<AppTypeDescriptor>) -> Self {
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.app_type, i))
            .collect();
        Self { descriptors, index }
    }

    /// Descriptors in detection order.
    pub fn iter(&self) -> impl Iterator<Item = &AppTypeDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, app_type: AppType) -> Option<&AppTypeDescriptor> {
        self.index.get(&app_type).map(|&i| &self.descriptors[i])
    }

    /// Look up by tag string, e.g. from the command line.
    pub fn lookup(&self, tag: &str) -> Result<&AppTypeDescriptor> {
        let app_type: AppType = tag.parse()?;
        self.get(app_type)
            .ok_or_else(|| DdevError::UnknownAppType(tag.to_string()))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::new(vec![
        AppTypeDescriptor {
            detector: Some(drupal::detect),
            settings_path_setter: Some(drupal::set_settings_paths),
            post_start: Some(drupal::post_start),
            upload_dirs: Some(drupal::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Drupal)
        },
        AppTypeDescriptor {
            detector: Some(wordpress::detect),
            settings_path_setter: Some(wordpress::set_settings_paths),
            post_start: Some(wordpress::post_start),
            upload_dirs: Some(wordpress::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Wordpress)
        },
        AppTypeDescriptor {
            detector: Some(typo3::detect),
            settings_path_setter: Some(typo3::set_settings_paths),
            post_start: Some(typo3::post_start),
            upload_dirs: Some(typo3::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Typo3)
        },
        AppTypeDescriptor {
            detector: Some(magento::detect_magento2),
            settings_path_setter: Some(magento::set_magento2_settings_paths),
            post_start: Some(magento::magento2_post_start),
            upload_dirs: Some(magento::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Magento2)
        },
        AppTypeDescriptor {
            detector: Some(magento::detect_magento),
            settings_path_setter: Some(magento::set_magento_settings_paths),
            post_start: Some(magento::magento_post_start),
            upload_dirs: Some(magento::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Magento)
        },
        AppTypeDescriptor {
            detector: Some(laravel::detect),
            settings_path_setter: Some(laravel::set_settings_paths),
            post_start: Some(laravel::post_start),
            ..AppTypeDescriptor::bare(AppType::Laravel)
        },
        AppTypeDescriptor {
            detector: Some(shopware6::detect),
            settings_path_setter: Some(shopware6::set_settings_paths),
            config_override: Some(shopware6::config_override),
            post_start: Some(shopware6::post_start),
            upload_dirs: Some(shopware6::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Shopware6)
        },
        AppTypeDescriptor {
            detector: Some(contao::detect),
            settings_path_setter: Some(contao::set_settings_paths),
            config_override: Some(contao::config_override),
            post_start: Some(contao::post_start),
            upload_dirs: Some(contao::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Contao)
        },
        AppTypeDescriptor {
            detector: Some(silverstripe::detect),
            settings_path_setter: Some(silverstripe::set_settings_paths),
            config_override: Some(silverstripe::config_override),
            post_start: Some(silverstripe::post_start),
            upload_dirs: Some(silverstripe::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Silverstripe)
        },
        AppTypeDescriptor {
            detector: Some(cakephp::detect),
            settings_path_setter: Some(cakephp::set_settings_paths),
            config_override: Some(cakephp::config_override),
            post_start: Some(cakephp::post_start),
            ..AppTypeDescriptor::bare(AppType::Cakephp)
        },
        AppTypeDescriptor {
            detector: Some(expressionengine::detect),
            settings_path_setter: Some(expressionengine::set_settings_paths),
            post_start: Some(expressionengine::post_start),
            upload_dirs: Some(expressionengine::upload_dirs),
            ..AppTypeDescriptor::bare(AppType::Expressionengine)
        },
        AppTypeDescriptor {
            detector: Some(django::detect),
            settings_path_setter: Some(django::set_settings_paths),
            config_override: Some(python::config_override_django),
            post_start: Some(django::post_start),
            ..AppTypeDescriptor::bare(AppType::Django4)
        },
        AppTypeDescriptor {
            detector: Some(python::detect),
            config_override: Some(python::config_override),
            ..AppTypeDescriptor::bare(AppType::Python)
        },
        AppTypeDescriptor::bare(AppType::Php),
    ])
});

pub fn registry() -> &'static Registry {
    &REGISTRY
}
