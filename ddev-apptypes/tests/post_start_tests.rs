mod common;

use common::ProjectTestFixture;
use ddev_apptypes::hooks::{post_start, prepare_project, remove_settings};
use ddev_apptypes::{apply_config_override, check_upload_dirs};
use ddev_config::{AppType, GlobalConfig, Project};

const BOOTSTRAP: &str = r#"<?php
use Cake\Core\Configure;

// if (!env('APP_NAME') && file_exists(CONFIG . '.env')) {
//     $dotenv = new \josegonzalez\Dotenv\Loader([CONFIG . '.env']);
//     $dotenv->parse()
//         ->putenv()
//         ->toEnv()
//         ->toServer();
// }
"#;

fn run(project: &mut Project) {
    prepare_project(project).unwrap();
    apply_config_override(project).unwrap();
    post_start(project, &GlobalConfig::default()).unwrap();
}

#[test]
fn test_cakephp_fresh_project() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("bin/cake.php", "<?php\n").unwrap();
    fixture.create_file("config/bootstrap.php", BOOTSTRAP).unwrap();
    fixture
        .create_file("config/.env.example", "#!/usr/bin/env bash\nexport APP_NAME=\"__APP_NAME__\"\nexport DEBUG=\"true\"\n")
        .unwrap();
    let mut project = fixture.project("cakeapp");
    run(&mut project);

    assert_eq!(project.app_type, Some(AppType::Cakephp));
    let env = fixture.read("config/.env");
    assert!(env.contains("export DATABASE_URL=mysql://db:db@db:3306/db\n"));
    assert!(env.contains("export APP_NAME=cakeapp\n"));
    assert!(env.starts_with("#!/usr/bin/env bash\n# #ddev-generated"));
    assert_eq!(env.matches("export APP_NAME=").count(), 1);

    let bootstrap = fixture.read("config/bootstrap.php");
    assert!(bootstrap.contains("\nif (!env('APP_NAME') && file_exists(CONFIG . '.env')) {"));
    assert!(!bootstrap.contains("// if (!env('APP_NAME')"));
}

#[test]
fn test_cakephp_user_env_is_preserved() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("bin/cake", "").unwrap();
    fixture.create_file("config/.env", "CUSTOM=1\n").unwrap();
    let mut project = fixture.project("cakeapp");
    run(&mut project);

    assert_eq!(fixture.read("config/.env"), "CUSTOM=1\n");
    let ddev_env = fixture.read("config/.env.ddev");
    assert!(ddev_env.contains("export DATABASE_URL=mysql://db:db@db:3306/db\n"));
}

#[test]
fn test_laravel_without_env_writes_nothing() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("artisan", "").unwrap();
    let mut project = fixture.project("blog");
    run(&mut project);

    assert_eq!(project.app_type, Some(AppType::Laravel));
    assert!(!fixture.join(".env").exists());
}

#[test]
fn test_typo3_user_local_configuration() {
    let fixture = ProjectTestFixture::new().unwrap();
    let local = "<?php\nreturn ['BE' => ['debug' => false]];\n";
    fixture.create_dir("public/typo3/sysext/core").unwrap();
    fixture
        .create_file("public/typo3conf/LocalConfiguration.php", local)
        .unwrap();
    let mut project = fixture.project("t3");
    project.docroot = "public".into();
    run(&mut project);

    assert_eq!(project.app_type, Some(AppType::Typo3));
    assert_eq!(fixture.read("public/typo3conf/LocalConfiguration.php"), local);
    let additional = fixture.read("public/typo3conf/AdditionalConfiguration.php");
    assert!(additional.starts_with("<?php"));
    assert!(additional.contains("#ddev-generated"));
    assert!(additional.contains("'Default' => ["));
    assert!(additional.contains("'host' => 'db'"));
}

#[test]
fn test_post_start_is_idempotent() {
    let setups: Vec<(&str, Vec<(&str, &str)>, &str)> = vec![
        ("cakephp", vec![("bin/cake", "")], "config/.env"),
        ("contao", vec![("composer.json", r#"{"require":{"contao/manager-bundle":"5.*"}}"#)], ".env.local"),
        ("laravel", vec![("artisan", ""), (".env", "APP_KEY=x\nDB_HOST=127.0.0.1\n")], ".env.ddev"),
        ("shopware6", vec![("composer.json", r#"{"require":{"shopware/core":"6.5.*"}}"#)], ".env"),
        ("silverstripe", vec![("composer.json", r#"{"require":{"silverstripe/framework":"5.*"}}"#)], ".env"),
        ("expressionengine", vec![("system/ee/.keep", ""), ("index.php", "<?php $system_path = './system';")], ".env.php"),
        ("typo3", vec![("typo3/sysext/core/.keep", "")], "typo3conf/AdditionalConfiguration.php"),
        ("drupal", vec![("core/lib/Drupal.php", "")], "sites/default/settings.ddev.php"),
        ("wordpress", vec![("wp-settings.php", "")], "wp-config-ddev.php"),
        ("magento2", vec![("bin/magento", "")], "app/etc/env.php"),
    ];

    for (tag, files, settings) in setups {
        let fixture = ProjectTestFixture::new().unwrap();
        for (path, content) in &files {
            fixture.create_file(path, content).unwrap();
        }
        let mut project = fixture.project("idem");
        run(&mut project);
        assert_eq!(project.app_type.map(|t| t.as_str()), Some(tag));
        let first = fixture.read(settings);
        assert!(!first.is_empty(), "{tag}: {settings} not written");

        let mut again = fixture.project("idem");
        run(&mut again);
        assert_eq!(fixture.read(settings), first, "{tag}: second run changed {settings}");
    }
}

#[test]
fn test_owned_env_merge_keeps_extra_lines() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("artisan", "").unwrap();
    fixture
        .create_file(
            ".env",
            "# #ddev-generated\n# mine\nAPP_KEY=base64:k\nDB_HOST=127.0.0.1\nDB_HOST=old\n\nCUSTOM=\"a b\"\n",
        )
        .unwrap();
    let mut project = fixture.project("blog");
    run(&mut project);

    let env = fixture.read(".env");
    assert!(env.starts_with(
        "# #ddev-generated\n# mine\nAPP_KEY=base64:k\nDB_HOST=db\n\nCUSTOM=\"a b\"\n"
    ));
    assert_eq!(env.matches("DB_HOST=").count(), 1);
}

#[test]
fn test_unsigned_env_files_stay_byte_identical() {
    let setups: Vec<(&str, &str, &str, &str)> = vec![
        ("artisan", "", ".env", ".env.ddev"),
        ("composer.json", r#"{"require":{"contao/core-bundle":"5.*"}}"#, ".env.local", ".env.local.ddev"),
        ("composer.json", r#"{"require":{"shopware/core":"6.5.*"}}"#, ".env", ".env.ddev"),
        ("composer.json", r#"{"require":{"silverstripe/recipe-cms":"5.*"}}"#, ".env", ".env.ddev"),
        ("system/ee/.keep", "", ".env.php", ".env.ddev.php"),
    ];
    for (marker, content, primary, sibling) in setups {
        let fixture = ProjectTestFixture::new().unwrap();
        fixture.create_file(marker, content).unwrap();
        fixture.create_file(primary, "MINE=1\n").unwrap();

        for _ in 0..2 {
            let mut project = fixture.project("p");
            run(&mut project);
        }
        assert_eq!(fixture.read(primary), "MINE=1\n", "{primary} was rewritten");
        let written = fixture.read(sibling);
        assert!(written.contains("#ddev-generated"), "{sibling} not signed");
        assert!(written.contains("db"), "{sibling} lacks db settings");
    }
}

#[test]
fn test_env_skipped_when_sibling_is_user_owned_too() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("artisan", "").unwrap();
    fixture.create_file(".env", "MINE=1\n").unwrap();
    fixture.create_file(".env.ddev", "ALSO_MINE=1\n").unwrap();
    let mut project = fixture.project("blog");
    run(&mut project);

    assert_eq!(fixture.read(".env"), "MINE=1\n");
    assert_eq!(fixture.read(".env.ddev"), "ALSO_MINE=1\n");
}

#[test]
fn test_disabled_settings_management_writes_nothing() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("bin/cake", "").unwrap();
    let mut project = fixture.project("cakeapp");
    project.disable_settings_management = true;
    run(&mut project);
    assert!(!fixture.join("config/.env").exists());
}

#[test]
fn test_user_owned_file_never_becomes_owned() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("wp-settings.php", "").unwrap();
    fixture.create_file("wp-config.php", "<?php // hand written\n").unwrap();
    fixture.create_file("wp-config-ddev.php", "<?php // also mine\n").unwrap();

    for _ in 0..2 {
        let mut project = fixture.project("wp");
        run(&mut project);
    }
    assert_eq!(fixture.read("wp-config.php"), "<?php // hand written\n");
    assert_eq!(fixture.read("wp-config-ddev.php"), "<?php // also mine\n");
}

#[test]
fn test_remove_settings_only_removes_owned_files() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("web/core/lib/Drupal.php", "").unwrap();
    fixture
        .create_file("web/sites/default/settings.php", "<?php // site\n")
        .unwrap();
    let mut project = fixture.project("d10");
    project.docroot = "web".into();
    run(&mut project);
    assert!(fixture.join("web/sites/default/settings.ddev.php").is_file());

    let removed = remove_settings(&mut project).unwrap();
    assert_eq!(removed, vec![fixture.join("web/sites/default/settings.ddev.php")]);
    assert!(fixture.join("web/sites/default/settings.php").is_file());
}

#[test]
fn test_remove_settings_removes_env_sibling() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("artisan", "").unwrap();
    fixture.create_file(".env", "MINE=1\n").unwrap();
    let mut project = fixture.project("blog");
    run(&mut project);
    assert!(fixture.join(".env.ddev").is_file());

    let removed = remove_settings(&mut project).unwrap();
    assert_eq!(removed, vec![fixture.join(".env.ddev")]);
    assert_eq!(fixture.read(".env"), "MINE=1\n");
}

#[test]
fn test_upload_dir_warnings() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("web/core/lib/Drupal.php", "").unwrap();
    let mut project = fixture.project("d10");
    project.docroot = "web".into();
    run(&mut project);

    assert_eq!(
        check_upload_dirs(&project),
        vec![fixture.join("web/sites/default/files")]
    );
    fixture.create_dir("web/sites/default/files").unwrap();
    assert!(check_upload_dirs(&project).is_empty());

    project.upload_dirs = vec!["private".into()];
    assert_eq!(check_upload_dirs(&project), vec![fixture.join("web/private")]);
    project.disable_upload_dirs_warning = true;
    assert!(check_upload_dirs(&project).is_empty());
}

#[test]
fn test_cakephp_disables_upload_warning() {
    let fixture = ProjectTestFixture::new().unwrap();
    fixture.create_file("bin/cake", "").unwrap();
    let mut project = fixture.project("cakeapp");
    project.upload_dirs = vec!["webroot/files".into()];
    run(&mut project);
    assert!(check_upload_dirs(&project).is_empty());
}
