//! Integration tests for `svx resolve`.

mod common;

use common::{DEPLOY_SETTINGS, TestEnv};
use predicates::prelude::*;

#[test]
fn test_resolve_exposes_known_fields() {
    let env = TestEnv::with_settings(DEPLOY_SETTINGS);
    env.svx()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.username": "admin""#,
        ))
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.privateKey": "/keys/id_ed25519""#,
        ))
        .stdout(predicate::str::contains(
            r#""settings.servers.server.deploy.username": "admin""#,
        ));
}

#[test]
fn test_resolve_flattens_configuration_tree() {
    let env = TestEnv::with_settings(DEPLOY_SETTINGS);
    env.svx()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.proxy.host": "h""#,
        ))
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.proxy.port": "8080""#,
        ))
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.timeout": "30""#,
        ))
        // Internal nodes never become keys.
        .stdout(predicate::str::contains(r#""settings.servers.deploy.proxy":"#).not());
}

#[test]
fn test_resolve_define_overrides_stored_value() {
    let env = TestEnv::with_settings(DEPLOY_SETTINGS);
    env.svx()
        .args(["resolve", "-D", "settings.servers.deploy.username=deployer"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.username": "deployer""#,
        ))
        .stdout(predicate::str::contains(r#""admin""#).not());
}

#[test]
fn test_resolve_legacy_define_sets_both_keys() {
    let env = TestEnv::with_settings(DEPLOY_SETTINGS);
    env.svx()
        .args([
            "resolve",
            "-D",
            "settings.servers.server.deploy.password=from-legacy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.password": "from-legacy""#,
        ))
        .stdout(predicate::str::contains(
            r#""settings.servers.server.deploy.password": "from-legacy""#,
        ));
}

#[test]
fn test_resolve_expands_env_placeholder() {
    let env = TestEnv::with_settings(
        r#"
        server "deploy" {
            private-key "${env.KEY_PATH}"
        }
        "#,
    );
    env.svx()
        .arg("resolve")
        .env("KEY_PATH", "/ci/keys/deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.privateKey": "/ci/keys/deploy""#,
        ))
        .stdout(predicate::str::contains("${env.KEY_PATH}").not());
}

#[test]
fn test_resolve_expands_define_as_session_property() {
    let env = TestEnv::with_settings(
        r#"
        server "deploy" {
            username "${deploy.user}"
        }
        "#,
    );
    env.svx()
        .args(["resolve", "-D", "deploy.user=admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.username": "admin""#,
        ));
}

#[test]
fn test_resolve_unknown_placeholder_left_intact() {
    let env = TestEnv::with_settings(
        r#"
        server "deploy" {
            username "${nobody.defined.this}"
        }
        "#,
    );
    env.svx()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("${nobody.defined.this}"));
}

#[test]
fn test_resolve_human_masks_secrets() {
    let env = TestEnv::with_settings(DEPLOY_SETTINGS);
    env.svx()
        .args(["resolve", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.servers.deploy.username = admin"))
        .stdout(predicate::str::contains("supe...alue"))
        .stdout(predicate::str::contains("super-secret-value").not());
}

#[test]
fn test_resolve_human_show_secrets() {
    let env = TestEnv::with_settings(DEPLOY_SETTINGS);
    env.svx()
        .args(["resolve", "-H", "--show-secrets"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "settings.servers.deploy.password = super-secret-value",
        ));
}

#[test]
fn test_resolve_multiple_servers() {
    let env = TestEnv::with_settings(
        r#"
        server "deploy" { username "admin" }
        server "docs" { username "writer" }
        "#,
    );
    env.svx()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""settings.servers.deploy.username": "admin""#,
        ))
        .stdout(predicate::str::contains(
            r#""settings.servers.docs.username": "writer""#,
        ));
}

#[test]
fn test_resolve_missing_settings_file_fails() {
    let env = TestEnv::new();
    env.svx()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("settings"));
}

#[test]
fn test_resolve_malformed_settings_fails() {
    let env = TestEnv::with_settings(r#"server "deploy" {"#);
    env.svx()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_resolve_duplicate_server_id_fails() {
    let env = TestEnv::with_settings(
        r#"
        server "deploy" { }
        server "deploy" { }
        "#,
    );
    env.svx()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate server id"));
}

#[test]
fn test_resolve_settings_flag_beats_env() {
    let env = TestEnv::with_settings(r#"server "from-env" { username "a" }"#);
    let other = TestEnv::with_settings(r#"server "from-flag" { username "b" }"#);
    env.svx()
        .args(["resolve", "--settings"])
        .arg(other.settings_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("from-flag"))
        .stdout(predicate::str::contains("from-env").not());
}
