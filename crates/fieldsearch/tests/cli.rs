//! CLI integration tests for fieldsearch commands.
//!
//! These tests focus on exit codes and key output fragments, not exact
//! formatting.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use fieldsearch_store::{NewPost, SqliteStore, StoreTables};
use predicates::prelude::*;

const FIELDS: &str = r#"
[[field]]
key = "field_bio"
name = "bio"
type = "textarea"
searchable = true

[[field]]
key = "field_team"
name = "team"
type = "repeater"

[[field]]
key = "field_member_name"
name = "member_name"
type = "text"
parent = "field_team"
searchable = true
"#;

const CONFIG: &str = r#"
root = true

[store]
database = "site.db"

[registry]
files = "fields.toml"
"#;

/// An isolated home directory with a working directory below it.
struct TestEnv {
    /// Temporary home directory.
    home: tempfile::TempDir,
}

impl TestEnv {
    /// Creates a fresh home with an empty `site` directory.
    fn new() -> Self {
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(home.path().join("site")).unwrap();
        Self { home }
    }

    /// The working directory commands run in.
    fn path(&self) -> PathBuf {
        self.home.path().join("site")
    }
}

/// Helper to get a fieldsearch command running inside `env`.
fn fieldsearch(env: &TestEnv) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("fieldsearch").unwrap();
    cmd.env("HOME", env.home.path())
        .env_remove("FIELDSEARCH_LOG")
        .current_dir(env.path());
    cmd
}

/// Writes a site with config, field definitions and a seeded database.
///
/// Returns the id of the post carrying field values.
fn site(dir: &Path) -> i64 {
    fs::write(dir.join(".fieldsearch.toml"), CONFIG).unwrap();
    fs::write(dir.join("fields.toml"), FIELDS).unwrap();

    let store = SqliteStore::open(&dir.join("site.db"), StoreTables::default()).unwrap();
    store.create_schema().unwrap();
    let team = store
        .insert_post(&NewPost::new("Team page").content("Our people"))
        .unwrap();
    store
        .insert_meta(team, "team_0_member_name", "Ada Lovelace")
        .unwrap();
    store
        .insert_meta(team, "team_1_member_name", "Grace Hopper")
        .unwrap();
    store.insert_meta(team, "unrelated_key", "Ada").unwrap();

    let protected = store
        .insert_post(&NewPost::new("Protected").password("secret"))
        .unwrap();
    store.insert_meta(protected, "bio", "Ada notes").unwrap();

    store
        .insert_post(&NewPost::new("Blog").content("Ada wrote the first program"))
        .unwrap();
    team
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let env = TestEnv::new();
        fieldsearch(&env).arg("init").assert().success();

        let contents = fs::read_to_string(env.path().join(".fieldsearch.toml")).unwrap();
        assert!(contents.contains("# [store]"));
        assert!(contents.contains("# [registry]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let env = TestEnv::new();
        let sub = env.path();
        fs::write(sub.join(".fieldsearch.toml"), "existing").unwrap();

        fieldsearch(&env)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites_existing() {
        let env = TestEnv::new();
        let sub = env.path();
        fs::write(sub.join(".fieldsearch.toml"), "old content").unwrap();

        fieldsearch(&env).args(["init", "--force"]).assert().success();

        let contents = fs::read_to_string(sub.join(".fieldsearch.toml")).unwrap();
        assert!(!contents.contains("old content"));
    }
}

mod check {
    use super::*;

    #[test]
    fn no_config_is_fine() {
        let env = TestEnv::new();
        fieldsearch(&env)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No configuration files found."));
    }

    #[test]
    fn valid_site_has_no_issues() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found."))
            .stdout(predicate::str::contains("3 fields, 2 searchable"));
    }

    #[test]
    fn missing_registry_file_fails() {
        let env = TestEnv::new();
        site(&env.path());
        fs::remove_file(env.path().join("fields.toml")).unwrap();
        fieldsearch(&env)
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("field registry file does not exist"));
    }

    #[test]
    fn cyclic_fields_fail() {
        let env = TestEnv::new();
        site(&env.path());
        fs::write(
            env.path().join("fields.toml"),
            r#"
[[field]]
key = "a"
name = "a"
type = "repeater"
parent = "b"
searchable = true

[[field]]
key = "b"
name = "b"
type = "repeater"
parent = "a"
"#,
        )
        .unwrap();
        fieldsearch(&env)
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("field configuration"));
    }
}

mod fields {
    use super::*;

    #[test]
    fn lists_patterns() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .arg("fields")
            .assert()
            .success()
            .stdout(predicate::str::contains("^bio$"))
            .stdout(predicate::str::contains("^team_[0-9]+_member_name$"));
    }
}

mod keys {
    use super::*;

    #[test]
    fn lists_resolved_keys() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .arg("keys")
            .assert()
            .success()
            .stdout(predicate::str::contains("team_0_member_name"))
            .stdout(predicate::str::contains("team_1_member_name"))
            .stdout(predicate::str::contains("bio"))
            .stdout(predicate::str::contains("unrelated_key").not());
    }

    #[test]
    fn requires_database() {
        let env = TestEnv::new();
        fs::write(env.path().join(".fieldsearch.toml"), "root = true\n").unwrap();
        fieldsearch(&env)
            .arg("keys")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no database configured"));
    }
}

mod rewrite {
    use super::*;

    #[test]
    fn shows_rewritten_clause() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .args(["rewrite", "ada", "--plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("posts.post_content LIKE '%ada%'"))
            .stdout(predicate::str::contains(
                "fieldsearch_match.meta_key = 'team_0_member_name'",
            ))
            .stdout(predicate::str::contains(
                "COALESCE(posts.post_password, '') = ''",
            ))
            .stdout(predicate::str::contains("LEFT JOIN postmeta AS fieldsearch_meta"));
    }

    #[test]
    fn placeholder_markers_are_understood() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .args(["rewrite", "ada", "--plain", "--placeholder"])
            .assert()
            .success()
            .stdout(predicate::str::contains("'{9c1e5b7a}ada{9c1e5b7a}'"))
            .stdout(predicate::str::contains("fieldsearch_match.meta_key = 'bio'"));
    }
}

mod search {
    use super::*;

    #[test]
    fn finds_field_matches_but_not_protected_posts() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .args(["search", "ada"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Team page"))
            .stdout(predicate::str::contains("Blog"))
            .stdout(predicate::str::contains("Ada Lovelace"))
            .stdout(predicate::str::contains("Protected").not());
    }

    #[test]
    fn limit_applies() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .args(["search", "ada", "-n", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Blog"))
            .stdout(predicate::str::contains("Team page").not());
    }

    #[test]
    fn no_results() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .args(["search", "zzz"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No results."));
    }
}

mod excerpt {
    use super::*;

    #[test]
    fn builds_excerpt_for_post() {
        let env = TestEnv::new();
        let team = site(&env.path());
        fieldsearch(&env)
            .args(["excerpt", &team.to_string(), "hopper"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Grace Hopper Ada Lovelace"));
    }

    #[test]
    fn unknown_post_fails() {
        let env = TestEnv::new();
        site(&env.path());
        fieldsearch(&env)
            .args(["excerpt", "999", "ada"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no post with id 999"));
    }
}
