use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;

const CONFIG: &str = r#"
recast:
  groups:
    default:
      User: UserTransformer
    admin:
      User: AdminUserTransformer
transformers:
  UserTransformer:
    fields:
      id: id
      name: name
    includes:
      posts: posts
  AdminUserTransformer:
    fields:
      id: id
      name: name
      email: email
"#;

fn write_project(dir: &Path) {
    std::fs::write(dir.join("recast.yaml"), CONFIG).unwrap();
    std::fs::write(
        dir.join("user.json"),
        r#"{"type": "User", "id": 1, "name": "Ann", "email": "ann@example.com", "posts": ["p1"]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("users.json"),
        r#"[{"type": "User", "id": 1, "name": "Ann"}, {"type": "User", "id": 2, "name": "Bo"}]"#,
    )
    .unwrap();
}

fn config_arg(dir: &Path) -> String {
    dir.join("recast.yaml").to_str().unwrap().to_string()
}

#[test]
fn test_transform_single_record_with_default() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("user.json"))
        .assert()
        .success()
        .stdout("{\"id\":1,\"name\":\"Ann\"}\n");
}

#[test]
fn test_transform_collection_with_explicit_transformer() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("users.json"))
        .args(["--transformer", "UserTransformer"])
        .assert()
        .success()
        .stdout("[{\"id\":1,\"name\":\"Ann\"},{\"id\":2,\"name\":\"Bo\"}]\n");
}

#[test]
fn test_transform_collection_without_transformer_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("users.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("explicitly set"));
}

#[test]
fn test_transform_with_group_and_includes() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("user.json"))
        .args(["--include", "posts"])
        .assert()
        .success()
        .stdout("{\"id\":1,\"name\":\"Ann\",\"posts\":[\"p1\"]}\n");

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("user.json"))
        .args(["--group", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"email\":\"ann@example.com\""));
}

#[test]
fn test_transform_unknown_group_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("user.json"))
        .args(["--group", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown transformer group"));
}

#[test]
fn test_transform_scalar_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    std::fs::write(dir.path().join("scalar.json"), "42").unwrap();

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("scalar.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("only records and collections"));
}

#[test]
fn test_transform_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform", "-"])
        .write_stdin(r#"{"type": "User", "id": 3, "name": "Cy"}"#)
        .assert()
        .success()
        .stdout("{\"id\":3,\"name\":\"Cy\"}\n");
}

#[test]
fn test_init_then_groups() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("recast")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .success();
    assert!(dir.path().join("recast.yaml").exists());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "groups"])
        .assert()
        .success()
        .stdout("* default (0 bindings)\n");

    // A second init must not overwrite the file
    cargo_bin_cmd!("recast")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_groups_lists_bindings() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "groups"])
        .assert()
        .success()
        .stdout(
            "  admin (1 bindings)\n    User -> AdminUserTransformer\n\
             * default (1 bindings)\n    User -> UserTransformer\n",
        );
}

#[test]
fn test_transform_escape_flags() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    std::fs::write(
        dir.path().join("site.json"),
        r#"{"type": "User", "id": 3, "name": "Zoë/admin"}"#,
    )
    .unwrap();

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("site.json"))
        .assert()
        .success()
        .stdout("{\"id\":3,\"name\":\"Zoë/admin\"}\n");

    cargo_bin_cmd!("recast")
        .args(["--config", &config_arg(dir.path()), "transform"])
        .arg(dir.path().join("site.json"))
        .args(["--escape-slashes", "--escape-unicode"])
        .assert()
        .success()
        .stdout("{\"id\":3,\"name\":\"Zo\\u00eb\\/admin\"}\n");
}
