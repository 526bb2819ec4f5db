//! End-to-end tests for the `hbm` binary.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn hbm_bin() -> String {
    env!("CARGO_BIN_EXE_hbm").to_string()
}

/// Run `hbm` in `project` and return (stdout, stderr, success).
///
/// `DATABASE_URL` is cleared so the host environment cannot leak in; pass
/// `--database-url` explicitly.
fn run_hbm(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(hbm_bin())
        .args(args)
        .arg("--project-dir")
        .arg(project)
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute hbm with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn project() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("migrations")).unwrap();
    let url = dir.path().join("app.duckdb").display().to_string();
    (dir, url)
}

fn write_migration(project: &Path, name: &str, up: &str, down: &str) {
    fs::write(
        project.join("migrations").join(name),
        format!("-- +hbm Up\n{up}\n-- +hbm Down\n{down}\n"),
    )
    .unwrap();
}

fn status_json(project: &Path, url: &str) -> serde_json::Value {
    let (stdout, stderr, ok) = run_hbm(project, &["status", "--json", "--database-url", url]);
    assert!(ok, "status failed: {stderr}");
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("bad JSON ({e}): {stdout}"))
}

// ── Argument handling ──────────────────────────────────────────────────

#[test]
fn test_help_lists_commands() {
    let (stdout, _, ok) = run_hbm(Path::new("."), &["--help"]);
    assert!(ok);
    for command in ["migrate", "create", "status"] {
        assert!(stdout.contains(command), "missing {command}: {stdout}");
    }
}

#[test]
fn test_unknown_direction_fails() {
    let (dir, url) = project();
    let (_, stderr, ok) = run_hbm(
        dir.path(),
        &["migrate", "sideways", "--database-url", &url],
    );
    assert!(!ok);
    assert!(stderr.contains("sideways"), "{stderr}");
}

#[test]
fn test_unknown_command_fails() {
    let (dir, _url) = project();
    let (_, _, ok) = run_hbm(dir.path(), &["rollback"]);
    assert!(!ok);
}

#[test]
fn test_missing_database_url_fails_before_touching_anything() {
    let (dir, _url) = project();
    write_migration(
        dir.path(),
        "001_users.sql",
        "CREATE TABLE users (id INTEGER);",
        "DROP TABLE users;",
    );

    let (_, stderr, ok) = run_hbm(dir.path(), &["migrate", "up"]);

    assert!(!ok);
    assert!(stderr.contains("DATABASE_URL"), "{stderr}");
    assert!(!dir.path().join("app.duckdb").exists());
}

#[test]
fn test_database_url_from_environment() {
    let (dir, url) = project();
    write_migration(
        dir.path(),
        "001_users.sql",
        "CREATE TABLE users (id INTEGER);",
        "DROP TABLE users;",
    );

    let output = Command::new(hbm_bin())
        .args(["migrate", "up", "--project-dir"])
        .arg(dir.path())
        .env("DATABASE_URL", &url)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(Path::new(&url).exists());
}

// ── create ─────────────────────────────────────────────────────────────

#[test]
fn test_create_writes_template() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, stderr, ok) = run_hbm(dir.path(), &["create", "add_users"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("_add_users.sql"), "{stdout}");

    let files: Vec<_> = fs::read_dir(dir.path().join("migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 1);
    let name = &files[0];
    assert_eq!(name.len(), "YYYYMMDDHHMMSS_add_users.sql".len());
    assert!(name[..14].chars().all(|c| c.is_ascii_digit()), "{name}");

    let content = fs::read_to_string(dir.path().join("migrations").join(name)).unwrap();
    assert!(content.starts_with("-- +hbm Up\n"));
    assert_eq!(content.matches("-- +hbm Down").count(), 1);
}

#[test]
fn test_create_rejects_path_names() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, ok) = run_hbm(dir.path(), &["create", "../escape"]);
    assert!(!ok);
    assert!(stderr.contains("[E008]"), "{stderr}");
}

// ── migrate / status ───────────────────────────────────────────────────

#[test]
fn test_migrate_up_down_round_trip() {
    let (dir, url) = project();
    write_migration(
        dir.path(),
        "20240101000000_users.sql",
        "CREATE TABLE users (id INTEGER);",
        "DROP TABLE users;",
    );
    write_migration(
        dir.path(),
        "20240102000000_posts.sql",
        "CREATE TABLE posts (id INTEGER);",
        "DROP TABLE posts;",
    );

    let (stdout, stderr, ok) = run_hbm(dir.path(), &["migrate", "up", "--database-url", &url]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("Applied 2 migrations (batch 1)"), "{stdout}");
    let users = stdout.find("20240101000000_users.sql").unwrap();
    let posts = stdout.find("20240102000000_posts.sql").unwrap();
    assert!(users < posts);

    let (stdout, _, ok) = run_hbm(dir.path(), &["migrate", "up", "--database-url", &url]);
    assert!(ok);
    assert!(stdout.contains("Nothing to migrate."), "{stdout}");

    let status = status_json(dir.path(), &url);
    assert_eq!(status["applied"], 2);
    assert_eq!(status["pending"], 0);

    let (stdout, stderr, ok) = run_hbm(dir.path(), &["migrate", "down", "--database-url", &url]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("Rolled back 2 migrations (batch 1)"), "{stdout}");

    let status = status_json(dir.path(), &url);
    assert_eq!(status["applied"], 0);
    assert_eq!(status["pending"], 2);

    let (stdout, _, ok) = run_hbm(dir.path(), &["migrate", "down", "--database-url", &url]);
    assert!(ok);
    assert!(stdout.contains("Nothing to roll back."), "{stdout}");
}

#[test]
fn test_malformed_migration_exits_non_zero() {
    let (dir, url) = project();
    fs::write(
        dir.path().join("migrations").join("001_bad.sql"),
        "CREATE TABLE users (id INTEGER);\n",
    )
    .unwrap();

    let (_, stderr, ok) = run_hbm(dir.path(), &["migrate", "up", "--database-url", &url]);

    assert!(!ok);
    assert!(stderr.contains("[M002]"), "{stderr}");
    assert!(stderr.contains("001_bad.sql"), "{stderr}");
}

#[test]
fn test_failing_sql_exits_non_zero() {
    let (dir, url) = project();
    write_migration(dir.path(), "001_bad.sql", "CREATE TABLE;", "SELECT 1;");

    let (_, stderr, ok) = run_hbm(dir.path(), &["migrate", "up", "--database-url", &url]);

    assert!(!ok);
    assert!(stderr.contains("[M004]"), "{stderr}");
}

#[test]
fn test_missing_migrations_dir_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("app.duckdb").display().to_string();

    let (_, stderr, ok) = run_hbm(dir.path(), &["migrate", "up", "--database-url", &url]);

    assert!(!ok);
    assert!(stderr.contains("[M001]"), "{stderr}");
}

#[test]
fn test_config_file_sets_directory_table_and_url() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("configured.duckdb");
    fs::write(
        dir.path().join("hbm.yml"),
        format!(
            "migrations_dir: db/changes\ntable: applied_changes\ndatabase:\n  url: \"{}\"\n",
            db_path.display()
        ),
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("db/changes")).unwrap();
    fs::write(
        dir.path().join("db/changes/001_users.sql"),
        "-- +hbm Up\nCREATE TABLE users (id INTEGER);\n-- +hbm Down\nDROP TABLE users;\n",
    )
    .unwrap();

    let (_, stderr, ok) = run_hbm(dir.path(), &["migrate", "up"]);
    assert!(ok, "{stderr}");
    assert!(db_path.exists());

    let (stdout, stderr, ok) = run_hbm(dir.path(), &["status"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("ledger: applied_changes"), "{stdout}");
    assert!(stdout.contains("001_users.sql"), "{stdout}");
    assert!(stdout.contains("1 applied, 0 pending"), "{stdout}");
}
