use assert_cmd::Command;
use predicates::str::contains;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("cozy-cli").unwrap();
    cmd.env("COZY_CONFIG_DIR", std::env::temp_dir().join("cozy-cli-no-config"))
        .env_remove("COZY_ENV")
        .env_remove("MONGODB_URI")
        .env("RUST_LOG", "error");
    cmd
}

#[test]
fn help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("serve"))
        .stdout(contains("seed"))
        .stdout(contains("migrate"));
}

#[test]
fn seed_into_memory_store_reports_five_books() {
    cli()
        .args(["--backend", "memory", "seed"])
        .assert()
        .success()
        .stdout(contains("removed 0 books, 5 books inserted, indexes on title, author"));
}

#[test]
fn migrate_into_memory_store() {
    cli()
        .args(["migrate", "--backend", "memory"])
        .assert()
        .success()
        .stdout(contains("applied 2 index migrations"));
}

#[test]
fn unknown_environment_fails() {
    cli()
        .env("COZY_ENV", "qa")
        .args(["--backend", "memory", "seed"])
        .assert()
        .failure();
}
