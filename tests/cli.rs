use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn web_cleaner() -> Command {
    Command::cargo_bin("web-cleaner").unwrap()
}

#[test]
fn test_cleans_project_folder() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("public/app.js")
        .write_str("console.log(\"hi\"); // debug\nfunction f(){ /* note */ return 1; }\nconsole.error(\"x\");\nalert(\"y\");")
        .unwrap();
    temp.child("public/img/logo.png")
        .write_binary(&[0x89, 0x50, 0x4e, 0x47, 0x00, 0x2f, 0x2f])
        .unwrap();

    web_cleaner()
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned project has been saved to:"))
        .stdout(predicate::str::contains("cleaned"));

    temp.child("cleaned/app.js")
        .assert("\nfunction f(){  return 1; }\nconsole.error(\"x\");\nalert(\"y\");");
    temp.child("cleaned/img/logo.png")
        .assert(predicate::path::eq_file(temp.child("public/img/logo.png").path()));
}

#[test]
fn test_missing_public_dir_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("index.html").write_str("<p></p>").unwrap();

    web_cleaner()
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not contain a 'public' directory"));

    temp.child("cleaned").assert(predicate::path::missing());
}

#[test]
fn test_not_a_directory_fails() {
    let temp = assert_fs::TempDir::new().unwrap();

    web_cleaner()
        .arg(temp.child("nowhere").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid project folder"));
}

#[test]
fn test_output_override() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("site/public/style.css")
        .write_str("a{} /* x */")
        .unwrap();

    web_cleaner()
        .arg(temp.child("site").path())
        .arg("--out")
        .arg(temp.child("dist").path())
        .assert()
        .success();

    temp.child("dist/style.css").assert("a{} ");
    temp.child("site/cleaned").assert(predicate::path::missing());
}

#[test]
fn test_dry_run_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("public/index.html").write_str("<!-- a -->").unwrap();
    temp.child("public/data.txt").write_str("plain").unwrap();

    let output = web_cleaner()
        .arg(temp.path())
        .args(["--dry-run", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(stats["cleaned_files"], 1);
    assert_eq!(stats["copied_files"], 1);
    assert_eq!(stats["dry_run"], true);
    temp.child("cleaned").assert(predicate::path::missing());
}
