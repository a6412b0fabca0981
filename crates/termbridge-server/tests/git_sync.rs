use std::path::Path;
use std::process::Command;

use termbridge_server::GitSyncConfig;
use termbridge_server::git_sync::GitSync;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn sync_commits_and_pushes_and_tolerates_clean_tree() {
    if !git_available() {
        eprintln!("git not installed; skipping");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let remote = dir.path().join("remote.git");
    let work = dir.path().join("work");
    std::fs::create_dir_all(&remote).unwrap();
    std::fs::create_dir_all(&work).unwrap();

    git(&remote, &["init", "--bare"]);
    git(&work, &["init"]);
    git(&work, &["checkout", "-b", "main"]);
    git(&work, &["config", "user.email", "sync@example.com"]);
    git(&work, &["config", "user.name", "Sync Test"]);
    git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
    std::fs::write(work.join("README"), "value sets\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "initial"]);
    git(&work, &["push", "origin", "main"]);

    let config = GitSyncConfig {
        enabled: true,
        repo_path: Some(work.clone()),
        ..GitSyncConfig::default()
    };
    let sync = GitSync::from_config(&config).unwrap();

    std::fs::write(work.join("value_sets.csv"), "Value Set OID,Code,Display\n").unwrap();
    sync.sync().await.expect("sync with changes");

    let log = Command::new("git")
        .arg("-C")
        .arg(&remote)
        .args(["log", "-1", "--format=%s", "main"])
        .output()
        .unwrap();
    assert_eq!(
        String::from_utf8_lossy(&log.stdout).trim(),
        "Auto-sync from web button"
    );

    // Clean tree: commit reports nothing to do, push still succeeds.
    sync.sync().await.expect("sync without changes");
}
