//! Integration tests driving the command implementations directly.

use hbarchiv_cli::commands;
use std::fs;

#[test]
fn check_with_fix_repairs_the_tree() {
    let root = tempfile::tempdir().unwrap();
    let sub = root.path().join("M/Max Mustermann/Mein_Buch16/CD01/sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("track1.mp3"), b"x").unwrap();
    let cd2 = root.path().join("M/Max Mustermann/Mein_Buch16/CD02");
    fs::create_dir_all(&cd2).unwrap();
    fs::write(cd2.join("track2.mp3"), b"x").unwrap();

    let result = commands::check::run(root.path().to_str().unwrap(), true, false);

    assert!(result.is_ok());
    assert!(root
        .path()
        .join("M/Max Mustermann/Mein_Buch16/CD01/track1.mp3")
        .exists());
    assert!(!sub.exists());
}

#[test]
fn check_handles_a_missing_root_without_panicking() {
    let result = commands::check::run("/no/such/dir", false, false);
    assert!(result.is_ok());
}

#[test]
fn convert_dry_run_touches_nothing() {
    let root = tempfile::tempdir().unwrap();
    let book = root.path().join("M/Max Mustermann/Mein_Buch1");
    fs::create_dir_all(&book).unwrap();
    fs::write(book.join("track1.mp3"), b"x").unwrap();
    let out = tempfile::tempdir().unwrap();

    let result = commands::convert::run(
        root.path().to_str().unwrap(),
        out.path().to_str().unwrap(),
        2,
        None,
        true,
        true,
    );

    assert!(result.is_ok());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}
