//! Exercises the compiled binary end to end: runs `level-population`
//! against a tempdir with small parameters and checks the output
//! file's shape.

use std::fs;
use std::process::Command;

#[test]
fn level_population_file_conserves_block_count_per_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_smq-harness"))
        .args([
            "level-population",
            "--nr-blocks",
            "256",
            "--nr-levels",
            "16",
            "--nr-generations",
            "5",
            "--hits-per-generation",
            "500",
            "--out-dir",
        ])
        .arg(dir.path())
        .status()
        .expect("spawn smq-harness");
    assert!(status.success());

    let contents = fs::read_to_string(dir.path().join("level_population.dat")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5);

    for line in lines {
        let cols: Vec<u32> = line
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect();
        assert_eq!(cols.len(), 16);
        assert_eq!(cols.iter().sum::<u32>(), 256);
    }
}
