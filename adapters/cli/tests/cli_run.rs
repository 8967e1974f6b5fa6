use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sapper"))
        .args(args)
        .output()
        .expect("failed to launch sapper binary")
}

fn exported_map(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("map: "))
        .expect("output ends with an exported map")
        .to_owned()
}

const SMALL_RUN: [&str; 10] = [
    "--width",
    "10",
    "--height",
    "8",
    "--population",
    "6",
    "--generations",
    "4",
    "--seed",
    "3",
];

#[test]
fn prints_map_fitness_and_export() {
    let output = run(&SMALL_RUN);
    assert!(output.status.success(), "sapper exited with {:?}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let grid_rows: Vec<_> = stdout.lines().take(8).collect();
    assert!(grid_rows.iter().all(|row| row.chars().count() == 10));
    assert!(grid_rows[0].starts_with('A'));
    assert!(stdout.contains("fitness: "));
    assert!(exported_map(&stdout).starts_with("sapper:v1:10x8:"));
}

#[test]
fn identical_seeds_print_identical_output() {
    let first = run(&SMALL_RUN);
    let second = run(&SMALL_RUN);

    assert_eq!(first.stdout, second.stdout, "runs with one seed diverged");
}

#[test]
fn exported_map_is_accepted_as_seed() {
    let first = run(&SMALL_RUN);
    let exported = exported_map(&String::from_utf8_lossy(&first.stdout));

    let mut args = SMALL_RUN.to_vec();
    args.extend(["--seed-map", exported.as_str()]);
    let second = run(&args);

    assert!(second.status.success(), "seeded run failed: {:?}", second.status);
}

#[test]
fn malformed_seed_map_fails_with_message() {
    let mut args = SMALL_RUN.to_vec();
    args.extend(["--seed-map", "maze:v1:10x8:AAAA"]);

    let output = run(&args);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to decode seed map 0"), "stderr: {stderr}");
}

#[test]
fn target_outside_map_is_rejected() {
    let mut args = SMALL_RUN.to_vec();
    args.extend(["--target", "30,30"]);

    let output = run(&args);

    assert!(!output.status.success());
}
