use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    pieces_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let pieces_path = dir.path().join("pieces.json");
        fs::write(
            &pieces_path,
            r#"{
                "pieces": [
                    { "name": "front", "points": [[0, 0], [200, 0], [200, 300], [0, 300]] },
                    { "name": "back", "points": [[0, 0], [200, 0], [200, 300], [0, 300]] },
                    { "name": "sleeve", "points": [[0, 0], [120, 0], [60, 180]] }
                ]
            }"#,
        )
        .unwrap();
        Self { dir, pieces_path }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn nestforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nestforge"))
        .args(args)
        .output()
        .expect("Failed to run nestforge")
}

fn search(ctx: &TestContext, extra: &[&str]) -> Output {
    let mut args = vec![
        "search",
        "--pieces",
        ctx.pieces_path.to_str().unwrap(),
        "--population-size",
        "20",
        "--generations",
        "8",
        "--elite-size",
        "2",
    ];
    args.extend_from_slice(extra);
    nestforge(&args)
}

fn capture(stdout: &str, pattern: &str) -> String {
    let re = Regex::new(pattern).unwrap();
    re.captures(stdout)
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", pattern, stdout))[1]
        .to_string()
}

#[test]
fn test_search_reports_result() {
    let ctx = TestContext::new();
    let out = search(&ctx, &["--seed", "7"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    assert_eq!(capture(&stdout, r"Generations: (\d+)"), "8");
    let fitness: f64 = capture(&stdout, r"Best fitness: ([\d.]+)").parse().unwrap();
    assert!(fitness >= 0.0);
    assert_eq!(capture(&stdout, r"Fingerprint: ([0-9a-f]+)").len(), 64);
    assert!(stdout.contains("sleeve"));
    assert!(Regex::new(r"Gen\s+0 \| Best").unwrap().is_match(&stdout));
}

#[test]
fn test_seeded_search_is_reproducible() {
    let ctx = TestContext::new();
    let a = search(&ctx, &["--seed", "1234"]);
    let b = search(&ctx, &["--seed", "1234"]);
    let fp = |o: &Output| {
        capture(
            &String::from_utf8_lossy(&o.stdout),
            r"Fingerprint: ([0-9a-f]+)",
        )
    };
    assert_eq!(fp(&a), fp(&b));
}

#[test]
fn test_search_writes_history_and_placement_then_check_reads_it() {
    let ctx = TestContext::new();
    let history = ctx.path("history.csv");
    let placement = ctx.path("best.json");

    let out = search(
        &ctx,
        &[
            "--seed",
            "3",
            "--history",
            history.to_str().unwrap(),
            "--output",
            placement.to_str().unwrap(),
        ],
    );
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let csv = fs::read_to_string(&history).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("generation,best_index,best_fitness,mean_fitness")
    );
    assert_eq!(lines.count(), 8);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&placement).unwrap()).unwrap();
    assert_eq!(json["pieces"].as_array().unwrap().len(), 3);
    assert_eq!(json["pieces"][2]["name"], "sleeve");

    let out = nestforge(&[
        "check",
        "--pieces",
        ctx.pieces_path.to_str().unwrap(),
        "--placement",
        placement.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(Regex::new(r"Overlapping pairs: \d+").unwrap().is_match(&stdout));
    assert!(Regex::new(r"Feasible: (yes|no)").unwrap().is_match(&stdout));
}

#[test]
fn test_check_reports_pieces_as_drawn() {
    let ctx = TestContext::new();
    let out = nestforge(&["check", "--pieces", ctx.pieces_path.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(out.status.success());

    // All three outlines start at the origin.
    assert_eq!(capture(&stdout, r"Overlapping pairs: (\d+)"), "3");
    assert_eq!(capture(&stdout, r"Out of bounds: (\d+)"), "0");
    assert!(stdout.contains("Feasible: no"));
}

#[test]
fn test_config_file_with_cli_override() {
    let ctx = TestContext::new();
    let config = ctx.path("config.json");
    fs::write(
        &config,
        r#"{
            "evolution": {
                "population_size": 12,
                "generations": 50,
                "fitness_mode": "bounding_box"
            }
        }"#,
    )
    .unwrap();

    let out = nestforge(&[
        "search",
        "--pieces",
        ctx.pieces_path.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--generations",
        "2",
        "--seed",
        "5",
    ]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(capture(&stdout, r"Generations: (\d+)"), "2");
}

#[test]
fn test_invalid_configuration_exits_non_zero() {
    let ctx = TestContext::new();
    let out = search(&ctx, &["--crossover-rate", "1.5"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("crossover_rate"), "stderr: {}", stderr);

    let out = nestforge(&["search", "--pieces", "missing.json"]);
    assert!(!out.status.success());
}
