use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use serde::Serialize;

use jlox_interpreter::{Discard, ExecStats, Interpreter};

#[derive(Parser, Debug)]
#[command(name = "jlox-bench", about = "Run jlox benchmarks")]
struct Cli {
    /// Specific test(s) to run (by name, e.g. fibonacci). If omitted, runs all discovered scripts.
    #[arg(short = 't', long = "test", action = ArgAction::Append)]
    tests: Vec<String>,

    /// Iterations per test (measured)
    #[arg(short = 'n', long = "iterations", default_value_t = 10)]
    iterations: u32,

    /// Warmup iterations (not measured)
    #[arg(short = 'w', long = "warmup", default_value_t = 2)]
    warmup: u32,

    /// Output JSON file path; default: benchmark/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// List discovered tests and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    avg_scan_ms: f64,
    avg_parse_ms: f64,
    avg_exec_ms: f64,
    statements: usize,
    calls: usize,
    scopes: usize,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    jlox_version: String,
    benchmarks: Vec<BenchResult>,
}

#[derive(Debug, Clone)]
struct ScriptCase {
    name: String,
    path: PathBuf,
}

#[derive(Debug, Default)]
struct Timings {
    totals: Vec<f64>,
    scans: Vec<f64>,
    parses: Vec<f64>,
    execs: Vec<f64>,
    last_stats: ExecStats,
}

fn workspace_root() -> PathBuf {
    // crates/jlox-bench -> crates -> root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

fn discover_scripts() -> Vec<ScriptCase> {
    let dir = workspace_root().join("benchmark/scripts");
    let mut out = Vec::new();
    if let Ok(entries) = fs::read_dir(&dir) {
        for e in entries.flatten() {
            let p = e.path();
            if p.extension().and_then(|s| s.to_str()) == Some("jlox") {
                let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
                out.push(ScriptCase { name, path: p });
            }
        }
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Scan, parse, and run `src` once, returning the time of each stage.
fn run_once(src: &str) -> Result<(Duration, Duration, Duration, ExecStats), String> {
    let mut t = Instant::now();
    let tokens = jlox_scanner::scan(src.lines()).map_err(|e| format!("scan error: {}", e))?;
    let t_scan = t.elapsed();

    t = Instant::now();
    let program = jlox_parser::parse(&tokens).map_err(|e| format!("parse error: {}", e))?;
    let t_parse = t.elapsed();

    t = Instant::now();
    let mut interp = Interpreter::with_output(Discard);
    interp.run(&program).map_err(|e| format!("runtime error: {}", e))?;
    let t_exec = t.elapsed();

    Ok((t_scan, t_parse, t_exec, interp.stats()))
}

fn measure_script(src: &str, iterations: u32, warmup: u32) -> Result<Timings, String> {
    for _ in 0..warmup {
        run_once(src)?;
    }

    let mut timings = Timings::default();
    for _ in 0..iterations {
        let t0 = Instant::now();
        let (t_scan, t_parse, t_exec, stats) = run_once(src)?;
        let total = t0.elapsed();

        timings.scans.push(dur_ms(t_scan));
        timings.parses.push(dur_ms(t_parse));
        timings.execs.push(dur_ms(t_exec));
        timings.totals.push(dur_ms(total));
        timings.last_stats = stats;
    }
    Ok(timings)
}

fn dur_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    if vals.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = vals.iter().sum::<f64>() / (vals.len() as f64);
    (avg, min, max)
}

fn fail(msg: String) -> ! {
    eprintln!("{}", msg);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let mut scripts = discover_scripts();

    if cli.list {
        println!("Discovered tests:");
        for s in &scripts {
            println!("- {} ({})", s.name, s.path.display());
        }
        return;
    }

    if !cli.tests.is_empty() {
        let wanted: std::collections::HashSet<_> = cli.tests.iter().map(|s| s.to_lowercase()).collect();
        scripts.retain(|s| wanted.contains(&s.name.to_lowercase()));
        if scripts.is_empty() {
            eprintln!("No matching tests. Use --list to see available.");
            std::process::exit(2);
        }
    }

    if scripts.is_empty() {
        eprintln!("No .jlox scripts found in benchmark/scripts.");
        std::process::exit(2);
    }

    let mut results = Vec::new();

    for case in &scripts {
        let src = fs::read_to_string(&case.path)
            .unwrap_or_else(|e| fail(format!("Failed to read {}: {}", case.path.display(), e)));
        let timings = measure_script(&src, cli.iterations, cli.warmup)
            .unwrap_or_else(|e| fail(format!("{}: {}", case.name, e)));
        let (avg_t, min_t, max_t) = stats(&timings.totals);
        let (avg_s, _, _) = stats(&timings.scans);
        let (avg_p, _, _) = stats(&timings.parses);
        let (avg_e, _, _) = stats(&timings.execs);
        let ExecStats { statements, calls, scopes } = timings.last_stats;

        println!(
            "{:>12}: total avg={:.3}ms min={:.3}ms max={:.3}ms | scan={:.3}ms parse={:.3}ms exec={:.3}ms | stmts={} calls={}",
            case.name, avg_t, min_t, max_t, avg_s, avg_p, avg_e, statements, calls
        );

        results.push(BenchResult {
            name: case.name.clone(),
            iterations: cli.iterations,
            avg_total_ms: avg_t,
            min_total_ms: min_t,
            max_total_ms: max_t,
            avg_scan_ms: avg_s,
            avg_parse_ms: avg_p,
            avg_exec_ms: avg_e,
            statements,
            calls,
            scopes,
        });
    }

    let out_path = match cli.output {
        Some(p) => p,
        None => {
            // Filename-safe timestamp
            let ts_file = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
            workspace_root().join("benchmark/results").join(format!("{}.json", ts_file))
        }
    };

    let doc = OutputDoc {
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        jlox_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };

    let json = serde_json::to_string_pretty(&doc).unwrap_or_else(|e| fail(format!("Failed to serialize results: {}", e)));
    if let Some(parent) = out_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            fail(format!("Failed to create {}: {}", parent.display(), e));
        }
    }
    if let Err(e) = fs::write(&out_path, json) {
        fail(format!("Failed to write {}: {}", out_path.display(), e));
    }

    println!("\nSaved results to {}", out_path.display());
}
