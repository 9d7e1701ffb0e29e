//! eval-runner: headless runner for the performance evaluation engine.
//!
//! Usage:
//!   eval-runner seed --seed 42 --data-dir ./data
//!   eval-runner recalc --period 2025_H2 --previous 2025_H1
//!   eval-runner rankings --period 2025_H2
//!   eval-runner simulate --rule-type rank --draft draft.json
//!   eval-runner adopt --rule-type rank --draft draft.json --actor hr01 --reason "Q3 review"
//!   eval-runner logs
//!   eval-runner --ipc-mode            (JSON lines on stdin/stdout)
//!
//! `--db <path>` switches from the JSON data directory to SQLite.

use anyhow::{bail, Context, Result};
use perfeval_core::{
    audit::Actor,
    config::{AppSettings, RuleBook},
    engine::EvalEngine,
    ranking::RankingData,
    rules::RuleType,
    simulation::{DraftRules, SimulationOutcome},
    store::{JsonDirStore, RecordSet, RecordStore, SqliteStore},
    synthetic::{DatasetShape, SyntheticDataset},
};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Recalc {
        period: Option<String>,
        previous: Option<String>,
    },
    Rankings {
        period: Option<String>,
    },
    Simulate {
        rule_type: RuleType,
        period: Option<String>,
        drafts: DraftRules,
    },
    Logs,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = flag(&args, "--data-dir").unwrap_or("./data");
    let db = flag(&args, "--db");
    let command = (1..args.len())
        .find(|&i| !args[i].starts_with("--") && !takes_value(&args[i - 1]))
        .map(|i| args[i].as_str());

    match db {
        Some(path) => {
            log::info!("using sqlite store at {path}");
            let store = SqliteStore::open(path)?;
            store.migrate()?;
            run(store, &args, command, seed, ipc_mode)
        }
        None => {
            log::info!("using data directory {data_dir}");
            run(JsonDirStore::new(data_dir), &args, command, seed, ipc_mode)
        }
    }
}

fn run<S: RecordStore>(
    store: S,
    args: &[String],
    command: Option<&str>,
    seed: u64,
    ipc_mode: bool,
) -> Result<()> {
    let period = flag(args, "--period");
    let previous = flag(args, "--previous");

    if command == Some("seed") {
        return seed_dataset(store, seed, period);
    }

    let engine = EvalEngine::new(store)?;

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    match command {
        Some("recalc") => {
            let output = engine.recalculate(period, previous)?;
            let results = &output.evaluation_results;
            println!("=== RECALCULATION ===");
            println!("  period:     {}", results.period);
            println!("  evaluated:  {}", results.items.len());
            for item in &results.items {
                println!(
                    "  #{:<3} {:<10} {:<20} total {:>5.1}  rank {}  {}",
                    item.overall_rank,
                    item.employee_code,
                    item.employee_name,
                    item.total_score,
                    item.rank,
                    item.promotion_status
                );
            }
        }
        Some("rankings") => print_rankings(&engine.rankings(period)?),
        Some("simulate") => {
            let (rule_type, drafts) = read_draft(args)?;
            let outcome = engine.simulate(rule_type, drafts, period, previous)?;
            print_outcome(&outcome);
        }
        Some("adopt") => {
            let (rule_type, drafts) = read_draft(args)?;
            let actor_id = flag(args, "--actor").context("--actor is required")?;
            let actor = Actor {
                actor_id: actor_id.to_string(),
                actor_name: flag(args, "--actor-name").unwrap_or(actor_id).to_string(),
            };
            let reason = flag(args, "--reason").unwrap_or_default();
            let log = engine.adopt(rule_type, drafts, &actor, reason, period, previous)?;
            println!("adopted {} rules (log {})", log.rule_type, log.log_id);
            println!(
                "  changed {} of {} employee(s)",
                log.impact_summary.changed_employees, log.impact_summary.total_employees
            );
        }
        Some("logs") => {
            for log in engine.rule_change_logs()?.items {
                println!(
                    "{}  {:<11} {:<8} {:<12} {}",
                    log.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    log.rule_type.as_str(),
                    log.action.as_str(),
                    log.actor_id,
                    log.reason
                );
            }
        }
        Some(other) => bail!("unknown command: {other}"),
        None => bail!("no command given (seed, recalc, rankings, simulate, adopt, logs)"),
    }
    Ok(())
}

fn seed_dataset<S: RecordStore>(store: S, seed: u64, period: Option<&str>) -> Result<()> {
    let settings = AppSettings::default();
    let period = period.unwrap_or(&settings.default_period).to_string();
    let book = RuleBook::default_test();

    store.write_record_set(RecordSet::AppSettings, None, &settings)?;
    let engine = EvalEngine::with_settings(store, settings);
    engine.save_rule_book(&book)?;

    let dataset =
        SyntheticDataset::generate(seed, &period, DatasetShape::default(), &book.categories);
    dataset.write_to(engine.store())?;

    println!("seeded period {period} (seed {seed})");
    println!("  stores:     {}", dataset.stores.len());
    println!("  employees:  {}", dataset.employees.len());
    Ok(())
}

fn run_ipc_loop<S: RecordStore>(engine: &EvalEngine<S>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Recalc { period, previous } => engine
                .recalculate(period.as_deref(), previous.as_deref())
                .map(|o| serde_json::to_value(o.evaluation_results)),
            IpcCommand::Rankings { period } => engine
                .rankings(period.as_deref())
                .map(serde_json::to_value),
            IpcCommand::Simulate {
                rule_type,
                period,
                drafts,
            } => engine
                .simulate(rule_type, drafts, period.as_deref(), None)
                .map(serde_json::to_value),
            IpcCommand::Logs => engine.rule_change_logs().map(serde_json::to_value),
        };

        let value = match reply {
            Ok(value) => value?,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{value}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn read_draft(args: &[String]) -> Result<(RuleType, DraftRules)> {
    let rule_type: RuleType = flag(args, "--rule-type")
        .context("--rule-type is required")?
        .parse()?;
    let path = flag(args, "--draft").context("--draft is required")?;
    let content = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let drafts: DraftRules = serde_json::from_str(&content)?;
    Ok((rule_type, drafts))
}

fn print_rankings(ranking: &RankingData) {
    println!("=== RANKINGS {} ===", ranking.period);
    for entry in &ranking.overall {
        println!("  {:>3}  {}", entry.position, entry.employee_id);
    }
    for (role, entries) in &ranking.by_role {
        println!("  -- {role}: {} employee(s)", entries.len());
    }
    for (store_id, entries) in &ranking.by_store {
        println!("  -- {store_id}: {} employee(s)", entries.len());
    }
}

fn print_outcome(outcome: &SimulationOutcome) {
    let s = &outcome.summary;
    println!("=== SIMULATION {} {} ===", outcome.rule_type, outcome.period);
    println!("  employees:  {}", s.total_employees);
    println!("  changed:    {}", s.changed_employees);
    println!("  unchanged:  {}", s.unchanged_employees);
    println!("  rank up:    {}", s.rank_up_count);
    println!("  rank down:  {}", s.rank_down_count);
    println!("  promoted:   {}", s.promote_count);
    println!("  demoted:    {}", s.demote_count);
    for diff in outcome.diffs.iter().filter(|d| d.changed) {
        println!(
            "  {:<10} {} -> {}  {} -> {}",
            diff.employee_id,
            diff.before_rank,
            diff.after_rank,
            diff.before_promotion_status,
            diff.after_promotion_status
        );
    }
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Every `--flag` except `--ipc-mode` is followed by a value.
fn takes_value(arg: &str) -> bool {
    arg.starts_with("--") && arg != "--ipc-mode"
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
