//! Pollinator ODE CLI - Run a scenario from JSON and print the table.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use pollinator_ode::{
    compute::{TableSummary, run_scenario},
    schema::Scenario,
};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <scenario.json> [--json] [-o output.csv]", program);
    eprintln!();
    eprintln!("Run a pollinator model scenario and write its time series.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  scenario.json  Path to scenario file (model, params, initial, integration)");
    eprintln!("  --json         Write the table as JSON instead of CSV");
    eprintln!("  -o <path>      Write to a file instead of stdout");
    eprintln!();
    eprintln!("Example scenarios are printed with --example.");
}

struct CliArgs {
    scenario_path: PathBuf,
    as_json: bool,
    output_path: Option<PathBuf>,
}

/// Parse everything after the program name. Flags may appear in any order;
/// the first remaining argument is the scenario path.
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut scenario_path = None;
    let mut as_json = false;
    let mut output_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => as_json = true,
            "-o" => {
                let path = iter.next().ok_or("-o requires a path")?;
                output_path = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag {}", flag)),
            path if scenario_path.is_none() => scenario_path = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument {}", extra)),
        }
    }

    Ok(CliArgs {
        scenario_path: scenario_path.ok_or("missing scenario path")?,
        as_json,
        output_path,
    })
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1..].iter().any(|a| a == "--example") {
        print_example_scenarios();
        return;
    }

    let cli = parse_args(&args[1..]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        std::process::exit(1);
    });
    let CliArgs {
        scenario_path,
        as_json,
        output_path,
    } = cli;

    // Load scenario
    let scenario_str = fs::read_to_string(&scenario_path).unwrap_or_else(|e| {
        eprintln!("Error reading scenario file: {}", e);
        std::process::exit(1);
    });

    let scenario: Scenario = serde_json::from_str(&scenario_str).unwrap_or_else(|e| {
        eprintln!("Error parsing scenario: {}", e);
        std::process::exit(1);
    });

    let integration = scenario.integration();
    log::info!(
        "Running {} model: dt={}, max_t={}, stepper={:?}",
        scenario.model_name(),
        integration.dt,
        integration.max_t,
        integration.stepper
    );

    let start = Instant::now();
    let table = run_scenario(&scenario).unwrap_or_else(|e| {
        eprintln!("Invalid scenario: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    let summary = TableSummary::from_table(&table);
    log::info!(
        "Finished in {:.3}s: {} rows, {} non-finite values",
        elapsed.as_secs_f32(),
        summary.rows,
        summary.non_finite
    );
    for column in &summary.columns {
        log::debug!(
            "  {}: min={:.6}, max={:.6}, last={:.6}",
            column.name,
            column.min,
            column.max,
            column.last
        );
    }

    let result = match &output_path {
        Some(path) => fs::File::create(path)
            .and_then(|file| write_table(&table, as_json, BufWriter::new(file))),
        None => write_table(&table, as_json, BufWriter::new(io::stdout().lock())),
    };

    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }
}

fn write_table<W: io::Write>(
    table: &pollinator_ode::Table,
    as_json: bool,
    mut writer: W,
) -> io::Result<()> {
    if as_json {
        serde_json::to_writer(&mut writer, table)?;
        writeln!(writer)?;
        writer.flush()
    } else {
        table.write_csv(writer)
    }
}

fn print_example_scenarios() {
    for scenario in Scenario::examples() {
        println!("Example {} scenario:", scenario.model_name());
        match serde_json::to_string_pretty(&scenario) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing example: {}", e),
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flags_before_path() {
        let cli = parse_args(&args(&["--json", "-o", "out.json", "scenario.json"])).unwrap();
        assert_eq!(cli.scenario_path, PathBuf::from("scenario.json"));
        assert!(cli.as_json);
        assert_eq!(cli.output_path, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_path_first() {
        let cli = parse_args(&args(&["scenario.json", "--json"])).unwrap();
        assert_eq!(cli.scenario_path, PathBuf::from("scenario.json"));
        assert!(cli.as_json);
        assert_eq!(cli.output_path, None);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(&args(&["--json"])).is_err());
        assert!(parse_args(&args(&["scenario.json", "-o"])).is_err());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_err());
        assert!(parse_args(&args(&["--verbose", "a.json"])).is_err());
    }
}
