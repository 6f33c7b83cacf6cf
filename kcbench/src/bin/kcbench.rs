//! Runs the approximate and exact k-center solvers on every instance of a directory
//! and writes results in results_method1.csv (exact) and results_method2.csv (approximate).
//!
//! kcbench --dir TestCases --timeout 30 --grace 5 --out . --passes 100
//!
//! Instances are OR-Library pmed files, see [kcbench::io].

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;

use kcbench::tester::*;
use kcenter::prelude::*;

struct BenchParams {
    dir: PathBuf,
    out: PathBuf,
    deadline: DeadlineArg,
    farthest: FarthestArg,
}

fn parse_cmd(matches: &ArgMatches) -> anyhow::Result<BenchParams> {
    log::debug!("in parse_cmd");
    let dir = matches
        .get_one::<String>("dir")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("missing dir"))?;
    let out = matches
        .get_one::<String>("out")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("missing out"))?;
    let timeout = *matches
        .get_one::<u64>("timeout")
        .ok_or_else(|| anyhow::anyhow!("missing timeout"))?;
    let grace = *matches
        .get_one::<u64>("grace")
        .ok_or_else(|| anyhow::anyhow!("missing grace"))?;
    let passes = *matches
        .get_one::<usize>("passes")
        .ok_or_else(|| anyhow::anyhow!("missing passes"))?;
    //
    Ok(BenchParams {
        dir,
        out,
        deadline: DeadlineArg::new(
            Duration::from_secs(60 * timeout),
            Duration::from_secs(grace),
        ),
        farthest: FarthestArg::new(passes),
    })
} // end of parse_cmd

//=====================================================================

pub fn main() -> anyhow::Result<()> {
    //
    let _ = env_logger::builder().try_init();
    //
    log::info!("\n\n running kcbench");
    //
    let matches = Command::new("kcbench")
        .arg(
            Arg::new("dir")
                .long("dir")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .default_value("TestCases")
                .help("directory of instance files"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .default_value(".")
                .help("directory where csv reports are written"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .default_value("30")
                .help("time given to exact search in minutes"),
        )
        .arg(
            Arg::new("grace")
                .long("grace")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .default_value("5")
                .help("seconds given to a cancelled search to stop"),
        )
        .arg(
            Arg::new("passes")
                .long("passes")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .default_value("100")
                .help("maximum number of local search passes"),
        )
        .get_matches();
    //
    let params = parse_cmd(&matches)?;
    log::info!(
        "instances in {:?}, reports in {:?}, timeout : {:?}, grace : {:?}, passes : {}",
        params.dir,
        params.out,
        params.deadline.get_timeout(),
        params.deadline.get_grace(),
        params.farthest.get_max_passes()
    );
    //
    let tester = ProblemTester::new(params.farthest, BranchBoundArg::default(), params.deadline);
    let nb_done = tester.run_directory(&params.dir, &params.out)?;
    log::info!("kcbench done, {} instances processed", nb_done);
    //
    Ok(())
} // end of main
