//! Command-line front end: colors a DIMACS graph and prints the certificate

use anyhow::Context;
use clap::Parser;
use cliquecol_rs::branching::BranchingPolicy;
use cliquecol_rs::clique::OracleKind;
use cliquecol_rs::graph::dimacs;
use cliquecol_rs::model::{ColoringModel, PropagationMode};
use cliquecol_rs::solver::{Certifier, Options, Solution, Solver, Status, UpperBoundSource};
use cliquecol_rs::{cnf, Graph};
use log::error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "cliquecol")]
#[command(
    about = "Minimum graph coloring by clique preprocessing and constraint search",
    long_about = None
)]
struct Cli {
    /// Input graph in DIMACS format
    file: PathBuf,

    /// Branching policy: a name (size, size-sym, afc, activity, activity-size,
    /// degree-size, clique, afc-size, clique-pinned, random) or its id 0-9
    #[arg(short, long, default_value = "afc-size")]
    branch: BranchingPolicy,

    /// Growth factor of the restart cutoffs
    #[arg(long, default_value_t = 1.4)]
    scale: f64,

    /// Node cutoff of the first restart
    #[arg(long, default_value_t = 1000)]
    restart_base: u64,

    /// Clique propagation: bounds (0), domain (1) or pairwise (2)
    #[arg(short, long, default_value = "domain")]
    propagation: PropagationMode,

    /// Initial upper bound: greedy, trivial or a number
    #[arg(short, long, default_value = "greedy")]
    upper_bound: UpperBoundSource,

    /// Depth limit of restart nogoods (0 disables them)
    #[arg(short, long, default_value_t = 0)]
    nogood: usize,

    /// Time budget in seconds
    #[arg(short, long, default_value_t = 600.0)]
    timeout: f64,

    /// Run without a time budget
    #[arg(long, conflicts_with = "timeout")]
    no_timeout: bool,

    /// Cap on the estimated search memory, in MiB
    #[arg(long, value_name = "MIB")]
    memory_limit: Option<usize>,

    /// Number of search threads
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,

    /// Base seed of the tie-breaking generator
    #[arg(long, default_value_t = 13)]
    seed: u64,

    /// Clique oracle: greedy, exact or exact:<node limit>
    #[arg(long, default_value = "greedy")]
    oracle: OracleKind,

    /// Certificate backend: search, or sat when built with the `sat` feature
    #[arg(long, default_value = "search")]
    certifier: Certifier,

    /// Write the CNF asking for a coloring with one color fewer than found
    #[arg(long, value_name = "FILE")]
    dump_cnf: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> anyhow::Result<Options> {
        let timeout = if self.no_timeout {
            None
        } else {
            Some(Duration::try_from_secs_f64(self.timeout).context("invalid timeout")?)
        };
        Ok(Options {
            branching: self.branch,
            restart_scale: self.scale,
            restart_base: self.restart_base,
            propagation: self.propagation,
            upper_bound: self.upper_bound,
            nogood_limit: self.nogood,
            timeout,
            memory_limit: self.memory_limit.map(|mib| mib.saturating_mul(1 << 20)),
            threads: self.threads,
            seed: self.seed,
            oracle: self.oracle,
            certifier: self.certifier,
        })
    }
}

fn dump_cnf<W: Write>(
    out: &mut W,
    graph: &Graph,
    solution: &Solution,
    path: &Path,
) -> anyhow::Result<()> {
    let colors = solution.upper_bound().saturating_sub(1);
    let model = ColoringModel::completion(graph, colors, &vec![None; graph.num_vertices()]);
    let formula = cnf::encode(&model)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    formula.write_dimacs(BufWriter::new(file))?;
    writeln!(
        out,
        "cnf: {} ({} variables, {} clauses, {} colors)",
        path.display(),
        formula.num_variables,
        formula.num_clauses(),
        colors
    )?;
    Ok(())
}

/// Prints the results of a run; the certificate is always the last line
fn report<W: Write>(
    out: &mut W,
    graph: &Graph,
    solution: &Solution,
    cnf_path: Option<&Path>,
) -> anyhow::Result<()> {
    let stats = solution.statistics();
    writeln!(
        out,
        "LB {} cliques {} edges_removed {} preprocessing {:.3}s",
        solution.lower_bound(),
        stats.cliques(),
        stats.edges_removed(),
        stats.preprocessing_time().as_secs_f64()
    )?;
    for progress in solution.progress() {
        writeln!(
            out,
            "{:>9.3}s  UB {:>4}  nodes {}",
            progress.elapsed.as_secs_f64(),
            progress.upper_bound,
            progress.nodes
        )?;
    }
    if let Some(path) = cnf_path {
        dump_cnf(out, graph, solution, path)?;
    }
    writeln!(
        out,
        "Nodes: {} Time: {:.3}s status: {} X(G) = {}",
        stats.nodes(),
        stats.total_time().as_secs_f64(),
        solution.status(),
        solution.upper_bound()
    )?;
    let certificate: Vec<String> = solution.coloring().iter().map(ToString::to_string).collect();
    writeln!(out, "certificate: {}", certificate.join(" "))?;
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<Solution> {
    let options = cli.options()?;
    let graph = dimacs::read_file(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    println!(
        "{}: n {} m {} density {:.4}",
        cli.file.display(),
        graph.num_vertices(),
        graph.num_edges(),
        graph.density()
    );

    let solution = Solver::new(options).solve(&graph)?;
    let stdout = io::stdout();
    report(&mut stdout.lock(), &graph, &solution, cli.dump_cnf.as_deref())?;
    Ok(solution)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(solution) if solution.status() == Status::Optimal => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
