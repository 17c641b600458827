use clap::Parser;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tapemachine::{
    MachineConfig, OutOfBoundsPolicy, Outcome, Program, ProgramLoader, ProgramManager, Symbol,
    TuringMachine,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tapemachine -p program.json -t 1011
  tapemachine --builtin \"busy beaver 2\" --infinite
  cat program.json | tapemachine -t 10 --quiet")]
struct Cli {
    /// The JSON program file to execute. Read from stdin when omitted and input is piped.
    #[clap(short, long)]
    program: Option<PathBuf>,

    /// Run a bundled program by name
    #[clap(short, long, conflicts_with = "program")]
    builtin: Option<String>,

    /// List the bundled programs and exit
    #[clap(long)]
    list: bool,

    /// Print the "tape-format" and "output-format" of a program file and exit
    #[clap(long, value_name = "FILE")]
    explain: Option<PathBuf>,

    /// The tape, one symbol per character
    #[clap(short, long)]
    tape: Option<String>,

    /// A JSON file holding the tape as a string or a list of symbols
    #[clap(long, conflicts_with = "tape")]
    tape_file: Option<PathBuf>,

    /// Grow the tape with blanks instead of failing when the head runs off either end
    #[clap(short, long)]
    infinite: bool,

    /// Only print whether the machine halts on the given tape
    #[clap(short, long)]
    accepts: bool,

    /// Do not print each transition
    #[clap(short, long)]
    quiet: bool,

    /// Require a rule for every state and symbol before running
    #[clap(short = 'e', long)]
    ensure_transitions: bool,

    /// Stop after this many steps
    #[clap(short, long)]
    max_steps: Option<usize>,
}

impl Cli {
    fn config(&self) -> MachineConfig {
        MachineConfig {
            out_of_bounds: if self.infinite {
                OutOfBoundsPolicy::Extend
            } else {
                OutOfBoundsPolicy::Fail
            },
            ensure_exhaustive: self.ensure_transitions,
            verbose: !self.quiet,
            max_steps: self.max_steps,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        list_programs();
        return Ok(());
    }

    if let Some(path) = &cli.explain {
        return explain(path);
    }

    let program = load_program(cli)?;
    let tape = load_tape(cli, &program)?;
    let config = cli.config();
    debug!(?config, program = %program.name, cells = tape.len(), "starting machine");

    let mut machine = TuringMachine::from_program(&program, tape, &config)?;

    if cli.accepts {
        println!("{}", machine.accepts(config.max_steps));
        return Ok(());
    }

    println!("Machine start!");
    println!("Tape output (without blanks)");
    println!("{:?}", machine.tape().trimmed());
    if config.verbose {
        println!("\nBeginning simulation...");
    }

    let result = machine.run_with(config.max_steps, |machine| {
        if config.verbose {
            print_step(machine);
        }
    });

    match &result.outcome {
        Outcome::Halted => println!("\nFinished after {} steps!", result.steps),
        Outcome::StepLimitReached => println!("\nStopped after {} steps", result.steps),
        Outcome::Failed(_) => dump_machine(&machine),
    }
    println!("Tape output (without blanks)");
    println!("{:?}", machine.tape().trimmed());

    match result.outcome {
        Outcome::Failed(error) => Err(error.into()),
        _ => Ok(()),
    }
}

/// Loads the program from `--builtin`, `--program`, or piped stdin, in that order.
fn load_program(cli: &Cli) -> Result<Program, Box<dyn Error>> {
    if let Some(name) = &cli.builtin {
        Ok(ProgramManager::get_program_by_name(name)?)
    } else if let Some(path) = &cli.program {
        Ok(ProgramLoader::load_program(path)?)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(ProgramLoader::load_program_from_string(&buffer)?)
    } else {
        Err("No program given. Use --program, --builtin, or pipe a program on stdin".into())
    }
}

/// The tape from `--tape` or `--tape-file`, falling back to the tape bundled with the program.
fn load_tape(cli: &Cli, program: &Program) -> Result<Vec<Symbol>, Box<dyn Error>> {
    if let Some(text) = &cli.tape {
        Ok(text.chars().map(String::from).collect())
    } else if let Some(path) = &cli.tape_file {
        Ok(ProgramLoader::load_tape(path)?)
    } else {
        Ok(program.initial_tape())
    }
}

fn list_programs() {
    for index in 0..ProgramManager::get_program_count() {
        if let Ok(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:>2}. {} ({} states, {} rules, tape {:?})",
                info.index, info.name, info.state_count, info.transition_count, info.initial_tape
            );
        }
    }
}

/// Prints the format notes of a program file. The file only needs to be valid JSON.
fn explain(path: &Path) -> Result<(), Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file {}: {}", path.display(), e))?;
    let document: serde_json::Value = serde_json::from_str(&content)?;

    let field = |key: &str| {
        document
            .get(key)
            .and_then(|value| value.as_str())
            .unwrap_or("<not provided>")
            .to_string()
    };

    println!("==== Expected tape input format: ====");
    println!("{}", field("tape-format"));
    println!();
    println!("==== Expected tape output format: ====");
    println!("{}", field("output-format"));

    Ok(())
}

fn print_step(machine: &TuringMachine) {
    if let Some(record) = machine.last_step() {
        println!(
            "Step {}: {} | read {:?} wrote {:?} | head={} tape={}",
            machine.step_count(),
            record.transition,
            record.read,
            record.written,
            record.head,
            machine.tape()
        );
    }
}

fn dump_machine(machine: &TuringMachine) {
    println!("\nCurrent State: {}", machine.state());
    match machine.symbol() {
        Some(symbol) => println!("At: {} (tape={:?})", machine.head(), symbol),
        None => println!("At: {} (off the tape)", machine.head()),
    }
    println!("{}", machine.tape());
}
