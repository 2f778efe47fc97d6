use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use calcline::environment::Environment;
use calcline::evaluator::Evaluator;
use calcline::line::Line;
use calcline::script;

#[derive(ClapParser, Debug)]
#[command(version, about = "Line-oriented arithmetic script interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to calcline.log
    #[arg(long, global = true)]
    log: bool,

    /// Pre-register a variable, e.g. `$X=3` or `@A=1,2,3` (repeatable)
    #[arg(long = "define", short = 'D', value_name = "NAME=VALUE", global = true)]
    defines: Vec<String>,

    /// Start without the built-in functions
    #[arg(long, global = true)]
    no_prelude: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parses every line and prints its kind and symbols
    Tokenize {
        filename: Option<PathBuf>,

        /// Print each parsed line as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluates the first statement of the input and prints the result
    Evaluate { filename: Option<PathBuf> },

    /// Evaluates every line of the input in order
    Run { filename: Option<PathBuf> },
}

/// Reads a file, or stdin when no file is given.
fn read_source(filename: Option<PathBuf>) -> Result<String> {
    let mut buf = Vec::new();

    match filename {
        Some(filename) => {
            info!("Reading file: {:?}", filename);
            let file =
                File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
            let mut reader = BufReader::new(file);

            reader
                .read_to_end(&mut buf)
                .context(format!("Failed to read file {:?}", filename))?;
        }
        None => {
            info!("Reading stdin");
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
        }
    }

    info!("Read {} bytes", buf.len());

    String::from_utf8(buf).context("Input is not valid UTF-8")
}

fn init_logger() -> Result<()> {
    let log_file = File::create("calcline.log").context("Failed to create calcline.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'calcline::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("calcline::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to calcline.log");
    Ok(())
}

/// Builds the session environment from the global options.
fn build_environment(args: &Cli) -> Result<Environment> {
    let mut env = if args.no_prelude {
        Environment::new()
    } else {
        Environment::with_prelude()
    };

    for define in &args.defines {
        let (name, value) = define
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected NAME=VALUE, got '{}'", define))?;

        env.register_variable(name.trim(), value.trim())
            .context(format!("Invalid --define '{}'", define))?;
    }

    Ok(env)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let mut env = build_environment(&args)?;

    match args.commands {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");
            let source = read_source(filename)?;
            let mut tokenized = true;

            for (line_no, text) in script::statements(&source) {
                match Line::parse(text) {
                    Ok(line) if json => {
                        println!("{}", serde_json::to_string(&line)?);
                    }

                    Ok(line) => {
                        let symbols: Vec<String> =
                            line.symbols().iter().map(|s| s.lexeme()).collect();

                        println!(
                            "{:?} {} {}",
                            line.kind(),
                            line.target().unwrap_or("-"),
                            line.payload()
                                .map(str::to_string)
                                .unwrap_or_else(|| symbols.join(" "))
                        );
                    }

                    Err(e) => {
                        tokenized = false;
                        debug!("Tokenization debug: {}", e);
                        eprintln!("[line {}] Error: {}", line_no, e);
                    }
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code 65");
                std::process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Evaluate { filename } => {
            info!("Running Evaluate subcommand");
            let source = read_source(filename)?;

            let Some((line_no, text)) = script::statements(&source).into_iter().next() else {
                println!("No statement was provided. Exiting...");
                std::process::exit(0);
            };

            let mut line = match Line::parse(text) {
                Ok(line) => line,
                Err(e) => {
                    debug!("Parse debug: {}", e);
                    eprintln!("[line {}] Error: {}", line_no, e);
                    std::process::exit(65);
                }
            };

            let mut evaluator = Evaluator::new(&mut env);

            match evaluator.evaluate(&mut line) {
                Ok(value) => {
                    debug!("Evaluated to: {}", value);
                    println!("{}", value);
                }
                Err(e) => {
                    debug!("Evaluation debug: {}", e);
                    eprintln!("[line {}] Error: {}", line_no, e);
                    std::process::exit(70);
                }
            }

            info!("Evaluate subcommand completed");
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");
            let source = read_source(filename)?;

            let mut evaluator = Evaluator::new(&mut env);
            let mut exit_code = 0;

            for outcome in script::run(&mut evaluator, &source) {
                match outcome.result {
                    Ok(value) => println!("{}", value),
                    Err(e) => {
                        debug!("Runtime debug: {} in '{}'", e, outcome.source);
                        eprintln!("[line {}] Error: {}", outcome.line_no, e);

                        if e.is_syntax() {
                            exit_code = 65;
                        } else if exit_code == 0 {
                            exit_code = 70;
                        }
                    }
                }
            }

            if exit_code != 0 {
                std::process::exit(exit_code);
            }

            info!("Program executed successfully");
        }
    }

    Ok(())
}
