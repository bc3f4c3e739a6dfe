//! Pasquim Compiler CLI
//!
//! Command-line interface for compiling Scheme programs to native
//! 32-bit x86 executables.

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapParser)]
#[command(name = "pasquimc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pasquim compiler - compile Scheme programs to 32-bit x86 executables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Scheme source file to a native executable
    Build {
        /// Input Scheme source file
        input: PathBuf,

        /// Output directory for compiled.s, rts.c and a.out
        /// (defaults to build/<input filename without extension>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after writing the assembly file; do not assemble or link
        #[arg(long)]
        asm_only: bool,

        /// Toolchain configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            asm_only,
            config,
        } => {
            let output = output.unwrap_or_else(|| {
                // Default: build/<input filename without extension>
                let stem = input.file_stem().unwrap_or_default();
                PathBuf::from("build").join(stem)
            });
            run_build(&input, &output, asm_only, config.as_deref());
        }
        Commands::Completions { shell } => {
            run_completions(shell);
        }
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "pasquimc", &mut io::stdout());
}

fn run_build(input: &Path, output: &Path, asm_only: bool, config_path: Option<&Path>) {
    let config = match config_path {
        Some(path) => match pasquimc::CompilerConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => pasquimc::CompilerConfig::default(),
    };

    if asm_only {
        let source = match std::fs::read_to_string(input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: Failed to read source file {}: {}", input.display(), e);
                process::exit(1);
            }
        };
        match pasquimc::emit_asm_file(&source, output) {
            Ok(asm_path) => println!("Wrote {}", asm_path.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match pasquimc::compile_file(input, output, &config) {
        Ok(exe_path) => {
            println!("Compiled {} -> {}", input.display(), exe_path.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
