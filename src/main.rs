// chainforge - builds the command-block computer and writes its listing

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use chainforge::assembler::encode_program;
use chainforge::codegen::output::run_backend;
use chainforge::codegen::session::CodeGen;
use chainforge::computer::build_computer;
use chainforge::computer::card::{Card, PrintRegisterCard};
use chainforge::config::GeneratorConfig;
use chainforge::CompilerError;

fn main() {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config_file: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut name: Option<String> = None;
    let mut backend: Option<PathBuf> = None;
    let mut program_file: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                output_dir = Some(PathBuf::from(value_of(&args, i)));
                i += 2;
            }
            "--name" => {
                name = Some(value_of(&args, i).to_string());
                i += 2;
            }
            "--config" => {
                config_file = Some(PathBuf::from(value_of(&args, i)));
                i += 2;
            }
            "--backend" => {
                backend = Some(PathBuf::from(value_of(&args, i)));
                i += 2;
            }
            "--program" => {
                program_file = Some(PathBuf::from(value_of(&args, i)));
                i += 2;
            }
            "-v" | "--verbose" => {
                verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            arg => {
                eprintln!("Error: Unknown option '{}'", arg);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let mut config = match &config_file {
        Some(path) => GeneratorConfig::load(path).unwrap_or_else(|err| {
            eprintln!("Error: {}", err);
            process::exit(1);
        }),
        None => GeneratorConfig::default(),
    };
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(name) = name {
        config.name = name;
    }
    if backend.is_some() {
        config.backend = backend;
    }

    let program = match &program_file {
        Some(path) => match fs::read_to_string(path) {
            Ok(source) => encode_program(&source).unwrap_or_else(|err| {
                eprintln!("Error in '{}': {}", path.display(), err);
                process::exit(1);
            }),
            Err(err) => {
                eprintln!("Error reading '{}': {}", path.display(), err);
                process::exit(1);
            }
        },
        None => Vec::new(),
    };

    if let Err(err) = generate(&config, &program, verbose) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn generate(config: &GeneratorConfig, program: &[u16], verbose: bool) -> Result<(), CompilerError> {
    let mut cg = CodeGen::new();
    let cards: Vec<Box<dyn Card>> = vec![Box::new(PrintRegisterCard::new(&mut cg)?)];
    let listing = build_computer(cg, &cards, program)?;

    let listing_path = config.listing_path();
    listing.write_to(&listing_path)?;
    if verbose {
        println!(
            "Wrote {} blocks ({} program words) to {}",
            listing.len(),
            program.len(),
            listing_path.display()
        );
    }

    if let Some(backend) = &config.backend {
        let schematic = config.schematic_path();
        run_backend(backend, &listing_path, &schematic)?;
        if verbose {
            println!("Schematic written to {}", schematic.display());
        }
    }
    Ok(())
}

fn value_of<'a>(args: &'a [String], i: usize) -> &'a str {
    if i + 1 >= args.len() {
        eprintln!("Error: {} requires a value", args[i]);
        process::exit(1);
    }
    &args[i + 1]
}

fn print_usage(program_name: &str) {
    println!("Usage: {} [options]", program_name);
    println!();
    println!("Options:");
    println!("  -o, --output <dir>     Listing directory (default: generated)");
    println!("  --name <name>          Base file name (default: computer)");
    println!("  --config <file>        TOML configuration file");
    println!("  --backend <exe>        Listing-to-schematic converter");
    println!("  --program <file>       Assembly source preloaded at address 0");
    println!("  -v, --verbose          Verbose output");
    println!("  -h, --help             Show this help message");
}
