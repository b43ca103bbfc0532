// chainforge-asm - encodes an assembly file and prints each word

use std::env;
use std::fs;
use std::process;

use chainforge::assembler::{encode, halves};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 || args[1] == "-h" || args[1] == "--help" {
        println!("Usage: {} <program.asm>", args[0]);
        println!();
        println!("Prints one line per instruction: the word in octal and the");
        println!("two six-bit halves stored in memory.");
        process::exit(if args.len() == 2 { 0 } else { 1 });
    }

    let source = match fs::read_to_string(&args[1]) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading '{}': {}", args[1], err);
            process::exit(1);
        }
    };

    for (number, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match encode(line) {
            Ok(word) => {
                let (high, low) = halves(word);
                println!("{:04o} ({}, {})", word, high, low);
            }
            Err(err) => {
                eprintln!("Error: line {}: {}", number + 1, err);
                process::exit(1);
            }
        }
    }
}
