use dice_groups::{Config, RollError};
use std::io::{self, BufRead, Write};

const USAGE: &str = "usage: roll [--config PATH] [TOKENS...]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut config = Config::default();
    let mut tokens = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or(USAGE)?;
                config = Config::load(&path)?;
                log::debug!("loaded config from {}", path);
            }
            "--help" | "-h" if tokens.is_empty() => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ => tokens.push(arg),
        }
    }

    if !tokens.is_empty() {
        return run(&config, &tokens.join(" "));
    }

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        run(&config, &line)?;
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}

/// Rolls one line. Bad input is reported and is not an error of the program.
fn run(config: &Config, line: &str) -> Result<(), Box<dyn std::error::Error>> {
    match dice_groups::roll_with(config, line) {
        Ok(_) => Ok(()),
        Err(why @ (RollError::Parse(_) | RollError::TooManyRolls(_))) => {
            println!("{}", why);
            Ok(())
        }
        Err(why) => Err(why.into()),
    }
}
