use std::process::ExitCode;

use rad_io::ModelFile;
use rad_model::Model;
use tracing_subscriber::EnvFilter;

fn usage() {
    eprintln!("usage: rad-cli <command> <args>");
    eprintln!("  info <deck>          print title, counts and bounds");
    eprintln!("  check <deck>         load and validate, exit 1 on failure");
    eprintln!("  convert <in> <out>   load a deck and write it back out");
    eprintln!("  stats <deck>         print statistics as JSON");
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_info(model: &Model) {
    let stats = model.statistics();
    if let Some(version) = &stats.version {
        println!("version: {version}");
    }
    println!("{}", stats.format());
    let [cx, cy, cz] = model.center();
    println!("Center: ({cx}, {cy}, {cz})");
}

fn load(path: &str) -> Result<ModelFile, ExitCode> {
    let mut file = ModelFile::new();
    if file.load(path) {
        Ok(file)
    } else {
        eprintln!(
            "load error: {}",
            file.last_error().unwrap_or("unknown error")
        );
        Err(ExitCode::from(1))
    }
}

fn run(args: &[String]) -> Result<(), ExitCode> {
    tracing::debug!(?args, "rad-cli invoked");
    match args {
        [cmd, deck] if cmd == "info" => {
            let file = load(deck)?;
            print_info(file.model());
        }
        [cmd, deck] if cmd == "check" => {
            let file = load(deck)?;
            let rejected = file.last_summary().map(|s| s.rejected).unwrap_or(0);
            println!(
                "ok: {} nodes, {} elements, {rejected} rejected lines",
                file.model().node_count(),
                file.model().element_count()
            );
        }
        [cmd, input, output] if cmd == "convert" => {
            let mut file = load(input)?;
            if !file.save(output) {
                eprintln!(
                    "write error: {}",
                    file.last_error().unwrap_or("unknown error")
                );
                return Err(ExitCode::from(1));
            }
        }
        [cmd, deck] if cmd == "stats" => {
            let file = load(deck)?;
            let json = rad_io::statistics_json(file.model()).map_err(|err| {
                eprintln!("json error: {err}");
                ExitCode::from(1)
            })?;
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    eprintln!("json error: {err}");
                    return Err(ExitCode::from(1));
                }
            }
        }
        _ => {
            usage();
            return Err(ExitCode::from(2));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}
