// src/main.rs

use detdag::{cli, logging, run};

fn main() {
    if let Err(err) = run_main() {
        eprintln!("detdag error: {err:?}");
        std::process::exit(1);
    }
}

fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    if let Some(result) = run(&args)? {
        println!(
            "run complete: {} completed, {} in DLQ; result written to {}",
            result.completed().len(),
            result.dlq().len(),
            args.output
        );
    }
    Ok(())
}
