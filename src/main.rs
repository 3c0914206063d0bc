use clap::Parser;
use swingscan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
