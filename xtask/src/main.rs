use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for tickline")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Clone, Copy)]
enum Task {
    /// fmt, clippy, test and doc, stopping at the first failure
    Check,
    /// Verify formatting
    Fmt,
    /// Lint every target with warnings denied
    Clippy,
    /// Run the unit tests of every crate
    Test,
    /// Build rustdoc without dependencies
    Doc,
    /// Time the spatial query and registry update loops
    Bench,
}

impl Task {
    fn cargo_args(self) -> &'static [&'static str] {
        match self {
            Task::Check => &[],
            Task::Fmt => &["fmt", "--all", "--", "--check"],
            Task::Clippy => &[
                "clippy",
                "--workspace",
                "--all-targets",
                "--",
                "-D",
                "warnings",
            ],
            Task::Test => &["test", "--workspace"],
            Task::Doc => &["doc", "--workspace", "--no-deps"],
            Task::Bench => &["bench", "-p", "tickline-ecs", "--bench", "bench_spatial_query"],
        }
    }

    fn expand(self) -> Vec<Task> {
        match self {
            Task::Check => vec![Task::Fmt, Task::Clippy, Task::Test, Task::Doc],
            task => vec![task],
        }
    }
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .context("failed to spawn cargo")?;
    if !status.success() {
        bail!("cargo {} failed ({status})", args[0]);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for task in cli.task.expand() {
        cargo(task.cargo_args())?;
    }
    Ok(())
}
