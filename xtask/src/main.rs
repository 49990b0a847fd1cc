use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "snakify";

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install snakify binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run snakify with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to snakify")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for snakify-core"))
                .subcommand(Command::new("bin").about("Run tests for snakify-bin"))
                .subcommand(Command::new("integration").about("Run integration tests"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", args)) => handle_install_command(args),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn handle_install_command(_args: &ArgMatches) -> Result<()> {
    println!("Installing snakify...");
    let status = process::Command::new("cargo")
        .args(["install", "--path", "crates/snakify-bin"])
        .status()?;

    if status.success() {
        println!("✓ snakify installed successfully");
    } else {
        anyhow::bail!("Failed to install snakify");
    }

    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    println!("Building and running snakify...");

    let run_args: Vec<String> = args.get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let mut command = process::Command::new("cargo");
    command.args(["run", "--bin", BIN_NAME, "--"]);

    if !run_args.is_empty() {
        command.args(&run_args);
    }

    let status = command.status()?;

    if !status.success() {
        anyhow::bail!("Failed to run snakify");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => cargo(&["test", "--package", "snakify-core"], "Core tests failed"),
        Some(("bin", _args)) => cargo(&["test", "--package", "snakify-bin"], "Binary tests failed"),
        Some(("integration", _args)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for snakify-core");
            println!("  bin          - Run tests for snakify-bin");
            println!("  integration  - Run integration tests");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    println!("🧪 Running all tests for the snakify project...\n");

    let suites: [(&str, fn() -> Result<()>); 5] = [
        ("snakify-core tests", || {
            cargo(&["test", "--package", "snakify-core"], "Core tests failed")
        }),
        ("snakify-bin tests", || {
            cargo(&["test", "--package", "snakify-bin"], "Binary tests failed")
        }),
        ("workspace tests", || cargo(&["test", "--workspace"], "Workspace tests failed")),
        ("documentation tests", || {
            cargo(&["test", "--doc", "--package", "snakify-core"], "Documentation tests failed")
        }),
        ("integration tests", test_integration),
    ];

    let mut all_passed = true;
    for (name, suite) in suites {
        println!("▶ Running {}...", name);
        match suite() {
            Ok(()) => println!("✅ {} passed", name),
            Err(e) => {
                all_passed = false;
                println!("❌ {} failed: {:?}", name, e);
            }
        }
        println!();
    }

    if all_passed {
        println!("🎉 All tests passed successfully!");
    } else {
        println!("💥 Some tests failed. Please check the output above.");
        anyhow::bail!("Test suite failed");
    }

    Ok(())
}

fn test_integration() -> Result<()> {
    cargo(&["test", "--package", "snakify-core", "--test", "pipeline"], "Pipeline tests failed")?;
    cargo(&["build", "--bin", BIN_NAME], "Failed to build snakify binary")?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--help"], "CLI help command failed")?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--version"], "CLI version command failed")?;
    Ok(())
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("{}", failure);
    }
    Ok(())
}
