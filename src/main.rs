use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process;
use std::sync::Arc;

use anyhow::Context;
use colored::*;
use scanintranet::{
    config::ScanConfig,
    scanner::{ScanEngine, ScanSummary},
    storage::{ConsoleSink, DatabaseLocation, InventorySink, PostgresSink, TableLayout},
    utils::Logger,
};

fn build_cli() -> Command {
    Command::new("scanintranet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scan the local network segment and store one inventory row per neighbor")
        .arg(
            Arg::new("create")
                .short('C')
                .long("create")
                .help("Create database table before scanning")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("subnet")
                .short('s')
                .long("subnet")
                .value_name("CIDR")
                .help("Subnet swept for live hosts (e.g. 192.168.178.0/24)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file (default: ~/.scanintranet.toml)"),
        )
        .arg(
            Arg::new("ping")
                .short('p')
                .long("ping")
                .help("Ping hosts the sweep did not report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("basic")
                .long("basic")
                .help("Write only IP, Hostname, ScanTime and State")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .value_name("NAME")
                .help("Target table name"),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print records as JSON lines instead of writing to the database")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (repeatable)")
                .action(ArgAction::Count),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ScanConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ScanConfig::from_toml_file(path)
            .with_context(|| format!("cannot load config {}", path))?,
        None => ScanConfig::load_default_config(),
    };

    if let Some(subnet) = matches.get_one::<String>("subnet") {
        config.subnet = subnet.clone();
    }
    if let Some(table) = matches.get_one::<String>("table") {
        config.table_name = table.clone();
    }
    if matches.get_flag("basic") {
        config.layout = TableLayout::Basic;
    }
    config.create_table |= matches.get_flag("create");
    config.ping_hosts |= matches.get_flag("ping");
    config.dry_run |= matches.get_flag("dry-run");

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn open_sink(config: &ScanConfig) -> anyhow::Result<Arc<dyn InventorySink>> {
    if config.dry_run {
        return Ok(Arc::new(ConsoleSink::stdout(config.table_name.clone(), config.layout)));
    }

    let location = DatabaseLocation::from_env().context("Database connection err")?;
    let sink = PostgresSink::connect(&location, config.table_name.clone(), config.layout)
        .await
        .context("Database connection err")?;
    Ok(Arc::new(sink))
}

fn print_summary(summary: &ScanSummary) {
    eprintln!(
        "{} Scan at {} finished",
        "[✓]".bright_green(),
        summary.scan_time.format("%Y-%m-%d %H:%M:%S").to_string().bright_cyan()
    );
    eprintln!(
        "    neighbors {}  inserted {}  skipped {}  unresolved {}  alive {}",
        summary.lines_seen.to_string().bold(),
        summary.inserted.to_string().bright_green(),
        summary.skipped.to_string().bright_yellow(),
        summary.unresolved.to_string().bright_yellow(),
        summary.alive.to_string().bright_green(),
    );
}

async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(matches)?;
    let sink = open_sink(&config).await?;

    eprintln!(
        "{} Scanning {} into {}{}",
        "[~]".bright_blue(),
        config.subnet.bright_cyan(),
        config.table_name.bright_cyan(),
        if config.dry_run { " (dry run)" } else { "" }
    );

    let engine = ScanEngine::new(config, sink)?;
    let summary = engine.scan().await.context("scan aborted")?;
    print_summary(&summary);
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();
    Logger::init(matches.get_count("verbose"));

    if let Err(e) = run(&matches).await {
        eprintln!("{} {:#}", "[!]".bright_red(), e);
        process::exit(1);
    }
}
