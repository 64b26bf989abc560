//! Establishment address lookup executable
//!
//! Reads a CSV of establishments, searches each one, parses the address
//! found on the results page and writes the completed CSV.

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use lookup_core::{
    AddressNormalizer, LookupConfig, LookupOrchestrator, NormalizerMode, RecordStore, SearchClient,
    street_only,
};
use std::path::Path;

fn cli() -> Command {
    Command::new("address-lookup")
        .version("1.0.0")
        .about("Looks up missing postal addresses of establishments")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("JSON configuration file (defaults and ADDRESS_LOOKUP__* variables otherwise)")
        )
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .value_name("FILE")
                .help("Input CSV file")
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Output CSV file")
        )
        .arg(
            Arg::new("report")
                .long("report")
                .value_name("FILE")
                .help("Write a JSON run report")
        )
        .arg(
            Arg::new("min-delay-ms")
                .long("min-delay-ms")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .help("Minimum pause between lookups")
        )
        .arg(
            Arg::new("max-delay-ms")
                .long("max-delay-ms")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .help("Maximum pause between lookups")
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Only look up the first N records; the others are written unchanged")
        )
        .arg(
            Arg::new("basic")
                .long("basic")
                .help("Keep the full city name of well-formed addresses")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("no-follow-up")
                .long("no-follow-up")
                .help("Disable the street-only follow-up search")
                .action(ArgAction::SetTrue)
        )
        .subcommand(
            Command::new("normalize")
                .about("Parse a single address text and print it as JSON")
                .arg(Arg::new("text").required(true).value_name("TEXT"))
                .arg(
                    Arg::new("street-only")
                        .long("street-only")
                        .help("Print only the leading number and street")
                        .action(ArgAction::SetTrue)
                )
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<LookupConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let config = LookupConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path))?;
            log::info!("Loaded configuration from {}", path);
            config
        }
        None => LookupConfig::from_env().context("Failed to load configuration")?,
    };

    if let Some(input) = matches.get_one::<String>("input") {
        config.files.input_path = input.clone();
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.files.output_path = output.clone();
    }
    if let Some(report) = matches.get_one::<String>("report") {
        config.files.report_path = Some(report.clone());
    }
    if let Some(min) = matches.get_one::<u64>("min-delay-ms") {
        config.pacing.min_delay_ms = *min;
    }
    if let Some(max) = matches.get_one::<u64>("max-delay-ms") {
        config.pacing.max_delay_ms = *max;
    }
    if matches.get_flag("basic") {
        config.normalizer.mode = NormalizerMode::Basic;
    }
    if matches.get_flag("no-follow-up") {
        config.normalizer.follow_up_query = false;
    }

    config.validate()?;
    Ok(config)
}

fn run_normalize(config: &LookupConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let text = matches
        .get_one::<String>("text")
        .context("Missing address text")?;

    if matches.get_flag("street-only") {
        println!("{}", street_only(text));
        return Ok(());
    }

    let parsed = AddressNormalizer::new(config.normalizer.mode).normalize(text);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

async fn run_lookup(config: &LookupConfig, limit: Option<usize>) -> anyhow::Result<()> {
    let store = RecordStore::new(config.columns.clone());
    let mut table = store
        .read_path(&config.files.input_path)
        .with_context(|| format!("Failed to read {}", config.files.input_path))?;
    log::info!("Using input file: {}", config.files.input_path);

    let limit = limit.unwrap_or(table.records.len()).min(table.records.len());
    let untouched = table.records.split_off(limit);
    if !untouched.is_empty() {
        log::info!("Limiting lookup to {} records, {} left unchanged", limit, untouched.len());
    }

    let search_client = SearchClient::new(config.search.clone())?;
    let orchestrator = LookupOrchestrator::from_config(search_client, config);

    let records = std::mem::take(&mut table.records);
    let processed = orchestrator.process_records(records).await;

    table.records = processed.records;
    table.records.extend(untouched);

    store
        .write_path(&config.files.output_path, &table)
        .with_context(|| format!("Failed to write {}", config.files.output_path))?;
    log::info!("✅ Wrote {} records to {}", table.records.len(), config.files.output_path);

    if let Some(report_path) = &config.files.report_path {
        let json = processed.run.to_json_pretty()?;
        std::fs::write(Path::new(report_path), json)
            .with_context(|| format!("Failed to write report {}", report_path))?;
        log::info!("Wrote run report to {}", report_path);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    if let Some(sub_matches) = matches.subcommand_matches("normalize") {
        return run_normalize(&config, sub_matches);
    }

    let limit = matches.get_one::<usize>("limit").copied();
    run_lookup(&config, limit).await
}
