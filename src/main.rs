use clap::{Arg, Command};
use log::LevelFilter;
use phishscan::classifier::Label;
use phishscan::config::Config;
use phishscan::history::{ClassificationRecord, HistoryWriter};
use phishscan::pipeline::Pipeline;
use phishscan::FEATURE_NAMES;
use std::process;

#[tokio::main]
async fn main() {
    let matches = Command::new("phishscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Classifies a URL as safe or phishing from 30 URL and page heuristics")
        .arg(
            Arg::new("url")
                .value_name("URL")
                .help("URL to classify")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write a default configuration file and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .help("Skip all network fetches; evaluators use their documented fallbacks")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("explain")
                .long("explain")
                .help("Print the per-feature score breakdown")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        if let Err(e) = Config::default().to_file(path) {
            eprintln!("Failed to write configuration to {path}: {e}");
            process::exit(2);
        }
        println!("Default configuration written to {path}");
        return;
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration {path}: {e}");
                process::exit(2);
            }
        },
        None => Config::default(),
    };

    let Some(url) = matches.get_one::<String>("url") else {
        eprintln!("No URL given; see --help");
        process::exit(2);
    };

    let pipeline = match Pipeline::new(&config, matches.get_flag("offline")) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Failed to initialize pipeline: {e}");
            process::exit(2);
        }
    };

    // Exit codes keep the verdict and pipeline failures distinct: 0 safe,
    // 1 phishing, 2 classification failed.
    match pipeline.classify(url).await {
        Ok(verdict) => {
            println!(
                "{url}: {} (probability {:.4})",
                verdict.label, verdict.probability
            );

            if matches.get_flag("explain") {
                for (name, score) in FEATURE_NAMES.iter().zip(verdict.features.values()) {
                    println!("  {name:>22} {score:>2}");
                }
            }

            if let Some(path) = &config.history_path {
                let writer = HistoryWriter::new(path);
                let record = ClassificationRecord::new(url, &verdict, "cli");
                if let Err(e) = writer.append(&record) {
                    log::warn!("failed to append history record: {e}");
                }
            }

            process::exit(match verdict.label {
                Label::Safe => 0,
                Label::Phishing => 1,
            });
        }
        Err(e) => {
            eprintln!("Classification failed: {e}");
            process::exit(2);
        }
    }
}
