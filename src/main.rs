use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use std::io::{self, BufRead};
use std::process;

use osintfinder::cli::Args;
use osintfinder::output::OutputManager;
use osintfinder::types::{Config, OutputFormat, QueryType};
use osintfinder::{config, probes, server, utils, OsintEngine};

const BANNER: &str = r#"
  ____      _       _   _____ _           _
 / __ \    (_)     | | |  ___(_)         | |
| |  | |___ _ _ __ | |_| |_   _ _ __   __| | ___ _ __
| |  | / __| | '_ \| __|  _| | | '_ \ / _` |/ _ \ '__|
| |__| \__ \ | | | | |_| |   | | | | | (_| |  __/ |
 \____/|___/_|_| |_|\__|_|   |_|_| |_|\__,_|\___|_|

        Public-source lookups, one query at a time
"#;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if !args.silent {
        eprintln!("{}", BANNER);
    }

    let config = build_config(&args)?;

    if args.list_probes {
        list_probes(&config);
        return Ok(());
    }

    if args.serve {
        let bind = config.server.bind.clone();
        let engine = OsintEngine::new(config)?;
        server::serve(engine, &bind)
            .await
            .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;
        return Ok(());
    }

    let queries = get_queries_from_args(&args);
    if queries.is_empty() {
        error!("No input provided. Use -q <query>, -l <file>, pipe queries to stdin, or --serve");
        process::exit(1);
    }

    let output_manager = OutputManager::new(config.output.clone());
    let engine = OsintEngine::new(config)?;

    let mut reports = Vec::new();
    for query in &queries {
        match engine.search(query, args.query_type.as_deref(), None).await {
            Ok(report) => reports.push(report),
            Err(e) => warn!("Skipping {:?}: {}", query, e),
        }
    }

    output_manager.write_reports(&reports)?;

    info!("Completed {} of {} queries", reports.len(), queries.len());
    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match args.config_path.as_deref() {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };

    if let Some(output_file) = args.output_file.clone() {
        config.output.file = Some(output_file);
    }
    if args.verbose {
        config.output.verbose = true;
    }
    if args.json {
        config.output.format = OutputFormat::Json;
    }
    if args.html {
        config.output.format = OutputFormat::Html;
    }
    if let Some(bind) = args.bind.clone() {
        config.server.bind = bind;
    }

    Ok(config)
}

fn list_probes(config: &Config) {
    println!("Probes per query type:\n");

    for query_type in QueryType::ALL {
        let plan = probes::build_plan(query_type, config);
        println!("{} ({})", query_type, plan.len());
        for probe in plan {
            let info = probe.info();
            let marker = if info.uses_network { "" } else { " (offline)" };
            println!("  {}{}", info.name, marker);
        }
        println!();
    }
}

fn get_queries_from_args(args: &Args) -> Vec<String> {
    let mut queries = args.query.clone();

    if let Some(file_path) = &args.queries_file {
        match utils::read_lines(file_path) {
            Ok(lines) => queries.extend(lines),
            Err(e) => error!("Failed to read queries from file {:?}: {}", file_path, e),
        }
    }

    if args.use_stdin() {
        let stdin = io::stdin();
        queries.extend(stdin.lock().lines().map_while(|line| line.ok()));
    }

    queries
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}
