use anyhow::Context;
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use docname_core::{parse_name, replace_date};
use docname_jobs::{JobRunner, NamingConfig};
use docname_service::{init_tracing, routes};
use docname_store::InMemoryStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    let snapshot = Arg::new("snapshot")
        .long("snapshot")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON snapshot to load into the in-memory store");

    Command::new("docname")
        .version(docname_service::VERSION)
        .about("Canonical meeting-document names and activity numbers")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .default_value("docname.toml")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file (defaults apply when missing)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs as JSON lines"),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the naming API")
                .arg(snapshot.clone())
                .arg(
                    Arg::new("listen")
                        .long("listen")
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address, overrides the configuration"),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Print the naming preview of an agenda")
                .arg(snapshot)
                .arg(
                    Arg::new("agenda")
                        .long("agenda")
                        .required(true)
                        .help("Agenda ID"),
                ),
        )
        .subcommand(
            Command::new("parse-name")
                .about("Show the parts of a canonical name")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("replace-date")
                .about("Rewrite the date of a canonical name")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(value_parser!(NaiveDate))
                        .help("New date (YYYY-MM-DD)"),
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"))?;

    let config_path = matches
        .get_one::<PathBuf>("config")
        .context("missing --config")?;
    let config = NamingConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    match matches.subcommand() {
        Some(("serve", args)) => serve(config, args).await,
        Some(("preview", args)) => preview(config, args).await,
        Some(("parse-name", args)) => {
            let name = args.get_one::<String>("name").context("missing name")?;
            let parsed = parse_name(name)?;
            println!("date:      {}", parsed.date);
            println!("track:     {}", if parsed.special_track { "special" } else { "regular" });
            println!("purpose:   {} ({})", parsed.purpose, parsed.purpose.code());
            println!("remainder: {}", parsed.remainder);
            Ok(())
        }
        Some(("replace-date", args)) => {
            let name = args.get_one::<String>("name").context("missing name")?;
            let to = *args.get_one::<NaiveDate>("to").context("missing --to")?;
            println!("{}", replace_date(name, to));
            Ok(())
        }
        Some((other, _)) => anyhow::bail!("unknown subcommand: {other}"),
        None => anyhow::bail!("no subcommand given"),
    }
}

fn load_runner(config: NamingConfig, args: &ArgMatches) -> anyhow::Result<JobRunner> {
    let path = args
        .get_one::<PathBuf>("snapshot")
        .context("missing --snapshot")?;
    let store = InMemoryStore::from_json_file(path)?;
    Ok(JobRunner::new(Arc::new(store), config))
}

async fn serve(config: NamingConfig, args: &ArgMatches) -> anyhow::Result<()> {
    let addr = args
        .get_one::<SocketAddr>("listen")
        .copied()
        .unwrap_or(config.listen_addr);
    let runner = load_runner(config, args)?;

    let (bound, server) = warp::serve(routes(runner))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(%err, "cannot listen for shutdown signal");
            }
        })
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(addr = %bound, version = docname_service::VERSION, "docname service listening");
    server.await;
    tracing::info!("docname service stopped");
    Ok(())
}

async fn preview(config: NamingConfig, args: &ArgMatches) -> anyhow::Result<()> {
    let agenda = args.get_one::<String>("agenda").context("missing --agenda")?;
    let runner = load_runner(config, args)?;
    let preview = runner.preview(&agenda.as_str().into()).await?;
    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}
