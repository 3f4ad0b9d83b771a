// Rust Report Engine - Main executable
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Arg, ArgMatches, Command};
use log::{info, warn};

use rust_report_engine::{
    api::Server,
    chart::ChartFamily,
    data::RowSet,
    report::{ParameterBinder, ParameterExtractor, ParameterKind, ParameterSpec},
    runner::{HttpTransport, ReportTransport, ReportView, RunOutcome},
    storage::{BindingCache, FavoritesStore, FileStore, KeyValueStore, MemoryStore},
    table::{export_file_name, ExportScope, SortDirection, SortState},
    utils::{init_logging, init_logging_with_file, Config},
};

type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Rows printed to the terminal before truncating
const PREVIEW_ROWS: usize = 20;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = Command::new("Rust Report Engine")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Parameterized report runner with charts, tables and export")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            Command::new("server")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .short('H')
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("params")
                .about("List the parameters of a query template file")
                .arg(Arg::new("file").required(true).help("Template file")),
        )
        .subcommand(
            Command::new("list")
                .about("List available reports")
                .arg(Arg::new("favorites").long("favorites").help("Only favorite reports"))
                .arg(
                    Arg::new("search")
                        .short('s')
                        .long("search")
                        .value_name("TEXT")
                        .help("Match display name or description")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Run a report once")
                .arg(Arg::new("report").required(true).help("Report name"))
                .arg(
                    Arg::new("param")
                        .short('p')
                        .long("param")
                        .value_name("KEY=VALUE")
                        .help("Sets a parameter value")
                        .takes_value(true)
                        .multiple_occurrences(true),
                )
                .arg(
                    Arg::new("chart")
                        .long("chart")
                        .value_name("FAMILY")
                        .help("Chart family: bar, line, pie or donut")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .value_name("TEXT")
                        .help("Only rows containing TEXT")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .value_name("COLUMN")
                        .help("Sort rows by COLUMN")
                        .takes_value(true),
                )
                .arg(Arg::new("desc").long("desc").help("Sort descending"))
                .arg(
                    Arg::new("export")
                        .long("export")
                        .value_name("FILE")
                        .help("Export rows as delimited text; '-' picks a dated file name")
                        .takes_value(true),
                )
                .arg(Arg::new("all").long("all").help("Export every row, ignoring filter and sort")),
        )
        .subcommand(
            Command::new("watch")
                .about("Run a report on the polling interval until Ctrl-C")
                .arg(Arg::new("report").required(true).help("Report name")),
        )
        .subcommand(
            Command::new("favorite")
                .about("Toggle a report in the favorites")
                .arg(Arg::new("report").required(true).help("Report name")),
        )
        .get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(config_path) => match Config::from_file(config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading config file: {}", err);
                Config::default()
            }
        },
        None => Config::default(),
    };

    // Initialize logging
    let logger = match &config.logging.file {
        Some(path) => init_logging_with_file(config.log_level_filter(), path),
        None => init_logging(config.log_level_filter()),
    };
    if let Err(err) = logger {
        eprintln!("Error initializing logger: {}", err);
    }

    match matches.subcommand() {
        Some(("server", sub)) => serve(&config, sub).await,
        Some(("params", sub)) => show_parameters(sub),
        Some(("list", sub)) => list_reports(&config, sub).await,
        Some(("run", sub)) => run_report(&config, sub).await,
        Some(("watch", sub)) => watch_report(&config, sub).await,
        Some(("favorite", sub)) => toggle_favorite(&config, sub).await,
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            Ok(())
        }
    }
}

async fn serve(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let mut settings = config.server.clone();
    if let Some(host) = matches.value_of("host") {
        settings.host = host.to_string();
    }
    if let Some(port) = matches.value_of("port") {
        settings.port = port.parse().with_context(|| format!("invalid port: {}", port))?;
    }

    Server::new(settings)
        .with_delimiter(config.export.delimiter)
        .run()
        .await?;
    Ok(())
}

fn show_parameters(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = matches.value_of("file").unwrap_or_default();
    let template = fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?;

    let names = ParameterExtractor::new().extract(&template);
    if names.is_empty() {
        println!("No parameters");
        return Ok(());
    }

    let binder = ParameterBinder::new();
    for name in names {
        let spec = ParameterSpec::new(&name, ParameterKind::infer_from_name(&name));
        println!("{:<24} {:<10} {}", name, format!("{:?}", spec.kind).to_lowercase(), binder.default_value(&spec));
    }
    Ok(())
}

async fn list_reports(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.backend)?;
    let favorites = FavoritesStore::load(open_store(config))?;

    let reports = transport.list_reports().await?;
    let search = matches.value_of("search").unwrap_or_default();
    let shown = favorites.filter_reports(&reports, matches.is_present("favorites"), search);

    for report in &shown {
        let marker = if favorites.contains(&report.report_name) { "*" } else { " " };
        println!("{} {:<32} {:<16} {}", marker, report.report_name, report.category, report.display_name);
    }
    println!("{} of {} reports", shown.len(), reports.len());
    Ok(())
}

async fn run_report(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let name = matches.value_of("report").unwrap_or_default();
    let (view, cache) = open_view(config, name).await?;

    for pair in matches.values_of("param").into_iter().flatten() {
        let (key, value) = match pair.split_once('=') {
            Some(kv) => kv,
            None => bail!("parameter must be KEY=VALUE: {}", pair),
        };
        view.set_parameter(key.trim(), value);
    }
    if let Some(family) = matches.value_of("chart") {
        view.select_chart_family(family.parse::<ChartFamily>().map_err(anyhow::Error::msg)?);
    }

    match view.run_now().await? {
        RunOutcome::Empty => {
            println!("The report returned no rows.");
            return Ok(());
        }
        outcome => info!("Run finished: {:?}", outcome),
    }
    cache.set(name, &view.binding())?;

    if let Some(chart) = view.chart() {
        println!("Chart ({}): {} by {}", chart.chart_family, chart.series_keys.join(", "), chart.label_key);
    }

    let direction = if matches.is_present("desc") {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let (view_rows, export) = view.with_table(|table| {
        table.set_filter(matches.value_of("filter").unwrap_or_default());
        if let Some(column) = matches.value_of("sort") {
            table.set_sort(SortState::by(column, direction));
        }

        let scope = if matches.is_present("all") {
            ExportScope::All
        } else {
            ExportScope::View
        };
        let export = matches.value_of("export").map(|target| {
            let target = match target {
                "-" => export_file_name(name, chrono::Local::now().date_naive()),
                path => path.to_string(),
            };
            table.export_to_file(&target, scope, config.export.delimiter).map(|()| target)
        });

        (table.view(), export)
    });

    print_rows(&view_rows);
    if let Some(result) = export {
        println!("Exported to {}", result?);
    }
    Ok(())
}

async fn watch_report(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let name = matches.value_of("report").unwrap_or_default();
    let (view, _cache) = open_view(config, name).await?;
    let mut view = view.with_poll_interval(config.polling.interval());

    view.toggle_polling();
    println!("Polling {} every {}s, press Ctrl-C to stop", name, config.polling.interval().as_secs());

    tokio::signal::ctrl_c().await?;
    view.toggle_polling();

    match view.rows() {
        Some(rows) => print_rows(&rows),
        None => println!("No result received"),
    }
    println!("{} requests sent", view.requests_sent());
    Ok(())
}

async fn toggle_favorite(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let name = matches.value_of("report").unwrap_or_default();
    let mut favorites = FavoritesStore::load(open_store(config))?;
    let favorite = favorites.toggle(name)?;

    match HttpTransport::new(&config.backend)?.set_favorite(name, favorite).await {
        Ok(()) => {}
        Err(err) => warn!("Favorite saved locally only: {}", err),
    }

    println!("{} {} favorites", name, if favorite { "added to" } else { "removed from" });
    Ok(())
}

/// Fetch report details and open a view bound with the cached parameters
async fn open_view(
    config: &Config,
    name: &str,
) -> anyhow::Result<(ReportView<HttpTransport>, BindingCache<SharedStore>)> {
    let transport = Arc::new(HttpTransport::new(&config.backend)?);
    let mut report = transport.report_details(name).await?;

    let discovered = ParameterExtractor::new().detect_into(&mut report);
    if !discovered.is_empty() {
        info!("Template of {} declares extra parameters: {}", name, discovered.join(", "));
    }

    let cache = BindingCache::new(open_store(config));
    let cached = match cache.get(name) {
        Ok(binding) => binding.unwrap_or_default(),
        Err(err) => {
            warn!("Ignoring cached parameters: {}", err);
            Default::default()
        }
    };

    let view = ReportView::open(report, transport, &ParameterBinder::new(), &cached);
    Ok((view, cache))
}

fn open_store(config: &Config) -> SharedStore {
    match &config.storage.path {
        Some(path) => match FileStore::new(path) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!("Using in-memory preferences, cannot open {}: {}", path, err);
                Arc::new(MemoryStore::new())
            }
        },
        None => Arc::new(MemoryStore::new()),
    }
}

fn print_rows(rows: &RowSet) {
    println!("{}", rows.columns.join(" | "));
    for row in rows.rows.iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join(" | "));
    }
    if rows.len() > PREVIEW_ROWS {
        println!("... {} more rows", rows.len() - PREVIEW_ROWS);
    }
}
