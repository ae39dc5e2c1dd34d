// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use libraring_config::{Config, ConfigManager};
use libraring_library::{Catalog, CatalogOptions};
use std::io;
use std::path::PathBuf;

mod commands;
mod shell;

use shell::Shell;

fn build_cli() -> Command {
    Command::new("libraring")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Libraring contributors")
        .about("Personal library catalog kept in a JSON file")
        .arg(
            Arg::new("catalog")
                .short('c')
                .long("catalog")
                .value_name("PATH")
                .help("Path to the catalog file (overrides the config file)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(Command::new("shell").about("Start the interactive menu (default)"))
        .subcommand(
            Command::new("add")
                .about("Add a book, or another copy of one already cataloged")
                .arg(Arg::new("title").short('t').long("title").required(true).value_name("TITLE").help("Book title"))
                .arg(Arg::new("author").short('a').long("author").required(true).value_name("AUTHOR").help("Book author"))
                .arg(Arg::new("year").short('y').long("year").required(true).value_name("YEAR").help("Publication year")),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a book from the catalog")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID to remove")),
        )
        .subcommand(
            Command::new("find")
                .about("Find books; all given filters must match")
                .arg(Arg::new("title").short('t').long("title").value_name("TITLE").help("Exact title, any case"))
                .arg(Arg::new("author").short('a').long("author").value_name("AUTHOR").help("Exact author, any case"))
                .arg(Arg::new("year").short('y').long("year").value_name("YEAR").help("Publication year")),
        )
        .subcommand(Command::new("list").about("List all books in the catalog"))
        .subcommand(
            Command::new("status")
                .about("Check out or return a copy of a book")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID"))
                .arg(
                    Arg::new("status")
                        .required(true)
                        .value_name("STATUS")
                        .help("'в наличии' / 'available' returns a copy, 'выдана' / 'checked-out' checks one out"),
                ),
        )
        .subcommand(Command::new("stats").about("Show catalog statistics"))
        .subcommand(Command::new("init-config").about("Write a default config file if none exists"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings in config.toml")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Show the settings in effect"))
                .subcommand(
                    Command::new("set")
                        .about("Change one setting in config.toml")
                        .arg(
                            Arg::new("key")
                                .required(true)
                                .value_name("KEY")
                                .value_parser(libraring_config::SETTING_KEYS)
                                .help("Setting name, e.g. catalog.save_on_noop"),
                        )
                        .arg(Arg::new("value").required(true).value_name("VALUE").help("New value")),
                ),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => Ok(ConfigManager::with_directory(dir)),
        None => ConfigManager::new().context("Failed to locate configuration directory"),
    }
}

/// The config file, then environment overrides, then `--catalog`
fn load_config(manager: &ConfigManager, matches: &ArgMatches) -> Config {
    let mut config = manager.load_with_env_overrides();
    if let Some(path) = matches.get_one::<PathBuf>("catalog") {
        config.catalog.path = path.clone();
    }
    config
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let manager = config_manager(&matches)?;
    let config = load_config(&manager, &matches);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();

    if !config.app.color_output {
        console::set_colors_enabled(false);
    }

    match matches.subcommand() {
        Some(("init-config", _)) => {
            return commands::init_config(&manager, &mut io::stdout().lock());
        }
        Some(("config", sub_matches)) => {
            return commands::config(&manager, &config, sub_matches, &mut io::stdout().lock());
        }
        _ => {}
    }

    let mut catalog = Catalog::open(CatalogOptions::from(&config.catalog)).with_context(|| {
        format!("Failed to open catalog {}", config.catalog.path.display())
    })?;

    if let Some(warning) = catalog.load_warning() {
        eprintln!("{} {}", console::style("Warning:").yellow().bold(), warning);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match matches.subcommand() {
        Some(("add", sub_matches)) => commands::add_book(&mut catalog, sub_matches, &mut out),
        Some(("remove", sub_matches)) => commands::remove_book(&mut catalog, sub_matches, &mut out),
        Some(("find", sub_matches)) => commands::find_books(&catalog, sub_matches, &mut out),
        Some(("list", _)) => commands::list_books(&catalog, &mut out),
        Some(("status", sub_matches)) => commands::change_status(&mut catalog, sub_matches, &mut out),
        Some(("stats", _)) => commands::show_stats(&catalog, &mut out),
        _ => {
            let stdin = io::stdin();
            Shell::new(&mut catalog, stdin.lock(), out)
                .with_banner(config.app.banner.clone())
                .run()
        }
    }
}
