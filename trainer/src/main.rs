use cavala_core::{config::CliConfig, Config, Theme, MAX_DECK_SIZE};
use clap::{Arg, ArgMatches, Command};
use std::{io::stdout, path::PathBuf, process};

mod logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("cavala")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cavala Trainer - pick a cavala and a support deck, then browse their events")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Folder holding the cartas/ and cavalas/ directories")
                .env("CAVALA_DATA_DIR")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("deck-limit")
                .long("deck-limit")
                .value_name("N")
                .help("Maximum number of deck cards")
                .value_parser(clap::value_parser!(u64).range(1..=MAX_DECK_SIZE as u64)),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .value_name("THEME")
                .help("UI theme")
                .value_parser(["dark", "light"]),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colors")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json-config")
                .long("json-config")
                .value_name("PATH")
                .help("Path to JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write logs here instead of the cache directory")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn cli_config(matches: &ArgMatches) -> CliConfig {
    CliConfig {
        data_dir: matches.get_one::<PathBuf>("data-dir").cloned(),
        deck_limit: matches.get_one::<u64>("deck-limit").map(|n| *n as usize),
        theme: matches.get_one::<String>("theme").map(|t| match t.as_str() {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }),
        no_color: matches.get_flag("no-color"),
    }
}

fn run() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let log_path = logging::init(matches.get_one::<PathBuf>("log-file").map(PathBuf::as_path))?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting");

    let cli_config = cli_config(&matches);
    let json_config_path = matches.get_one::<PathBuf>("json-config");
    let config = Config::load(Some(&cli_config), json_config_path)?;
    tracing::debug!(?config, "configuration resolved");

    let mut app = cavala_tui::App::new(config)?;
    let mut stdout = stdout();
    app.run(&mut stdout)?;

    tracing::info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_cli_config() {
        let matches = cli()
            .try_get_matches_from([
                "cavala",
                "--data-dir",
                "/assets",
                "--deck-limit",
                "4",
                "--theme",
                "light",
                "--no-color",
            ])
            .unwrap();
        let config = cli_config(&matches);

        assert_eq!(config.data_dir, Some(PathBuf::from("/assets")));
        assert_eq!(config.deck_limit, Some(4));
        assert_eq!(config.theme, Some(Theme::Light));
        assert!(config.no_color);
    }

    #[test]
    fn deck_limit_out_of_range_is_rejected() {
        assert!(cli().try_get_matches_from(["cavala", "--deck-limit", "7"]).is_err());
        assert!(cli().try_get_matches_from(["cavala", "--deck-limit", "0"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }
}
