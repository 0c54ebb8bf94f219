// src/cli.rs
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr, bail};

use crate::config::consts::{CONFIG_FILE, DATA_DIR, LOG_FILE, SESSION_COOKIE};
use crate::config::{AppConfig, Profile};
use crate::engine::{self, SyncReport};
use crate::paths::ProfilePaths;
use crate::progress::Progress;
use crate::specs::{self, DataSource, hero_standings};

#[derive(Debug, Parser)]
#[command(name = "gcpd_scrape", version, about = "Archive and sync Steam GCPD match history")]
pub struct Cli {
    /// Path to config.json
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Root directory for per-profile data
    #[arg(long, global = true, default_value = DATA_DIR)]
    pub data_dir: PathBuf,

    /// Debug-level file logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a default config.json if there is none
    Init,
    /// Download new pages for the active profile
    Sync(SourceArgs),
    /// Rebuild CSV datasets from downloaded pages
    Process(SourceArgs),
    /// Manage profiles
    #[command(subcommand)]
    Profiles(ProfilesCommand),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    #[arg(long, value_enum, default_value_t = SourceArg::All)]
    pub source: SourceArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    All,
    ConductSummary,
    PlaystyleStats,
    RankedHeroStats,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List profiles; the active one is marked with `*`
    List,
    /// Add a profile (the first one becomes active)
    Add {
        name: String,
        /// Steam custom URL id (`steamcommunity.com/id/<this>`)
        #[arg(long)]
        url: String,
        #[arg(long)]
        session_id: String,
        /// Extra cookie as NAME=VALUE; repeatable
        #[arg(long = "cookie", value_parser = parse_cookie)]
        cookies: Vec<(String, String)>,
    },
    /// Delete a profile and all of its downloaded data
    Remove {
        name: String,
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Make a profile active
    Use { name: String },
}

fn parse_cookie(s: &str) -> Result<(String, String), String> {
    let (k, v) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let k = k.trim();
    if k.is_empty() {
        return Err(s!("cookie name cannot be empty"));
    }
    Ok((s!(k), s!(v.trim())))
}

/// Prints progress lines to stdout.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn begin(&mut self, title: &str) {
        println!("==> {title}");
    }
    fn log(&mut self, msg: &str) {
        println!("    {msg}");
    }
    fn page_done(&mut self, count: usize) {
        println!("    page {count}");
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(&cli.data_dir.join(LOG_FILE), cli.verbose)
        .wrap_err("could not open log file")?;
    tracing::debug!("CLI: {:?}", cli.command);

    match &cli.command {
        Command::Init => init(&cli),
        Command::Sync(args) => sync(&cli, args.source),
        Command::Process(args) => process(&cli, args.source),
        Command::Profiles(cmd) => profiles(&cli, cmd),
    }
}

fn init(cli: &Cli) -> Result<()> {
    if AppConfig::initialize(&cli.config)? {
        println!("Created {}", cli.config.display());
        println!("Add a profile with `gcpd_scrape profiles add`.");
    } else {
        println!("{} already exists", cli.config.display());
    }
    crate::file::ensure_directory(&cli.data_dir)?;
    Ok(())
}

fn feeds_for(sel: SourceArg) -> Vec<&'static DataSource> {
    match sel {
        SourceArg::All => specs::FEEDS.to_vec(),
        SourceArg::ConductSummary => vec![&specs::CONDUCT_SUMMARY],
        SourceArg::PlaystyleStats => vec![&specs::PLAYSTYLE_STATS],
        SourceArg::RankedHeroStats => Vec::new(),
    }
}

fn wants_standings(sel: SourceArg) -> bool {
    matches!(sel, SourceArg::All | SourceArg::RankedHeroStats)
}

fn sync(cli: &Cli, sel: SourceArg) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;
    let profile = config.active_profile()?;
    println!("Profile: {}", profile.profile_name);

    for source in feeds_for(sel) {
        let report = engine::fetch(source, profile, &config, &cli.data_dir, Some(&mut ConsoleProgress))
            .wrap_err_with(|| format!("sync of {} failed", source.title))?;
        print_report(&report);
    }
    if wants_standings(sel) {
        ConsoleProgress.begin(hero_standings::TITLE);
        let path = hero_standings::fetch(profile, &config, &cli.data_dir)
            .wrap_err("download of ranked hero standings failed")?;
        println!("    saved {}", path.display());
    }
    Ok(())
}

fn print_report(r: &SyncReport) {
    let resumed = if r.resumed { ", resumed" } else { "" };
    println!(
        "    {:?} mode{}: {} page(s) fetched, {} archived ({:?})",
        r.mode, resumed, r.pages_fetched, r.pages_archived, r.stop
    );
}

fn process(cli: &Cli, sel: SourceArg) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;
    let profile = config.active_profile()?;
    let paths = ProfilePaths::new(&cli.data_dir, &profile.profile_name);

    for source in feeds_for(sel) {
        let res = crate::data::process(source, &paths)?;
        report_rows(source.title, res.map(|d| d.len()), &paths.output_file(source.key));
    }
    if wants_standings(sel) {
        let res = hero_standings::process(&paths)?;
        report_rows(
            hero_standings::TITLE,
            res.map(|d| d.len()),
            &paths.output_file(hero_standings::OUTPUT_STEM),
        );
    }
    Ok(())
}

fn report_rows(title: &str, rows: Option<usize>, out: &Path) {
    match rows {
        Some(n) => println!("{title}: {n} row(s) -> {}", out.display()),
        None => println!("{title}: no data (run `sync` first)"),
    }
}

fn profiles(cli: &Cli, cmd: &ProfilesCommand) -> Result<()> {
    if let ProfilesCommand::List = cmd {
        let config = AppConfig::load(&cli.config)?;
        if config.profiles.is_empty() {
            println!("No profiles.");
        }
        for p in &config.profiles {
            let mark = if p.profile_name == config.active_profile { "*" } else { " " };
            println!("{mark} {} ({})", p.profile_name, p.custom_url);
        }
        return Ok(());
    }

    AppConfig::initialize(&cli.config)?;
    let mut config = AppConfig::load(&cli.config)?;
    match cmd {
        ProfilesCommand::List => {}
        ProfilesCommand::Add { name, url, session_id, cookies } => {
            let mut profile = Profile::new(name, url).with_cookie(SESSION_COOKIE, session_id);
            for (k, v) in cookies {
                profile = profile.with_cookie(k, v);
            }
            config.upsert_profile(None, profile)?;
            println!("Added profile '{}'", name.trim());
        }
        ProfilesCommand::Remove { name, yes } => {
            if !yes {
                bail!("removing '{name}' deletes all of its data; pass --yes to confirm");
            }
            config.delete_profile(name, &cli.data_dir)?;
            println!("Removed profile '{name}'");
        }
        ProfilesCommand::Use { name } => {
            config.set_active(name)?;
            println!("Active profile: {name}");
        }
    }
    config.save(&cli.config).wrap_err("could not save config")
}
