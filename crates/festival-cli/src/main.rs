//! `festival` CLI: build conflict-free festival schedules from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Schedule three movies with the default options (weekday 9-18 blackout, 60 min transit)
//! festival schedule -c siff2013.json -m 12,48,201
//!
//! # Every movie in the catalog, options from a file, reproducible tie-breaks
//! festival schedule -c siff2013.json --all --options opts.json --seed 7 -o schedule.json
//!
//! # Override options from flags
//! festival schedule -c siff2013.json -m 12,48 --no-avoid-weekdays --prefer late --disable-theater 3
//!
//! # Validate a catalog
//! festival check -c siff2013.json
//!
//! # List pairwise conflicts among the selected movies' showtimes
//! festival conflicts -c siff2013.json -m 12,48 --transit-buffer 30
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use festival_scheduler::{
    find_conflicts, Catalog, Listing, MovieId, ScheduleOptions, Scheduler, TheaterId,
};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(
    name = "festival",
    version,
    about = "Build conflict-free film festival schedules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log scheduling progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick one showtime per selected movie and print the schedule as JSON
    Schedule {
        /// Catalog JSON file (movies, theaters, showtimes)
        #[arg(short, long)]
        catalog: String,
        #[command(flatten)]
        selection: Selection,
        /// Options JSON file; flags below override it
        #[arg(long)]
        options: Option<String>,
        /// Minimum minutes between showtimes in different theaters
        #[arg(long)]
        transit_buffer: Option<u32>,
        /// Prefer weekend (and May 27) showtimes
        #[arg(long)]
        prefer_weekends: bool,
        /// Prefer earlier or later showtimes
        #[arg(long, value_enum)]
        prefer: Option<PreferArg>,
        /// Weekday hours to avoid, as AFTER-BEFORE (e.g. 9-18)
        #[arg(long, value_parser = parse_hour_range, conflicts_with = "no_avoid_weekdays")]
        avoid_weekdays: Option<(u32, u32)>,
        /// Allow weekday showtimes at any hour
        #[arg(long)]
        no_avoid_weekdays: bool,
        /// Theater id to skip (repeatable)
        #[arg(long = "disable-theater")]
        disable_theater: Vec<TheaterId>,
        /// Seed for tie-breaking (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate a catalog and print a summary
    Check {
        /// Catalog JSON file
        #[arg(short, long)]
        catalog: String,
    },
    /// Print the pairwise conflicts among the selected movies' showtimes as JSON
    Conflicts {
        /// Catalog JSON file
        #[arg(short, long)]
        catalog: String,
        #[command(flatten)]
        selection: Selection,
        /// Minimum minutes between showtimes in different theaters
        #[arg(long, default_value_t = festival_scheduler::options::DEFAULT_TRANSIT_BUFFER_MINUTES)]
        transit_buffer: u32,
    },
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct Selection {
    /// Comma-separated movie ids
    #[arg(short, long, value_delimiter = ',')]
    movies: Vec<MovieId>,
    /// Select every movie in the catalog
    #[arg(long)]
    all: bool,
}

impl Selection {
    fn resolve(&self, catalog: &Catalog) -> Vec<MovieId> {
        if self.all {
            catalog.movie_ids()
        } else {
            self.movies.clone()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PreferArg {
    Early,
    Late,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Schedule {
            catalog,
            selection,
            options,
            transit_buffer,
            prefer_weekends,
            prefer,
            avoid_weekdays,
            no_avoid_weekdays,
            disable_theater,
            seed,
            output,
        } => {
            let catalog = load_catalog(&catalog)?;
            let mut opts = match options {
                Some(path) => ScheduleOptions::from_json(&read_file(&path)?)
                    .with_context(|| format!("Failed to parse options: {}", path))?,
                None => ScheduleOptions::default(),
            };

            if let Some(minutes) = transit_buffer {
                opts.transit_buffer_minutes = minutes;
            }
            if prefer_weekends {
                opts.prefer_weekends = true;
            }
            match prefer {
                Some(PreferArg::Early) => opts.prefer_time.early = true,
                Some(PreferArg::Late) => opts.prefer_time.late = true,
                None => {}
            }
            if let Some((after, before)) = avoid_weekdays {
                opts.avoid_weekdays.active = true;
                opts.avoid_weekdays.after = after;
                opts.avoid_weekdays.before = before;
            }
            if no_avoid_weekdays {
                opts.avoid_weekdays.active = false;
            }
            opts.disabled_theaters.extend(disable_theater);

            let scheduler = Scheduler::from_options(&opts).context("Invalid schedule options")?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let movies = selection.resolve(&catalog);
            let schedule = scheduler
                .schedule_catalog(&catalog, &movies, &mut rng)
                .context("Failed to build schedule")?;

            let json = serde_json::to_string_pretty(&schedule)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Check { catalog } => {
            let catalog = load_catalog(&catalog)?;
            println!(
                "ok: {} movies, {} theaters, {} showtimes",
                catalog.movies.len(),
                catalog.theaters.len(),
                catalog.showtimes.len()
            );
        }
        Commands::Conflicts {
            catalog,
            selection,
            transit_buffer,
        } => {
            let catalog = load_catalog(&catalog)?;
            let movies = selection.resolve(&catalog);
            let selected = catalog
                .select(&movies)
                .context("Failed to select showtimes")?;
            let listings: Vec<Listing> = selected
                .into_iter()
                .map(|(id, showtime)| Listing::new(id, showtime))
                .collect();
            let conflicts = find_conflicts(&listings, transit_buffer);
            println!("{}", serde_json::to_string_pretty(&conflicts)?);
        }
    }

    Ok(())
}

/// Parse `AFTER-BEFORE` into an hour pair, e.g. `9-18`.
fn parse_hour_range(raw: &str) -> Result<(u32, u32), String> {
    let (after, before) = raw
        .split_once('-')
        .ok_or_else(|| format!("expected AFTER-BEFORE, got '{}'", raw))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid hour '{}': {}", s, e))
    };
    Ok((parse(after)?, parse(before)?))
}

fn load_catalog(path: &str) -> Result<Catalog> {
    let catalog = Catalog::from_json(&read_file(path)?)
        .with_context(|| format!("Failed to parse catalog: {}", path))?;
    catalog
        .validate()
        .with_context(|| format!("Invalid catalog: {}", path))?;
    Ok(catalog)
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
