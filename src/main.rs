use std::io::Read;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use esqueleto::api::state::AppState;
use esqueleto::calculate::{week_groups, weekly_streak};
use esqueleto::config::AppConfig;
use esqueleto::export::{ExportTarget, IntervalsClient};
use esqueleto::importer::{import, Imported};
use esqueleto::models::Workout;
use esqueleto::parser::ImportFormat;
use esqueleto::storage::{Stored, StorageConfig};

#[derive(Parser)]
#[command(name = "esqueleto")]
#[command(about = "Workout plan tracker: paste plan text, get structured sessions")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a workout or weekly plan from a text file (or stdin)
    Import {
        /// Path to the text file; omit to read stdin
        path: Option<String>,

        /// Force a format: "json", "weekly" or "single"
        #[arg(long)]
        format: Option<String>,

        /// Parse and validate without storing
        #[arg(long)]
        dry_run: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List stored workouts and plans
    List,

    /// Show a stored document as JSON
    Show { id: String },

    /// Delete a stored workout or plan
    Delete { id: String },

    /// Push a workout to Intervals.icu (default: the active workout)
    Push {
        /// Workout id; omit to push the active workout
        id: Option<String>,

        /// Print the event that would be uploaded without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show training history grouped by week
    History,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if std::path::Path::new(&cli.config).exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("loading config from {}", cli.config))?
    } else {
        AppConfig::default()
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.into();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Import {
            path,
            format,
            dry_run,
        } => {
            let text = match path {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path))?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };

            let format = format.as_deref().map(parse_format).transpose()?;
            match import(&text, format) {
                Ok(Imported::Workout(workout)) => {
                    let workouts = storage.workouts();
                    let digest = workout.content_digest();
                    let duplicate = workouts
                        .get_all()?
                        .iter()
                        .any(|s| s.item.content_digest() == digest);

                    println!("Workout: {}", workout.session);
                    if let Some(date) = &workout.date {
                        println!("Date:    {}", date);
                    }
                    println!("Exercises: {}", workout.exercises.len());
                    if duplicate {
                        println!("Warning: an identical workout is already stored.");
                    }

                    if dry_run {
                        println!("\n(dry run - nothing stored)");
                    } else {
                        let stored = workouts.insert(workout)?;
                        let active = storage.active();
                        let mut pointer = active.load()?;
                        pointer.workout_id = Some(stored.id.clone());
                        active.save(&pointer)?;
                        println!("Stored as {} (now active)", stored.id);
                    }
                }
                Ok(Imported::Plan(plan)) => {
                    println!("Weekly plan: {}", plan.id);
                    if !plan.week_range.is_empty() {
                        println!("Range: {}", plan.week_range);
                    }
                    for day in &plan.days {
                        println!(
                            "  {} {} {} — {} ({} ejercicios)",
                            day.emoji,
                            day.day_name,
                            day.date,
                            day.title,
                            day.exercises.len()
                        );
                    }

                    if dry_run {
                        println!("\n(dry run - nothing stored)");
                    } else {
                        let stored = storage.plans().insert(plan)?;
                        let active = storage.active();
                        let mut pointer = active.load()?;
                        pointer.plan_id = Some(stored.id.clone());
                        active.save(&pointer)?;
                        println!("Stored as {} (now active)", stored.id);
                    }
                }
                Err(e) => bail!("import failed: {}", e),
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                storage: Arc::new(storage),
            };
            let app = esqueleto::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::List => {
            let pointer = storage
                .active()
                .load_healed(&storage.workouts(), &storage.plans())?;

            let workouts = storage.workouts().get_all()?;
            println!("=== Workouts ({}) ===", workouts.len());
            for stored in &workouts {
                let active = if pointer.workout_id.as_deref() == Some(&stored.id) {
                    " [ACTIVE]"
                } else {
                    ""
                };
                println!(
                    "  {}  {}  {}{}",
                    stored.id,
                    stored.item.date.as_deref().unwrap_or("-"),
                    stored.item.session,
                    active
                );
            }

            let plans = storage.plans().get_all()?;
            println!("\n=== Plans ({}) ===", plans.len());
            for stored in &plans {
                let active = if pointer.plan_id.as_deref() == Some(&stored.id) {
                    " [ACTIVE]"
                } else {
                    ""
                };
                println!(
                    "  {}  {}  {} días{}",
                    stored.id,
                    stored.item.week_range,
                    stored.item.days.len(),
                    active
                );
            }
        }
        Commands::Show { id } => {
            if let Some(workout) = storage.workouts().get(&id)? {
                println!("{}", serde_json::to_string_pretty(&workout)?);
            } else if let Some(plan) = storage.plans().get(&id)? {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                bail!("no workout or plan with id {}", id);
            }
        }
        Commands::Delete { id } => {
            let workouts = storage.workouts();
            let plans = storage.plans();
            if workouts.delete(&id)? {
                println!("Deleted workout {}", id);
            } else if plans.delete(&id)? {
                println!("Deleted plan {}", id);
            } else {
                bail!("no workout or plan with id {}", id);
            }
            storage.active().load_healed(&workouts, &plans)?;
        }
        Commands::Push { id, dry_run } => {
            let workouts = storage.workouts();
            let stored: Stored<Workout> = match id {
                Some(id) => workouts
                    .get(&id)?
                    .with_context(|| format!("no workout with id {}", id))?,
                None => {
                    let pointer = storage.active().load_healed(&workouts, &storage.plans())?;
                    let active_id = pointer
                        .workout_id
                        .context("no active workout; import one or pass an id")?;
                    workouts
                        .get(&active_id)?
                        .context("active workout disappeared")?
                }
            };

            let today = Local::now().date_naive();
            if dry_run {
                let event = IntervalsClient::build_event(&stored.item, today);
                println!("{}", serde_json::to_string_pretty(&event)?);
                println!("\n(dry run - nothing uploaded)");
            } else {
                if !config.intervals.enabled {
                    bail!("intervals is disabled; enable it in the config file");
                }
                let client = IntervalsClient::new(&config.intervals)?;
                client.push_workout(&stored.item, today).await?;
                println!("Uploaded '{}' to Intervals.icu", stored.item.session);
            }
        }
        Commands::History => {
            let workouts = storage.workouts().get_all()?;
            let today = Local::now().date_naive();
            let streak = weekly_streak(&workouts, today);

            println!("Racha: {} semana(s)\n", streak);
            for group in week_groups(workouts) {
                println!("{}", group.label);
                for stored in &group.workouts {
                    println!(
                        "  {}  {}",
                        stored.item.date.as_deref().unwrap_or("-"),
                        stored.item.session
                    );
                }
                println!();
            }
        }
    }

    Ok(())
}

fn parse_format(s: &str) -> Result<ImportFormat> {
    match s {
        "json" => Ok(ImportFormat::Json),
        "weekly" => Ok(ImportFormat::WeeklyPlan),
        "single" => Ok(ImportFormat::SingleDay),
        other => bail!("unknown format '{}', expected json, weekly or single", other),
    }
}
