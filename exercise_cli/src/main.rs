use clap::{Parser, Subcommand};
use exercise_core::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extrack")]
#[command(about = "Exercise log tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new user
    NewUser {
        username: String,
    },

    /// Add an exercise to a user's log
    Add {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        description: String,

        /// Duration in minutes
        #[arg(long)]
        duration: String,

        /// Date of the exercise (yyyy-mm-dd); defaults to now
        #[arg(long)]
        date: Option<String>,
    },

    /// List all users
    Users,

    /// Show a user's log
    Log {
        #[arg(long)]
        user_id: String,

        /// Only entries after this date
        #[arg(long)]
        from: Option<String>,

        /// Only entries before this date
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of entries
        #[arg(long)]
        limit: Option<String>,
    },
}

fn main() {
    // Initialize logging
    exercise_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = JsonFileStore::new(data_dir.join("users.json"));
    tracing::debug!("Using user store at {:?}", store.path());

    match cli.command {
        Commands::NewUser { username } => cmd_new_user(&store, &username),
        Commands::Add {
            user_id,
            description,
            duration,
            date,
        } => cmd_add(
            &store,
            &user_id,
            NewEntry {
                description: Some(description),
                duration: Some(DurationInput::Text(duration)),
                date,
            },
        ),
        Commands::Users => print_json(&store.list_all()?),
        Commands::Log {
            user_id,
            from,
            to,
            limit,
        } => {
            let user = store.find_by_id(&user_id)?;
            let query = LogQuery::parse(from.as_deref(), to.as_deref(), limit.as_deref());
            print_json(&query_log(&user, &query))
        }
    }
}

fn cmd_new_user(store: &dyn UserStore, username: &str) -> Result<()> {
    let user = store.create(username)?;
    print_json(&user.summary())
}

fn cmd_add(store: &dyn UserStore, user_id: &str, entry: NewEntry) -> Result<()> {
    let user = store.find_by_id(user_id)?;
    let outcome = append_entry(store, user, entry)?;
    print_json(&ExerciseAdded::new(&outcome.user, &outcome.entry))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
