use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use semillero::authz::Section;
use semillero::errors::SemilleroError;
use semillero::model::{Project, Semillero};
use semillero::session::Session;
use semillero::storage::Store;
use semillero::{content, directory, reports, seed, settings, storage};

#[derive(Parser, Debug)]
#[command(
    name = "semillero",
    version,
    about = "Research-group management with role-based access"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Populate empty collections with sample data
    Seed,
    /// Start a session with one of the built-in accounts
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Switch the working semillero
    Select { semillero_id: String },
    /// Show the current session and its navigation
    Whoami,
    /// Evaluate the access rules for a section
    Check {
        section: String,
        /// Target semillero, defaults to the user's own
        #[arg(long)]
        semillero: Option<String>,
    },
    /// Print the records of a collection visible to the session
    List { collection: Collection },
    /// Tracking metrics of a semillero
    Stats {
        /// Defaults to the selected semillero
        #[arg(long)]
        semillero: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Collection {
    Projects,
    Resources,
    Messages,
    Meetings,
    Events,
    Collaborations,
    Students,
    Semilleros,
    Users,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessReport<'a> {
    section: &'a str,
    target: Option<&'a str>,
    can_access: bool,
    can_download: bool,
    can_create_project: bool,
    can_manage_resources: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    // load settings
    let settings = settings::Settings::load(&cli.config)?;
    tracing::debug!(?settings, "Loaded configuration");

    // init storage backend
    let store = storage::init(&settings.storage).await?;

    if settings.seed.on_startup {
        seed::initialize_sample_data(&store).await?;
    }

    let mut session = Session::restore(&store).await;
    run(cli.command, &store, &mut session).await
}

async fn run(command: Command, store: &Store, session: &mut Session) -> Result<()> {
    match command {
        Command::Seed => {
            seed::initialize_sample_data(store).await?;
            println!("Sample data ready");
        }
        Command::Login { email, password } => {
            let Some(outcome) = session.login(store, &email, &password).await? else {
                miette::bail!("Invalid email or password");
            };
            print_json(&outcome.user)?;
            if let Some(redirect) = outcome.redirect {
                println!("Redirect: {redirect}");
            }
        }
        Command::Logout => {
            session.logout(store).await?;
            println!("Logged out");
        }
        Command::Select { semillero_id } => {
            let semillero = store
                .find::<Semillero>(&semillero_id)
                .await
                .ok_or_else(|| SemilleroError::not_found("Semillero", semillero_id))?;
            session.select_semillero(store, semillero).await?;
            print_json(&session.selected())?;
        }
        Command::Whoami => {
            let Some(user) = session.user() else {
                println!("Not logged in");
                return Ok(());
            };
            print_json(user)?;
            if session.requires_semillero_selection() {
                println!("No semillero selected; run `semillero select <id>`");
            } else if let Some(selected) = session.selected() {
                println!("Selected: {} ({})", selected.name, selected.id);
            }
            let sections = session.navigation();
            let nav: Vec<&str> = sections.iter().map(Section::as_str).collect();
            println!("Navigation: {}", nav.join(", "));
        }
        Command::Check { section, semillero } => {
            let target = semillero.as_deref();
            let report = AccessReport {
                section: &section,
                target,
                can_access: session.can_access(section.as_str(), target),
                can_download: session.can_download(target),
                can_create_project: session.can_create_project(),
                can_manage_resources: session.can_manage_resources(target),
            };
            print_json(&report)?;
        }
        Command::List { collection } => list(collection, store, session).await?,
        Command::Stats { semillero } => {
            let Some(id) = semillero.or_else(|| session.selected_id().map(str::to_string)) else {
                miette::bail!("No semillero selected; pass --semillero");
            };
            session.require_access(Section::Seguimiento, Some(&id))?;
            let projects = store.list::<Project>().await;
            print_json(&reports::semillero_metrics(&projects, &id))?;
        }
    }
    Ok(())
}

impl Collection {
    fn section(self) -> Section {
        match self {
            Collection::Projects => Section::Proyectos,
            Collection::Resources => Section::Recursos,
            Collection::Messages | Collection::Meetings => Section::Comunicacion,
            Collection::Events | Collection::Collaborations => Section::Divulgacion,
            Collection::Students => Section::Estudiantes,
            Collection::Semilleros => Section::Semilleros,
            Collection::Users => Section::Usuarios,
        }
    }
}

async fn list(collection: Collection, store: &Store, session: &Session) -> Result<()> {
    session.require_access(collection.section(), session.selected_id())?;
    match collection {
        Collection::Projects => print_json(&content::visible_projects(store, session).await),
        Collection::Resources => print_json(&content::visible_resources(store, session).await),
        Collection::Messages => print_json(&content::visible_messages(store, session).await),
        Collection::Meetings => print_json(&content::visible_meetings(store, session).await),
        Collection::Events => print_json(&content::list_events(store).await),
        Collection::Collaborations => print_json(&content::list_collaborations(store).await),
        Collection::Students => {
            let Some(id) = session.selected_id() else {
                miette::bail!("No semillero selected");
            };
            print_json(&directory::students_by_semillero(store, session, id).await)
        }
        Collection::Semilleros => print_json(&directory::list_semilleros(store).await),
        Collection::Users => print_json(&directory::list_users(store).await),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
