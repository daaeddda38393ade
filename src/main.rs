//! Pet Shop - terminal client for the Pet Shop records API

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use petshop::api::{ApiClient, PetShopApi, fetch_pets_with_owners};
use petshop::cli::{self, Command};
use petshop::config::{API_URL_ENV, Config};

fn main() -> Result<()> {
    let cli = cli::parse_args(std::env::args().skip(1))?;

    match cli.command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            print_version();
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load()?.with_overrides(std::env::var(API_URL_ENV).ok(), cli.api_url);

    match cli.command {
        Command::Run { route } => {
            init_file_logging()?;
            petshop::app::run(config, route)
        }
        command => {
            init_stderr_logging();
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_command(&config, command))
        }
    }
}

fn env_filter() -> EnvFilter {
    // RUST_LOG=debug for verbose output
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// The TUI owns the terminal, so logs go to a file
fn init_file_logging() -> Result<()> {
    let path = petshop::paths::log_path()?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_command(config: &Config, command: Command) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    match command {
        Command::Owners => {
            let owners = client.fetch_owners().await?;
            if owners.is_empty() {
                println!("No owners yet");
            }
            for owner in &owners {
                println!("{}", cli::owner_row(owner));
            }
        }
        Command::Pets => {
            let (pets, owners) = fetch_pets_with_owners(&client).await?;
            if pets.is_empty() {
                println!("No pets yet");
            }
            for pet in &pets {
                println!("{}", cli::pet_row(pet, &owners));
            }
        }
        Command::AddOwner(owner) => {
            let created = client.create_owner(&owner).await?;
            println!("✓ Created owner {} (#{})", created.name, created.id);
        }
        Command::AddPet(pet) => {
            let created = client.create_pet(&pet).await?;
            println!("✓ Created pet {} (#{})", created.name, created.id);
            if let Some(filename) = created.photo() {
                println!("  Photo: {}", client.photo_url(filename));
            }
        }
        Command::Run { .. } | Command::Help | Command::Version => {}
    }
    Ok(())
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
🐾 Pet Shop - owners and pets from your terminal

USAGE:
    petshop [OPTIONS]                  Launch TUI on the owner list
    petshop [OPTIONS] <route>          Launch TUI on /owners, /add-owner, /pets or /add-pet
    petshop [OPTIONS] [COMMAND]

COMMANDS:
    owners                             List owners
    pets                               List pets with their owners
    add-owner <name> [OPTIONS]         Create an owner
      Options:
        --email <email>   --phone <phone>   --address <address>
        --city <city>     --state <state>   --zip <zip>
        --country <country>               --dob <date>
    add-pet <name> --owner <id> [OPTIONS]
                                       Create a pet
      Options:
        --species <species>  --breed <breed>  --color <color>
        --age <years>        --weight <kg>    --gender <male|female|unknown>
        --birthdate <date>   --description <text>
        --vaccinated         --photo <path>
      Examples:
        petshop add-owner "Ada Lovelace" --email ada@example.com
        petshop add-pet Rex --owner 1 --species dog --photo ./rex.jpg

OPTIONS:
    --api-url <url>                    API root (overrides {} and config)
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    F1-F4         Owners / Add Owner / Pets / Add Pet
    j/k, g/G      Move between cards
    Enter/Space   Show or hide details
    r             Reload list
    o             Open pet photo in browser
    Ctrl+S        Submit form
    t             Change theme
    ?             Help

CONFIG:
    {}
"#,
        petshop::LOGO,
        API_URL_ENV,
        config_path
    );
}

fn print_version() {
    println!("petshop {}", petshop::VERSION);
}
