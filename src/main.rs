use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use client_directory::{config, db, ClientDirectory, ClientRecord, DirectoryError};

#[derive(Parser, Debug)]
#[command(name = "clients", version, about = "Manage clients and their phone numbers")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop and recreate the clients and phones tables
    Init,
    /// Add a client, optionally with one phone number
    Add {
        first_name: String,
        last_name: String,
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Add a phone number to the client with the given email
    AddPhone { email: String, phone: String },
    /// Set one field (name, lastname, email) of a client
    Update { id: i32, field: String, value: String },
    /// Prompt for a client id, field and new value
    ChangeInfo,
    /// Delete one phone number of a client
    DeletePhone { id: i32, number: String },
    /// Delete a client and all of its phone numbers
    Delete { id: i32 },
    /// Find clients by first name, last name, email or phone number
    Search { query: String },
    /// Print every client with its phone numbers
    List,
    /// Run a scripted walkthrough against a freshly initialized schema
    Demo,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load configuration
    let config = config::init().context("loading CLIENTS_DB_* configuration")?;
    info!(database = %config.database, host = %config.host, "connecting");

    let directory = db::init(&config).await?;

    run(&directory, cli.command).await
}

async fn run(directory: &ClientDirectory, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            directory.initialize_schema().await?;
            println!("Schema created");
        }
        Command::Add {
            first_name,
            last_name,
            email,
            phone,
        } => {
            let id = directory
                .add_client(&first_name, &last_name, &email, phone.as_deref())
                .await?;
            println!("Added client {id}");
        }
        Command::AddPhone { email, phone } => {
            let id = directory.add_phone_number(&email, &phone).await?;
            println!("Added phone {id}");
        }
        Command::Update { id, field, value } => {
            directory.update_client_field(id, &field, &value).await?;
            println!("Updated client {id}");
        }
        Command::ChangeInfo => change_info(directory).await?,
        Command::DeletePhone { id, number } => {
            let removed = directory.delete_phone_number(id, &number).await?;
            println!("Removed {removed} phone number(s)");
        }
        Command::Delete { id } => {
            let removed = directory.delete_client(id).await?;
            println!("Removed {removed} client(s)");
        }
        Command::Search { query } => {
            let records = directory.search_client(&query).await?;
            if records.is_empty() {
                println!("No client matches {query:?}");
            } else {
                print_records(&records);
            }
        }
        Command::List => print_records(&directory.list_all().await?),
        Command::Demo => demo(directory).await?,
    }

    Ok(())
}

fn print_records(records: &[ClientRecord]) {
    println!("id | first name | last name | email | phone");
    for record in records {
        println!("{record}");
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("input closed");
    }

    Ok(line.trim().to_string())
}

/// Interactive update: asks again for the field when it is not recognised.
async fn change_info(directory: &ClientDirectory) -> Result<()> {
    let id: i32 = prompt("Client id")?
        .parse()
        .context("client id must be an integer")?;

    loop {
        let field = prompt("Field (name, lastname, email)")?;
        let value = prompt("New value")?;

        match directory.update_client_field(id, &field, &value).await {
            Ok(()) => {
                println!("Updated client {id}");
                return Ok(());
            }
            Err(DirectoryError::InvalidField(field)) => {
                println!("Unknown field {field:?}, try again");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

async fn demo(directory: &ClientDirectory) -> Result<()> {
    directory.initialize_schema().await?;

    directory.add_client("Simon", "Simonson", "simon@example.com", None).await?;
    directory
        .add_client("Ivan", "Ivanov", "ivan@example.com", Some("89001111111"))
        .await?;
    let peter = directory
        .add_client("Peter", "Petrov", "peter@example.com", Some("89002222222"))
        .await?;
    directory.add_phone_number("peter@example.com", "89004444444").await?;
    print_records(&directory.list_all().await?);

    directory
        .update_client_field(peter, "email", "peter.petrov@example.com")
        .await?;
    print_records(&directory.list_all().await?);

    directory.delete_phone_number(peter, "89004444444").await?;
    print_records(&directory.list_all().await?);

    directory.delete_client(peter).await?;
    print_records(&directory.list_all().await?);

    print_records(&directory.search_client("Ivan").await?);

    Ok(())
}
