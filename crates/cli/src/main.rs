//! Feirinha CLI - command-line client for the classifieds app.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (also signs you in)
//! feirinha register -e maria@example.com -p s3nha-boa -n Maria \
//!     --phone "11 99999-0000" --address "Rua das Flores, 1"
//!
//! # Sign in / out
//! feirinha login -e maria@example.com -p s3nha-boa
//! feirinha logout
//! feirinha whoami
//!
//! # Listings
//! feirinha list
//! feirinha list --hide-own
//! feirinha create -t "Bike" -d "Aro 29" --price 150.0 --photo foto1.jpg
//! feirinha edit a1b2 --price 120.0
//! feirinha delete a1b2
//! ```
//!
//! The signed-in credential is cached in the file named by
//! `FEIRINHA_TOKEN_FILE`, so a new invocation resumes the session
//! without asking for the password again.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "feirinha")]
#[command(author, version, about = "Feirinha classifieds client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Contact phone
        #[arg(long, default_value = "")]
        phone: String,

        /// Contact address
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Sign in
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and forget the cached credential
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show the listing feed
    List {
        /// Leave your own listings out of the feed
        #[arg(long)]
        hide_own: bool,
    },
    /// Show one listing with seller contact details
    Show {
        /// Listing id
        id: String,
    },
    /// Create a listing
    Create {
        /// Title
        #[arg(short, long)]
        title: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Asking price in reais
        #[arg(long)]
        price: f64,

        /// Photo URI; repeat for more (at most 5 are kept)
        #[arg(long = "photo")]
        photos: Vec<String>,
    },
    /// Edit one of your listings
    Edit {
        /// Listing id
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New asking price in reais
        #[arg(long)]
        price: Option<f64>,

        /// Replace the photos; repeat for more (at most 5 are kept)
        #[arg(long = "photo")]
        photos: Option<Vec<String>>,
    },
    /// Delete one of your listings (asks for confirmation)
    Delete {
        /// Listing id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Register {
            email,
            password,
            name,
            phone,
            address,
        } => commands::auth::register(email, password, name, phone, address).await?,
        Commands::Login { email, password } => commands::auth::login(&email, &password).await?,
        Commands::Logout => commands::auth::logout().await?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::List { hide_own } => commands::listings::list(!hide_own).await?,
        Commands::Show { id } => commands::listings::show(&id).await?,
        Commands::Create {
            title,
            description,
            price,
            photos,
        } => commands::listings::create(title, description, price, photos).await?,
        Commands::Edit {
            id,
            title,
            description,
            price,
            photos,
        } => commands::listings::edit(&id, title, description, price, photos).await?,
        Commands::Delete { id, yes } => commands::listings::delete(&id, yes).await?,
    }
    Ok(())
}
