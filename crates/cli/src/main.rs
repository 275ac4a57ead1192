use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};

use bookstockdb_cli::{run_report, ReportConfig};
use bookstockdb_core::config::{PublisherFilter, StoreConfig};

#[derive(Parser)]
#[command(author, version, about = "bookstockdb command line utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the schema, load a fixture file, and report sales for one publisher.
    Report(ReportArgs),
}

#[derive(Args)]
#[command(group = ArgGroup::new("publisher").required(true).args(["publisher_id", "publisher_name"]))]
struct ReportArgs {
    /// Path to the fixture file.
    #[arg(long, default_value = "tests_data.json")]
    fixture: PathBuf,
    /// Database connection string (postgres://… or sqlite:…); overrides the
    /// individual connection flags.
    #[arg(long)]
    dsn: Option<String>,
    /// Driver scheme used when composing the connection string.
    #[arg(long, default_value = "postgresql")]
    driver: String,
    /// Database user.
    #[arg(long, default_value = "postgres")]
    user: String,
    /// Database password.
    #[arg(long, default_value = "postgres")]
    password: String,
    /// Database host.
    #[arg(long, default_value = "localhost")]
    host: String,
    /// Database port.
    #[arg(long, default_value_t = 5432)]
    port: u16,
    /// Database name.
    #[arg(long, default_value = "postgres")]
    database: String,
    /// Report sales for the publisher with this id.
    #[arg(long)]
    publisher_id: Option<i64>,
    /// Report sales for the publisher with this name.
    #[arg(long)]
    publisher_name: Option<String>,
}

impl ReportArgs {
    fn dsn(&self) -> String {
        self.dsn.clone().unwrap_or_else(|| {
            StoreConfig {
                driver: self.driver.clone(),
                user: self.user.clone(),
                password: self.password.clone(),
                host: self.host.clone(),
                port: self.port,
                database: self.database.clone(),
            }
            .dsn()
        })
    }

    fn filter(&self) -> PublisherFilter {
        match (self.publisher_id, self.publisher_name.as_ref()) {
            (Some(id), _) => PublisherFilter::ById(id),
            (None, Some(name)) => PublisherFilter::ByName(name.clone()),
            (None, None) => unreachable!("clap enforces the publisher group"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => {
            let config = ReportConfig {
                dsn: args.dsn(),
                fixture_path: args.fixture.clone(),
                filter: args.filter(),
            };
            let outcome = run_report(config)?;
            for row in &outcome.rows {
                println!("{}", row.report_line());
            }
            println!(
                "Reported {} sales ({} fixture rows loaded)",
                outcome.rows.len(),
                outcome.loaded.total()
            );
        }
    }
    Ok(())
}
