//! CLI definition using clap

use clap::{Args, Parser, Subcommand};
use nakliye_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nakliye")]
#[command(version)]
#[command(about = "Container haulage desk: tickets, trucks, facilities and customer accounts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL. Uses config value if not specified.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long, short = 'e')]
        email: String,

        /// Password; read from stdin if omitted
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Tickets (iş kayıtları)
    Tickets {
        #[command(subcommand)]
        command: TicketCommands,
    },

    /// Trucks (araçlar)
    Trucks {
        #[command(subcommand)]
        command: TruckCommands,
    },

    /// Facilities (depolar)
    Facilities {
        #[command(subcommand)]
        command: FacilityCommands,
    },

    /// Customer accounts (cari kayıtlar)
    Organizations {
        #[command(subcommand)]
        command: OrganizationCommands,
    },

    /// Price a visit from its timestamps without touching the backend
    Quote {
        /// Entry time (RFC 3339, "YYYY-MM-DD HH:MM" or "DD.MM.YYYY HH:MM")
        #[arg(long)]
        entry: Option<String>,

        /// Exit time
        #[arg(long)]
        exit: Option<String>,

        /// Evaluate as of this time instead of now
        #[arg(long)]
        at: Option<String>,
    },

    /// Run the HTTP front
    Serve {
        /// Listen address. Uses config value if not specified.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set backend API base URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Set listen address for `serve`
        #[arg(long)]
        set_bind: Option<String>,

        /// Set backend request timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Enable/disable JSON log lines
        #[arg(long)]
        set_log_json: Option<bool>,

        /// Set the fixed shipping charge
        #[arg(long)]
        set_base_price: Option<i64>,

        /// Set the charge per wait window
        #[arg(long)]
        set_wait_price: Option<i64>,

        /// Set the wait window length in minutes
        #[arg(long)]
        set_wait_window: Option<i64>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Form fields of a ticket; trucks by plate, the rest by name
#[derive(Args, Debug, Clone, Default)]
pub struct TicketFormArgs {
    #[arg(long)]
    pub plate: Option<String>,

    #[arg(long)]
    pub container: Option<String>,

    #[arg(long)]
    pub entry: Option<String>,

    #[arg(long)]
    pub exit: Option<String>,

    #[arg(long)]
    pub facility: Option<String>,

    #[arg(long)]
    pub organization: Option<String>,

    /// KESİLDİ or KESİLMEDİ (required for new tickets)
    #[arg(long)]
    pub invoice: Option<String>,
}

#[derive(Subcommand)]
pub enum TicketCommands {
    /// Ticket board with live status and price
    List,

    Show { id: String },

    Create {
        #[command(flatten)]
        form: TicketFormArgs,
    },

    /// Change the given fields; an empty value clears a field
    Update {
        id: String,

        #[command(flatten)]
        form: TicketFormArgs,
    },

    Delete { id: String },

    /// Write the ticket board to a CSV file
    Export {
        #[arg(long, short = 'o', default_value = "tickets.csv")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum TruckCommands {
    List {
        /// Only trucks that can be assigned (BOŞ)
        #[arg(long)]
        available: bool,
    },

    Show { id: String },

    Create {
        #[arg(long)]
        plate: String,

        #[arg(long)]
        driver: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        capacity: f64,

        /// YÜKLÜ or BOŞ
        #[arg(long, default_value = "BOŞ")]
        status: String,
    },

    Update {
        id: String,

        #[arg(long)]
        plate: Option<String>,

        #[arg(long)]
        driver: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        capacity: Option<f64>,

        #[arg(long)]
        status: Option<String>,
    },

    Delete { id: String },
}

#[derive(Subcommand)]
pub enum FacilityCommands {
    List,

    Show { id: String },

    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        country: String,
    },

    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },

    Delete { id: String },
}

#[derive(Subcommand)]
pub enum OrganizationCommands {
    List,

    Show { id: String },

    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        tax_number: String,

        #[arg(long)]
        tax_office: String,

        #[arg(long)]
        invoice_address: String,
    },

    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        tax_number: Option<String>,

        #[arg(long)]
        tax_office: Option<String>,

        #[arg(long)]
        invoice_address: Option<String>,
    },

    Delete { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ticket_update() {
        let cli = Cli::try_parse_from([
            "nakliye", "tickets", "update", "tk1", "--plate", "34 ABC 123", "--exit", "",
        ])
        .unwrap();
        match cli.command {
            Commands::Tickets {
                command: TicketCommands::Update { id, form },
            } => {
                assert_eq!(id, "tk1");
                assert_eq!(form.plate.as_deref(), Some("34 ABC 123"));
                assert_eq!(form.exit.as_deref(), Some(""));
                assert!(form.entry.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::try_parse_from(["nakliye", "trucks", "list", "--available", "-f", "json"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }
}
