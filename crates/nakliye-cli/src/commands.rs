//! Command handlers

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use nakliye_app::app::{
    notice_for, parse_instant, ticket_board, EntityService, FormChoices, Notice, Subject,
    TicketForm, TicketService, WriteAction,
};
use nakliye_app::app::query_service::available_trucks;
use nakliye_app::config::Config;
use nakliye_app::export::export_board_csv;
use nakliye_app::repository::{backend_client, open_session};
use nakliye_app::session::SessionStore;
use nakliye_domain::model::{
    FacilityPatch, FacilityWrite, OrganizationPatch, OrganizationWrite, TruckPatch, TruckStatus,
    TruckWrite,
};
use nakliye_domain::repository::{
    FacilityRepository, OrganizationRepository, TicketRepository, TruckRepository,
};
use nakliye_domain::service::quote;
use nakliye_infra::ApiSession;
use nakliye_types::{Error, OutputFormat, Result};

use crate::cli::{
    Cli, Commands, FacilityCommands, OrganizationCommands, TicketCommands, TicketFormArgs,
    TruckCommands,
};
use crate::output::{
    print_board, print_facilities, print_json, print_notice, print_organizations, print_quote,
    print_ticket, print_trucks,
};

pub async fn execute(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(ref url) = cli.api_url {
        config.api_url = url.clone();
    }
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Login { email, password } => cmd_login(&config, &email, password).await,
        Commands::Logout => cmd_logout(),
        Commands::Tickets { command } => cmd_tickets(&config, format, command).await,
        Commands::Trucks { command } => cmd_trucks(&config, format, command).await,
        Commands::Facilities { command } => cmd_facilities(&config, format, command).await,
        Commands::Organizations { command } => cmd_organizations(&config, format, command).await,
        Commands::Quote { entry, exit, at } => cmd_quote(&config, format, entry, exit, at),
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            nakliye_server::serve(&config).await
        }
        Commands::Config {
            show,
            set_api_url,
            set_bind,
            set_timeout,
            set_output,
            set_log_json,
            set_base_price,
            set_wait_price,
            set_wait_window,
            reset,
        } => cmd_config(
            show,
            ConfigChanges {
                api_url: set_api_url,
                bind: set_bind,
                timeout: set_timeout,
                output: set_output,
                log_json: set_log_json,
                base_price: set_base_price,
                wait_price: set_wait_price,
                wait_window: set_wait_window,
            },
            reset,
        ),
    }
}

fn session(config: &Config) -> Result<Arc<ApiSession>> {
    let sessions = SessionStore::open_default()?;
    open_session(config, &sessions, Utc::now())
}

/// Print the notice for `outcome`, then pass the outcome on
fn report<T>(subject: Subject, action: WriteAction, outcome: Result<T>) -> Result<T> {
    print_notice(&notice_for(subject, action, &outcome));
    outcome
}

fn read_password() -> Result<String> {
    eprint!("Şifre: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn cmd_login(config: &Config, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let token = backend_client(config)?.sign_in(email, &password).await.map_err(|e| {
        debug!(error = %e, "sign-in failed");
        match e {
            Error::Upstream { status: 400..=499, .. } => {
                Error::Validation("Authentication failed".to_string())
            }
            other => other,
        }
    })?;
    let session = SessionStore::open_default()?.save(token, Utc::now())?;
    println!("Login successful");
    println!(
        "Session valid until {}",
        session.expires_at.with_timezone(&chrono::Local).format("%d.%m.%Y %H:%M")
    );
    Ok(())
}

fn cmd_logout() -> Result<()> {
    if SessionStore::open_default()?.clear()? {
        println!("Logged out");
    } else {
        println!("No stored session");
    }
    Ok(())
}

fn cmd_quote(
    config: &Config,
    format: OutputFormat,
    entry: Option<String>,
    exit: Option<String>,
    at: Option<String>,
) -> Result<()> {
    let entry = entry.as_deref().map(parse_instant).transpose()?;
    let exit = exit.as_deref().map(parse_instant).transpose()?;
    let now = match at {
        Some(at) => parse_instant(&at)?,
        None => Utc::now(),
    };
    print_quote(format, &quote(entry, exit, now, &config.pricing))
}

fn to_form(args: TicketFormArgs) -> TicketForm {
    TicketForm {
        plate_number: args.plate,
        container_number: args.container,
        entry_time: args.entry,
        exit_time: args.exit,
        facility_name: args.facility,
        organization_name: args.organization,
        invoice: args.invoice,
    }
}

async fn cmd_tickets(config: &Config, format: OutputFormat, command: TicketCommands) -> Result<()> {
    let session = session(config)?;

    match command {
        TicketCommands::List => {
            let tickets = TicketRepository::list(&*session).await?;
            print_board(format, &ticket_board(&tickets, &config.pricing, Utc::now()))
        }
        TicketCommands::Show { id } => {
            let ticket = TicketRepository::get(&*session, &id).await?;
            let rows = ticket_board(std::slice::from_ref(&ticket), &config.pricing, Utc::now());
            match rows.first() {
                Some(row) => print_ticket(format, &ticket, row),
                None => Err(Error::NotFound(format!("ticket {}", id))),
            }
        }
        TicketCommands::Create { form } => {
            let form = to_form(form);
            form.check_new()?;
            let trucks = TruckRepository::list(&*session).await?;
            let facilities = FacilityRepository::list(&*session).await?;
            let organizations = OrganizationRepository::list(&*session).await?;
            let choices = FormChoices {
                trucks: &trucks,
                facilities: &facilities,
                organizations: &organizations,
            };
            let write = form.resolve(&choices)?;

            let service = TicketService::new(Arc::clone(&session));
            run_ticket_write(format, service.create(write).await, WriteAction::Create)
        }
        TicketCommands::Update { id, form } => {
            let current = TicketRepository::get(&*session, &id).await?;
            let trucks = TruckRepository::list(&*session).await?;
            let facilities = FacilityRepository::list(&*session).await?;
            let organizations = OrganizationRepository::list(&*session).await?;
            let choices = FormChoices {
                trucks: &trucks,
                facilities: &facilities,
                organizations: &organizations,
            };
            let write = to_form(form).merge_into(current.to_write(), &choices)?;

            let service = TicketService::new(Arc::clone(&session));
            run_ticket_write(format, service.update(&current, write).await, WriteAction::Update)
        }
        TicketCommands::Delete { id } => {
            let current = TicketRepository::get(&*session, &id).await?;
            let service = TicketService::new(Arc::clone(&session));
            match service.delete(&current).await {
                Ok(()) => {
                    print_notice(&Notice::success(Subject::Ticket, WriteAction::Delete));
                    Ok(())
                }
                Err(e) => ticket_write_failed(e),
            }
        }
        TicketCommands::Export { output } => cmd_export(config, &session, &output).await,
    }
}

fn run_ticket_write(
    format: OutputFormat,
    outcome: std::result::Result<nakliye_domain::model::Ticket, nakliye_app::app::TicketServiceError>,
    action: WriteAction,
) -> Result<()> {
    match outcome {
        Ok(ticket) => {
            print_notice(&Notice::success(Subject::Ticket, action));
            if format == OutputFormat::Json {
                print_json(&ticket)?;
            } else {
                println!("  id: {}", ticket.id);
            }
            Ok(())
        }
        Err(e) => ticket_write_failed(e),
    }
}

fn ticket_write_failed(err: nakliye_app::app::TicketServiceError) -> Result<()> {
    print_notice(&err.notice());
    if let nakliye_app::app::TicketServiceError::Failed(failure) = &err {
        eprintln!("  failed step: {}", failure.step);
        for step in &failure.completed {
            eprintln!("  already written: {}", step);
        }
    }
    Err(err.into())
}

async fn cmd_export(config: &Config, session: &ApiSession, output: &Path) -> Result<()> {
    let tickets = TicketRepository::list(session).await?;
    let rows = ticket_board(&tickets, &config.pricing, Utc::now());
    export_board_csv(&rows, output)?;
    println!("Exported {} tickets to {}", rows.len(), output.display());
    Ok(())
}

async fn cmd_trucks(config: &Config, format: OutputFormat, command: TruckCommands) -> Result<()> {
    let session = session(config)?;
    let service = EntityService::new(Arc::clone(&session));

    match command {
        TruckCommands::List { available } => {
            let trucks = TruckRepository::list(&*session).await?;
            let shown: Vec<_> = if available {
                available_trucks(&trucks)
            } else {
                trucks.iter().collect()
            };
            print_trucks(format, &shown)
        }
        TruckCommands::Show { id } => {
            let truck = TruckRepository::get(&*session, &id).await?;
            print_trucks(format, &[&truck])
        }
        TruckCommands::Create {
            plate,
            driver,
            phone,
            capacity,
            status,
        } => {
            let write = TruckWrite {
                plate_number: plate,
                driver_name: driver,
                driver_phone: phone,
                capacity,
                status: TruckStatus::from_label(&status),
            };
            report(Subject::Truck, WriteAction::Create, service.create_truck(write).await)
                .map(|_| ())
        }
        TruckCommands::Update {
            id,
            plate,
            driver,
            phone,
            capacity,
            status,
        } => {
            let patch = TruckPatch {
                plate_number: plate,
                driver_name: driver,
                driver_phone: phone,
                capacity,
                status: status.as_deref().map(TruckStatus::from_label),
            };
            report(Subject::Truck, WriteAction::Update, service.update_truck(&id, &patch).await)
                .map(|_| ())
        }
        TruckCommands::Delete { id } => {
            report(Subject::Truck, WriteAction::Delete, service.delete_truck(&id).await)
        }
    }
}

async fn cmd_facilities(
    config: &Config,
    format: OutputFormat,
    command: FacilityCommands,
) -> Result<()> {
    let session = session(config)?;
    let service = EntityService::new(Arc::clone(&session));

    match command {
        FacilityCommands::List => {
            print_facilities(format, &FacilityRepository::list(&*session).await?)
        }
        FacilityCommands::Show { id } => {
            let facility = FacilityRepository::get(&*session, &id).await?;
            print_facilities(format, std::slice::from_ref(&facility))
        }
        FacilityCommands::Create {
            name,
            address,
            city,
            country,
        } => {
            let write = FacilityWrite {
                name,
                address,
                city,
                country,
            };
            report(Subject::Facility, WriteAction::Create, service.create_facility(write).await)
                .map(|_| ())
        }
        FacilityCommands::Update {
            id,
            name,
            address,
            city,
            country,
        } => {
            let patch = FacilityPatch {
                name,
                address,
                city,
                country,
            };
            report(
                Subject::Facility,
                WriteAction::Update,
                service.update_facility(&id, &patch).await,
            )
            .map(|_| ())
        }
        FacilityCommands::Delete { id } => {
            report(Subject::Facility, WriteAction::Delete, service.delete_facility(&id).await)
        }
    }
}

async fn cmd_organizations(
    config: &Config,
    format: OutputFormat,
    command: OrganizationCommands,
) -> Result<()> {
    let session = session(config)?;
    let service = EntityService::new(Arc::clone(&session));

    match command {
        OrganizationCommands::List => {
            print_organizations(format, &OrganizationRepository::list(&*session).await?)
        }
        OrganizationCommands::Show { id } => {
            let organization = OrganizationRepository::get(&*session, &id).await?;
            print_organizations(format, std::slice::from_ref(&organization))
        }
        OrganizationCommands::Create {
            name,
            address,
            tax_number,
            tax_office,
            invoice_address,
        } => {
            let write = OrganizationWrite {
                name,
                address,
                tax_number,
                tax_office,
                invoice_address,
            };
            report(
                Subject::Organization,
                WriteAction::Create,
                service.create_organization(write).await,
            )
            .map(|_| ())
        }
        OrganizationCommands::Update {
            id,
            name,
            address,
            tax_number,
            tax_office,
            invoice_address,
        } => {
            let patch = OrganizationPatch {
                name,
                address,
                tax_number,
                tax_office,
                invoice_address,
            };
            report(
                Subject::Organization,
                WriteAction::Update,
                service.update_organization(&id, &patch).await,
            )
            .map(|_| ())
        }
        OrganizationCommands::Delete { id } => report(
            Subject::Organization,
            WriteAction::Delete,
            service.delete_organization(&id).await,
        ),
    }
}

/// Requested `config` edits; `None` leaves a field as it is
#[derive(Default)]
struct ConfigChanges {
    api_url: Option<String>,
    bind: Option<String>,
    timeout: Option<u64>,
    output: Option<OutputFormat>,
    log_json: Option<bool>,
    base_price: Option<i64>,
    wait_price: Option<i64>,
    wait_window: Option<i64>,
}

impl ConfigChanges {
    /// Apply to `config`; true if anything changed
    fn apply(self, config: &mut Config) -> Result<bool> {
        let mut modified = false;

        if let Some(url) = self.api_url {
            config.api_url = url;
            modified = true;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
            modified = true;
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
            modified = true;
        }
        if let Some(output) = self.output {
            config.output_format = output;
            modified = true;
        }
        if let Some(flag) = self.log_json {
            config.log_json = flag;
            modified = true;
        }
        if let Some(price) = self.base_price {
            config.pricing.base_price = price;
            modified = true;
        }
        if let Some(price) = self.wait_price {
            config.pricing.price_per_wait_window = price;
            modified = true;
        }
        if let Some(minutes) = self.wait_window {
            if minutes <= 0 {
                return Err(Error::Validation(
                    "wait window must be a positive number of minutes".to_string(),
                ));
            }
            config.pricing.wait_window_minutes = minutes;
            modified = true;
        }
        Ok(modified)
    }
}

fn cmd_config(show: bool, changes: ConfigChanges, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let path = Config::config_path()?;
    let mut config = Config::load_from(&path)?;
    let modified = changes.apply(&mut config)?;

    if modified {
        config.save_to(&path)?;
        println!("Configuration saved");
    }

    if show || !modified {
        println!("{}", config);
        println!("Config file: {}", path.display());
    }

    Ok(())
}
