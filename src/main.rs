use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use makhanchor::{
    api::{self, auth, ApiClient, ListQuery, ResourceClient},
    config::AppConfig,
    dates::DateNormalizer,
    import::{BulkImporter, ImportSchema},
    model::{InventoryEntry, MiscellaneousSpend, ProductionRecord, RawMaterialPurchase, SalesRecord},
    report::{self, ReportRange},
    resource::Resource,
    session::Session,
    sheet::{self, export, Table},
    validate::validate_packet_field,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Export and report lists are fetched up to this many rows.
const EXPORT_LIMIT: u32 = 1000;

#[derive(Parser, Debug)]
#[command(name = "makhanchor", about = "MakhanChor biscuit business dashboard")]
struct Cli {
    /// API base URL (default: MAKHANCHOR_API_URL, then REACT_APP_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (default: ~/.makhanchor/session.json).
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the token.
    Login {
        #[arg(long)]
        mobile: String,
        #[arg(long, env = "MAKHANCHOR_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored token.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Update profile fields, e.g. `--json '{"name":"Ravi"}'`.
    Profile {
        #[arg(long = "json")]
        json_body: String,
    },

    /// Change password.
    Chpwd {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },

    /// List records (production, sales, maida, raw-materials/gas, misc, ...).
    List {
        resource: Resource,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },

    /// Server-side totals for a resource.
    Stats {
        resource: Resource,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },

    /// Create a record from a JSON body.
    Create {
        resource: Resource,
        #[arg(long = "json")]
        json_body: String,
    },

    /// Replace a record.
    Update {
        resource: Resource,
        id: String,
        #[arg(long = "json")]
        json_body: String,
    },

    Delete {
        resource: Resource,
        id: String,
    },

    /// Bulk import the first sheet of a workbook or csv.
    Import {
        resource: Resource,
        file: PathBuf,
    },

    /// Export records to a workbook.
    Export {
        resource: Resource,
        /// Output path (default: <resource>_data.xlsx and similar).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Write an empty import template.
    Template {
        resource: Resource,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Overview figures, last seven days and stock alerts.
    Dashboard,

    /// Period report: today, last7days, last30days, thisMonth, lastMonth or START..END.
    Report {
        #[arg(default_value = "last7days")]
        range: ReportRange,
        /// Also write the report workbook here (a directory gets the dated file name).
        #[arg(long = "export")]
        export_to: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,makhanchor=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }

    let session = Arc::new(Session::load(&config.session_file));
    let client = ApiClient::new(&config.api_url, session.clone())
        .with_context(|| format!("bad api url `{}`", config.api_url))?;
    let dates = DateNormalizer::new(config.native_date_basis);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Login { mobile, password } => {
            let user = auth::login(&client, &mobile, &password).await?;
            println!("Logged in as {}", user.display_name());
        }
        Commands::Logout => {
            auth::logout(&client)?;
            println!("Logged out");
        }
        Commands::Whoami => {
            require_session(&session)?;
            match auth::verify_session(&client).await {
                Some(user) => print_json(&user)?,
                None => anyhow::bail!("session expired or invalid, please log in again"),
            }
        }
        Commands::Profile { json_body } => {
            require_session(&session)?;
            let updates: Value = serde_json::from_str(&json_body).context("parsing --json")?;
            let user = auth::update_profile(&client, &updates).await?;
            print_json(&user)?;
        }
        Commands::Chpwd {
            current,
            new,
            confirm,
        } => {
            require_session(&session)?;
            auth::change_password(&client, &current, &new, &confirm).await?;
            println!("Password changed");
        }
        Commands::List {
            resource,
            page,
            limit,
            from,
            to,
        } => {
            require_session(&session)?;
            let query = ListQuery {
                page,
                limit: Some(limit),
                start_date: from,
                end_date: to,
                ..Default::default()
            };
            let page = records::<Value>(&client, resource).list(&query).await?;
            print_json(&page.items)?;
            if let Some(p) = page.pagination {
                info!(page = p.page, pages = p.total_pages, total = p.total, "pagination");
            }
        }
        Commands::Stats { resource, from, to } => {
            require_session(&session)?;
            let query = ListQuery {
                start_date: from,
                end_date: to,
                ..Default::default()
            };
            let stats = api::fetch_stats(&client, resource, Some(&query)).await?;
            print_json(&stats)?;
        }
        Commands::Create {
            resource,
            json_body,
        } => {
            require_session(&session)?;
            let body = parse_body(resource, &json_body)?;
            let created = records::<Value>(&client, resource).create(&body).await?;
            print_json(&created)?;
        }
        Commands::Update {
            resource,
            id,
            json_body,
        } => {
            require_session(&session)?;
            let body = parse_body(resource, &json_body)?;
            let updated = records::<Value>(&client, resource).update(&id, &body).await?;
            print_json(&updated)?;
        }
        Commands::Delete { resource, id } => {
            require_session(&session)?;
            records::<Value>(&client, resource).delete(&id).await?;
            println!("Deleted {} {}", resource, id);
        }
        Commands::Import { resource, file } => {
            require_session(&session)?;
            let rows = sheet::read_first_sheet(&file)?;
            if rows.is_empty() {
                warn!(file = %file.display(), "no rows to import");
                return Ok(());
            }
            let importer = BulkImporter::new(ImportSchema::for_resource(resource), dates);
            let sink = records::<Value>(&client, resource);
            let summary = importer.import(&rows, &sink).await?;
            println!("Imported {} {} rows", summary.submitted, resource.display_name());
        }
        Commands::Export { resource, out } => {
            require_session(&session)?;
            let table = export_table(&client, resource).await?;
            let out = out.unwrap_or_else(|| PathBuf::from(export::export_file_name(resource)));
            sheet::write_tables(&out, &[table])?;
            println!("Wrote {}", out.display());
        }
        Commands::Template { resource, out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(export::template_file_name(resource)));
            sheet::write_tables(&out, &[export::template(resource)])?;
            println!("Wrote {}", out.display());
        }
        Commands::Dashboard => {
            require_session(&session)?;
            let snapshot = api::load_dashboard(&client).await;
            if !session.is_authenticated() {
                anyhow::bail!("session expired or invalid, please log in again");
            }
            let summary = snapshot.summarize(today);
            for alert in &summary.alerts {
                warn!(category = %alert.category, stock = alert.stock, "{}", alert.message);
            }
            print_json(&summary)?;
        }
        Commands::Report { range, export_to } => {
            require_session(&session)?;
            let report = report::generate_report(&client, range, today)
                .await
                .context("Failed to generate report")?;
            print_json(&report.metrics)?;
            if let Some(out) = export_to {
                let out = if out.is_dir() {
                    out.join(report::report_file_name(today))
                } else {
                    out
                };
                sheet::write_tables(&out, &report.tables())?;
                println!("Wrote {}", out.display());
            }
        }
    }
    Ok(())
}

fn records<T>(client: &ApiClient, resource: Resource) -> ResourceClient<T>
where
    T: serde::de::DeserializeOwned + Serialize + Send + Sync,
{
    ResourceClient::new(client.clone(), resource)
}

fn require_session(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        anyhow::bail!("not logged in; run `makhanchor login` first");
    }
    Ok(())
}

/// Parse a JSON object body; sales packets are checked before anything is sent.
fn parse_body(resource: Resource, raw: &str) -> Result<Map<String, Value>> {
    let body: Map<String, Value> =
        serde_json::from_str(raw).context("--json must be a JSON object")?;
    if resource == Resource::Sales {
        validate_packet_field(&body, "packets")?;
    }
    Ok(body)
}

async fn export_table(client: &ApiClient, resource: Resource) -> Result<Table> {
    let all = ListQuery::limit(EXPORT_LIMIT);
    let table = match resource {
        Resource::Production => {
            let page = records::<ProductionRecord>(client, resource).list(&all).await?;
            export::records_table(resource, &page.items)?
        }
        Resource::Sales => {
            let page = records::<SalesRecord>(client, resource).list(&all).await?;
            export::records_table(resource, &page.items)?
        }
        Resource::Inventory(_) => {
            let page = records::<InventoryEntry>(client, resource).list(&all).await?;
            export::records_table(resource, &page.items)?
        }
        Resource::RawMaterial(material) => {
            let page = records::<RawMaterialPurchase>(client, resource).list(&all).await?;
            export::purchases_table(material, &page.items)
        }
        Resource::Miscellaneous => {
            let page = records::<MiscellaneousSpend>(client, resource).list(&all).await?;
            export::spending_table(&page.items)
        }
    };
    info!(%resource, rows = table.rows.len(), "export ready");
    Ok(table)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
