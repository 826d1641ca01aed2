mod config;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::Config;
use gcompute::gcp::auth::GcpCredentials;
use gcompute::gcp::client::GcpClient;
use gcompute::{ComputeRpc, HttpComputeRpc, Page, RpcOptions};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Query Compute Engine disk types, machine types, regions, zones and licenses
#[derive(Parser, Debug)]
#[command(name = "gcompute", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// GCP project to use
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Compute Engine endpoint (defaults to the public API)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Use this OAuth access token instead of Application Default Credentials
    #[arg(long, global = true, env = "GCOMPUTE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Resource(ResourceCommand),
    /// Update the saved configuration
    Config(ConfigArgs),
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// Disk types of a zone, or of every zone
    DiskTypes {
        #[command(subcommand)]
        action: ZonalAction,
    },
    /// Machine types of a zone, or of every zone
    MachineTypes {
        #[command(subcommand)]
        action: ZonalAction,
    },
    /// Regions of the project
    Regions {
        #[command(subcommand)]
        action: GlobalAction,
    },
    /// Zones of the project
    Zones {
        #[command(subcommand)]
        action: GlobalAction,
    },
    /// Licenses published by a project
    Licenses {
        #[command(subcommand)]
        action: LicenseAction,
    },
}

#[derive(Subcommand, Debug)]
enum ZonalAction {
    /// Get one resource by name
    Get {
        name: String,
        /// Zone owning the resource
        #[arg(short, long)]
        zone: Option<String>,
        #[arg(long)]
        fields: Option<String>,
    },
    /// List one page of resources
    List {
        /// Zone to list; lists every zone of the project when omitted
        #[arg(short, long)]
        zone: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand, Debug)]
enum GlobalAction {
    /// Get one resource by name
    Get {
        name: String,
        #[arg(long)]
        fields: Option<String>,
    },
    /// List one page of resources
    List {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand, Debug)]
enum LicenseAction {
    /// Get one license by name
    Get {
        name: String,
        /// Project publishing the license (defaults to the current project)
        #[arg(long)]
        license_project: Option<String>,
        #[arg(long)]
        fields: Option<String>,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Field mask, e.g. `items(name,description),nextPageToken`
    #[arg(long)]
    fields: Option<String>,
    /// Page size cap
    #[arg(long)]
    max_results: Option<u32>,
    /// Token returned by a previous call
    #[arg(long)]
    page_token: Option<String>,
    /// Server-side filter expression
    #[arg(long)]
    filter: Option<String>,
}

impl PageArgs {
    fn into_options(self) -> RpcOptions {
        RpcOptions {
            fields: self.fields,
            max_results: self.max_results,
            page_token: self.page_token,
            filter: self.filter,
        }
    }
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Default zone
    #[arg(long)]
    zone: Option<String>,
    /// Default page size
    #[arg(long)]
    max_results: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // RUST_LOG wins over --log-level
    let filter = match (EnvFilter::try_from_default_env(), level.to_tracing_level()) {
        (Ok(filter), _) => filter,
        (Err(_), Some(level)) => EnvFilter::default().add_directive(level.into()),
        (Err(_), None) => return None,
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcompute {} started with log level: {:?}", env!("CARGO_PKG_VERSION"), level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcompute").join("gcompute.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcompute").join("gcompute.log");
    }
    PathBuf::from("gcompute.log")
}

/// Wire shape of a printed page
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageOutput<T> {
    items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_page_token: Option<String>,
}

impl<T> From<Page<T>> for PageOutput<T> {
    fn from(page: Page<T>) -> Self {
        let (next_page_token, items) = page.into_parts();
        Self {
            items: items.collect(),
            next_page_token,
        }
    }
}

fn print<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn print_page<T: Serialize>(page: Page<T>, format: OutputFormat) -> Result<ExitCode> {
    print(&PageOutput::from(page), format)?;
    Ok(ExitCode::SUCCESS)
}

fn print_found<T: Serialize>(
    found: Option<T>,
    kind: &str,
    name: &str,
    format: OutputFormat,
) -> Result<ExitCode> {
    match found {
        Some(resource) => {
            print(&resource, format)?;
            Ok(ExitCode::SUCCESS)
        },
        None => {
            eprintln!("{} '{}' not found", kind, name);
            Ok(ExitCode::FAILURE)
        },
    }
}

fn require_zone(zone: Option<String>) -> Result<String> {
    zone.ok_or_else(|| {
        anyhow!("No zone configured. Use --zone, set CLOUDSDK_COMPUTE_ZONE or run 'gcompute config --zone'")
    })
}

async fn build_rpc(global: &GlobalArgs, config: &Config) -> Result<HttpComputeRpc> {
    let project = config.effective_project(global.project.as_deref()).ok_or_else(|| {
        anyhow!("No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag")
    })?;
    let endpoint = config.effective_endpoint(global.endpoint.as_deref());

    tracing::info!("Using project: {}, endpoint: {}", project, endpoint);

    let credentials = match &global.access_token {
        Some(token) => GcpCredentials::from_access_token(token.clone()),
        None => GcpCredentials::new()
            .await
            .context("Failed to initialize GCP credentials")?,
    };

    let client = GcpClient::with_credentials(&project, credentials)?
        .with_timeout(config.effective_timeout(global.timeout))?
        .with_endpoint(&endpoint)?;
    Ok(HttpComputeRpc::new(client))
}

fn update_config(args: ConfigArgs, global: &GlobalArgs, mut config: Config) -> Result<ExitCode> {
    let path = Config::config_path().ok_or_else(|| anyhow!("No configuration directory"))?;

    if let Some(project) = &global.project {
        config.project_id = Some(project.clone());
    }
    if let Some(endpoint) = &global.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(zone) = args.zone {
        config.zone = Some(zone);
    }
    if let Some(max_results) = args.max_results {
        config.default_options.max_results = Some(max_results);
    }
    if let Some(timeout) = global.timeout {
        config.timeout_secs = Some(timeout);
    }

    config.save_to(&path)?;
    eprintln!("Saved {}", path.display());
    print(&config, global.output)?;
    Ok(ExitCode::SUCCESS)
}

/// Options of a get call: only the field mask applies
fn get_options(fields: Option<String>, defaults: &RpcOptions) -> RpcOptions {
    RpcOptions {
        fields,
        ..RpcOptions::default()
    }
    .or(defaults)
}

/// Resource families listed per zone
#[derive(Debug, Clone, Copy)]
enum ZonalFamily {
    DiskTypes,
    MachineTypes,
}

async fn run_zonal(
    family: ZonalFamily,
    action: ZonalAction,
    rpc: &HttpComputeRpc,
    config: &Config,
    format: OutputFormat,
) -> Result<ExitCode> {
    let defaults = &config.default_options;

    match action {
        ZonalAction::Get { name, zone, fields } => {
            let zone = require_zone(config.effective_zone(zone.as_deref()))?;
            let opts = get_options(fields, defaults);
            match family {
                ZonalFamily::DiskTypes => {
                    let found = rpc.get_disk_type(&zone, &name, &opts).await?;
                    print_found(found, "Disk type", &name, format)
                },
                ZonalFamily::MachineTypes => {
                    let found = rpc.get_machine_type(&zone, &name, &opts).await?;
                    print_found(found, "Machine type", &name, format)
                },
            }
        },
        ZonalAction::List { zone, page } => {
            let opts = page.into_options().or(defaults);
            match (family, zone) {
                (ZonalFamily::DiskTypes, Some(zone)) => {
                    print_page(rpc.list_disk_types(&zone, &opts).await?, format)
                },
                (ZonalFamily::DiskTypes, None) => {
                    print_page(rpc.list_all_disk_types(&opts).await?, format)
                },
                (ZonalFamily::MachineTypes, Some(zone)) => {
                    print_page(rpc.list_machine_types(&zone, &opts).await?, format)
                },
                (ZonalFamily::MachineTypes, None) => {
                    print_page(rpc.list_all_machine_types(&opts).await?, format)
                },
            }
        },
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load();
    let Cli { global, command } = cli;
    let format = global.output;

    let command = match command {
        Command::Config(args) => return update_config(args, &global, config),
        Command::Resource(command) => command,
    };

    let rpc = build_rpc(&global, &config).await?;
    let defaults = &config.default_options;

    match command {
        ResourceCommand::DiskTypes { action } => {
            run_zonal(ZonalFamily::DiskTypes, action, &rpc, &config, format).await
        },
        ResourceCommand::MachineTypes { action } => {
            run_zonal(ZonalFamily::MachineTypes, action, &rpc, &config, format).await
        },
        ResourceCommand::Regions { action } => match action {
            GlobalAction::Get { name, fields } => {
                let found = rpc.get_region(&name, &get_options(fields, defaults)).await?;
                print_found(found, "Region", &name, format)
            },
            GlobalAction::List { page } => {
                let page = rpc.list_regions(&page.into_options().or(defaults)).await?;
                print_page(page, format)
            },
        },
        ResourceCommand::Zones { action } => match action {
            GlobalAction::Get { name, fields } => {
                let found = rpc.get_zone(&name, &get_options(fields, defaults)).await?;
                print_found(found, "Zone", &name, format)
            },
            GlobalAction::List { page } => {
                let page = rpc.list_zones(&page.into_options().or(defaults)).await?;
                print_page(page, format)
            },
        },
        ResourceCommand::Licenses {
            action: LicenseAction::Get { name, license_project, fields },
        } => {
            let project = license_project.unwrap_or_else(|| rpc.project_id().to_string());
            let found = rpc
                .get_license(&project, &name, &get_options(fields, defaults))
                .await?;
            print_found(found, "License", &name, format)
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = setup_logging(cli.global.log_level);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:?}", err);
            match err.downcast_ref::<gcompute::ComputeError>() {
                Some(compute_err) => eprintln!("Error: {}", compute_err.user_message()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gcompute").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_is_its_own_branch() {
        let cli = parse(&["config", "--zone", "us-east1-b", "--timeout", "5"]);
        assert_eq!(cli.global.timeout, Some(5));
        match cli.command {
            Command::Config(args) => {
                assert_eq!(args.zone.as_deref(), Some("us-east1-b"));
            },
            Command::Resource(other) => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_license_project_is_separate_from_global_project() {
        let cli = parse(&[
            "--project",
            "my-project-123",
            "licenses",
            "get",
            "debian-12-bookworm",
            "--license-project",
            "debian-cloud",
        ]);
        assert_eq!(cli.global.project.as_deref(), Some("my-project-123"));
        match cli.command {
            Command::Resource(ResourceCommand::Licenses {
                action: LicenseAction::Get { name, license_project, .. },
            }) => {
                assert_eq!(name, "debian-12-bookworm");
                assert_eq!(license_project.as_deref(), Some("debian-cloud"));
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_timeout_after_subcommand() {
        let cli = parse(&["zones", "list", "--max-results", "2", "--timeout", "7"]);
        assert_eq!(cli.global.timeout, Some(7));
        assert!(matches!(
            cli.command,
            Command::Resource(ResourceCommand::Zones {
                action: GlobalAction::List { page: PageArgs { max_results: Some(2), .. } }
            })
        ));
    }
}
