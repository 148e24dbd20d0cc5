//! Terminal front end for the MIPI alert workflow.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use mipi_alerts::api::{AlertService, ApiClient};
use mipi_alerts::dashboard::DashboardSummary;
use mipi_alerts::entities::format_timestamp;
use mipi_alerts::session::{Route, RouteGuard, SessionContext, SPLASH_DURATION};
use mipi_alerts::store::FileTokenStore;
use mipi_alerts::workflow::{AlertDetail, AlertList, ClassificationTable, FileCamera};
use mipi_alerts::{AuthError, CaptureError, ClientConfig, ConfigError, FetchError, StoreError, SubmitError};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "mipi")]
#[command(about = "Consulta e justificativa de alertas MIPI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print collected metrics in Prometheus text format before exiting
    #[arg(long, global = true)]
    print_metrics: bool,

    /// Emit JSON instead of text where the command supports it
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and store the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Falls back to MIPI_PASSWORD
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Remove the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// List alerts with their card colors
    Alerts,

    /// Show the timeline of one alert
    History { alert_id: String },

    /// List the corrective actions offered for one alert
    Actions { alert_id: String },

    /// Submit a justification for one alert
    Justify {
        alert_id: String,

        /// Corrective action id or text
        #[arg(short, long)]
        action: String,

        /// Justification text
        #[arg(short, long)]
        text: String,

        /// Photo files, one per capture (at least one, at most five)
        #[arg(long = "photo", required = true)]
        photos: Vec<PathBuf>,
    },

    /// Summary counts for the current alert list
    Dashboard,

    /// Print the web portal address
    Portal,

    /// Resolve where the route guard sends a screen
    Route {
        /// Requested screen (dashboard, alertas, login, ...)
        current: String,

        /// Wait out the intro screen instead of skipping it
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    fn user_message(&self) -> String {
        match self {
            CliError::Config(e) => format!("Configuração inválida: {e}"),
            CliError::Auth(e) => e.user_message(),
            CliError::Fetch(e) => e.user_message(),
            CliError::Submit(e) => e.user_message(),
            CliError::Capture(e) => e.user_message(),
            CliError::Store(e) => format!("Não foi possível acessar a sessão salva: {e}"),
            CliError::Usage(message) => message.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    mipi_alerts::telemetry::init_telemetry("mipi-cli");

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!(error = %e, "metrics recorder not installed");
            None
        }
    };

    let result = run(&cli).await;
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    };

    if cli.print_metrics {
        print_metrics(metrics.as_ref());
    }
    mipi_alerts::telemetry::shutdown_telemetry();
    code
}

fn print_metrics(handle: Option<&PrometheusHandle>) {
    match handle {
        Some(handle) => print!("{}", handle.render()),
        None => eprintln!("metrics unavailable"),
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let store = Arc::new(FileTokenStore::new(config.data_dir.clone()));
    let session = SessionContext::new(store);
    session.hydrate().await;

    let client = Arc::new(ApiClient::new(&config, session.clone())?);
    info!(base_url = %config.base_url, contract = %client.contract(), "client ready");

    match &cli.command {
        Commands::Login { username, password } => login(&client, username, password.clone()).await,
        Commands::Logout => {
            client.logout().await?;
            println!("Sessão encerrada.");
            Ok(())
        }
        Commands::Whoami => whoami(&session, cli.json).await,
        Commands::Alerts => alerts(client, cli.json).await,
        Commands::History { alert_id } => history(client, session, alert_id, cli.json).await,
        Commands::Actions { alert_id } => actions(client, session, alert_id).await,
        Commands::Justify {
            alert_id,
            action,
            text,
            photos,
        } => justify(client, session, alert_id, action, text, photos).await,
        Commands::Dashboard => dashboard(client, &session, cli.json).await,
        Commands::Portal => {
            println!("{}", config.portal_url);
            Ok(())
        }
        Commands::Route { current, wait } => route(&session, current, *wait).await,
    }
}

async fn login(client: &ApiClient, username: &str, password: Option<String>) -> Result<(), CliError> {
    let password = password
        .or_else(|| std::env::var("MIPI_PASSWORD").ok())
        .unwrap_or_default();
    let session = client.login(username, &password).await?;
    println!("Bem-vindo, {} ({}).", session.name, session.role);
    Ok(())
}

async fn whoami(session: &SessionContext, json: bool) -> Result<(), CliError> {
    let snapshot = session.snapshot().await;
    let Some(user) = snapshot.session else {
        return Err(CliError::Usage("Nenhuma sessão ativa. Use `mipi login`.".to_string()));
    };
    if json {
        let value = serde_json::json!({ "id": user.id, "nome": user.name, "tipoUsuario": user.role });
        println!("{value}");
    } else {
        println!("{} ({}) id={}", user.name, user.role, user.id);
    }
    Ok(())
}

async fn load_alerts(client: Arc<ApiClient>) -> Result<AlertList, CliError> {
    let mut list = AlertList::new(client);
    list.refresh().await?;
    Ok(list)
}

async fn alerts(client: Arc<ApiClient>, json: bool) -> Result<(), CliError> {
    let list = load_alerts(client).await?;
    if json {
        let rows: Vec<_> = list
            .alerts()
            .iter()
            .map(|a| serde_json::json!({ "alert": a, "theme": a.theme(), "icon": a.icon_name() }))
            .collect();
        println!("{}", serde_json::Value::Array(rows));
        return Ok(());
    }
    if list.alerts().is_empty() {
        println!("Nenhum alerta encontrado.");
    }
    for alert in list.alerts() {
        let theme = alert.theme();
        println!(
            "{:<8} {:<22} {:<10} {:<17} bg={} border={} icon={}",
            alert.id,
            alert.status,
            alert.prefix.as_deref().unwrap_or("-"),
            alert.occurred_at.as_deref().map(format_timestamp).unwrap_or_default(),
            theme.background_color,
            theme.border_color,
            alert.icon_name(),
        );
    }
    Ok(())
}

/// Opens the detail view for `alert_id`, looking the alert up in a fresh list.
async fn open_detail(
    client: Arc<ApiClient>,
    session: SessionContext,
    alert_id: &str,
) -> Result<AlertDetail, CliError> {
    let list = load_alerts(client.clone()).await?;
    let alert = list
        .find(alert_id)
        .cloned()
        .ok_or_else(|| CliError::Usage(format!("Alerta {alert_id} não encontrado.")))?;

    let service: Arc<dyn AlertService> = client;
    let table = ClassificationTable::fetch_or_empty(service.as_ref()).await;
    let mut detail = AlertDetail::new(service, session, Arc::new(table));
    detail.open(alert).await;
    Ok(detail)
}

async fn history(
    client: Arc<ApiClient>,
    session: SessionContext,
    alert_id: &str,
    json: bool,
) -> Result<(), CliError> {
    let detail = open_detail(client, session, alert_id).await?;
    if let Some(message) = detail.error() {
        eprintln!("{message}");
    }
    if json {
        let rows: Vec<_> = detail
            .history()
            .iter()
            .map(|e| serde_json::json!({ "event": e, "dotColor": e.dot_color() }))
            .collect();
        println!("{}", serde_json::Value::Array(rows));
        return Ok(());
    }
    for event in detail.history() {
        println!(
            "● {} {:<17} {:<22} {}",
            event.dot_color(),
            format_timestamp(&event.occurred_at),
            event.status,
            event.description
        );
    }
    Ok(())
}

async fn actions(client: Arc<ApiClient>, session: SessionContext, alert_id: &str) -> Result<(), CliError> {
    let detail = open_detail(client, session, alert_id).await?;
    for action in detail.corrective_actions() {
        println!("{:<6} {}", action.id.as_deref().unwrap_or("-"), action.text);
    }
    Ok(())
}

async fn justify(
    client: Arc<ApiClient>,
    session: SessionContext,
    alert_id: &str,
    action: &str,
    text: &str,
    photos: &[PathBuf],
) -> Result<(), CliError> {
    let mut detail = open_detail(client, session, alert_id).await?;
    detail.open_form();

    if detail.select_action(action).is_none() {
        let offered: Vec<&str> = detail.corrective_actions().iter().map(|a| a.text.as_str()).collect();
        return Err(CliError::Usage(format!(
            "Ação corretiva \"{action}\" não disponível. Opções: {}",
            offered.join("; ")
        )));
    }
    detail.set_justification(text);

    let camera = FileCamera::new(photos.iter().cloned());
    while camera.remaining().await > 0 {
        detail.capture_photo(&camera).await?;
    }

    detail.submit().await?;
    println!("Justificativa enviada para o alerta {alert_id}.");
    if let Some(last) = detail.history().last() {
        println!("Status atual: {}", last.status);
    }
    Ok(())
}

async fn dashboard(client: Arc<ApiClient>, session: &SessionContext, json: bool) -> Result<(), CliError> {
    let list = load_alerts(client).await?;
    let summary = DashboardSummary::from_alerts(list.alerts());
    if json {
        println!(
            "{}",
            serde_json::to_string(&summary).map_err(|e| CliError::Usage(e.to_string()))?
        );
        return Ok(());
    }
    if let Some(user) = session.snapshot().await.session {
        println!("Olá, {}", user.name);
    }
    println!("Total de alertas gerados: {}", summary.total);
    println!("Alertas em aberto: {}", summary.open);
    println!("Concluídos: {}%", summary.closed_percent());
    for (status, count) in &summary.by_status {
        println!("  {status}: {count}");
    }
    Ok(())
}

async fn route(session: &SessionContext, current: &str, wait: bool) -> Result<(), CliError> {
    let mut current: Route = current.parse().map_err(CliError::Usage)?;
    let snapshot = session.snapshot().await;
    let mut guard = RouteGuard::new();
    let mut trail = vec![current];

    // Splash, its hand-off, and one guard redirect bound the walk.
    for _ in 0..4 {
        let next = match guard.next_route(&snapshot, current) {
            Some(next) => next,
            None if current == Route::Splash => {
                if wait {
                    tokio::time::sleep(SPLASH_DURATION).await;
                }
                guard.splash_finished()
            }
            None => break,
        };
        trail.push(next);
        current = next;
    }

    let trail: Vec<&str> = trail.iter().map(Route::as_str).collect();
    println!("{}", trail.join(" -> "));
    Ok(())
}
