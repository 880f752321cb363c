use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use foundation::{LatLon, ObstacleId};
use planner::{
    AdminModerationClient, AdminSecret, DEFAULT_GEOCODER_URL, DeleteOutcome, GeocodeSearch,
    HttpPlannerService, NominatimGeocoder, ObstacleEditor, RouteOutcome,
    RouteRequestOrchestrator, SearchOutcome, ServiceConfig,
};
use session::{
    Algorithm, ClickOutcome, InteractionMode, MapInteractionController, SearchMargin,
    SessionHandle,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evacuation route planner client")]
struct Args {
    /// Planning service base URL (default: $EXODUS_API_URL or http://localhost:8000)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two points
    Route {
        /// Start point: lat,lon
        #[arg(long, value_parser = parse_point)]
        start: LatLon,

        /// End point: lat,lon
        #[arg(long, value_parser = parse_point)]
        end: LatLon,

        /// Search area margin around the markers (0 to 5)
        #[arg(long, value_parser = parse_margin, default_value = "0.2")]
        margin: SearchMargin,

        /// "A-star" or "Ant colony"
        #[arg(long, default_value = "A-star")]
        algorithm: Algorithm,
    },

    /// Look up a place inside the service region
    Search { query: String },

    /// Reported obstacles
    Obstacles {
        #[command(subcommand)]
        command: ObstaclesCommand,
    },

    /// Obstacle moderation (needs the admin secret)
    Admin {
        /// Admin secret (default: $ADMIN_SECRET)
        #[arg(long)]
        secret: Option<String>,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ObstaclesCommand {
    /// Print the current server-side set
    List,

    /// Report one or more blocked points
    Add {
        /// Points: lat,lon
        #[arg(required = true, value_parser = parse_point)]
        points: Vec<LatLon>,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Print confirmed and unconfirmed obstacles
    List,

    /// Move obstacles to the other list and submit
    Toggle {
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Delete an obstacle
    Delete {
        id: u64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

struct Config {
    api_url: String,
    geocoder_url: String,
    timeout: Duration,
}

impl Config {
    fn from_env(api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| {
            env::var("EXODUS_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
        });
        let geocoder_url =
            env::var("EXODUS_GEOCODER_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string());
        let timeout = env::var("EXODUS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        Self {
            api_url,
            geocoder_url,
            timeout: Duration::from_secs(timeout),
        }
    }

    fn service(&self, base_url: &str) -> ServiceConfig {
        ServiceConfig::default()
            .with_base_url(base_url)
            .with_timeout(self.timeout)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::from_env(args.api_url);
    let service = Arc::new(HttpPlannerService::new(config.service(&config.api_url))?);
    let session = SessionHandle::default();

    match args.command {
        Command::Route {
            start,
            end,
            margin,
            algorithm,
        } => plan_route(session, service, start, end, margin, algorithm).await?,
        Command::Search { query } => {
            let geocoder = Arc::new(NominatimGeocoder::new(config.service(&config.geocoder_url))?);
            search(session, geocoder, query).await?
        }
        Command::Obstacles { command } => {
            let editor = ObstacleEditor::new(session.clone(), service);
            match command {
                ObstaclesCommand::List => list_obstacles(&session, &editor).await?,
                ObstaclesCommand::Add { points } => {
                    add_obstacles(&session, &editor, points).await?
                }
            }
        }
        Command::Admin { secret, command } => {
            let secret = secret
                .or_else(|| env::var("ADMIN_SECRET").ok())
                .map(AdminSecret::new)
                .filter(|s| !s.is_empty())
                .ok_or("admin commands need --secret or ADMIN_SECRET")?;
            let client = AdminModerationClient::new(service);
            moderate(&client, &secret, command).await?
        }
    }

    Ok(())
}

async fn plan_route(
    session: SessionHandle,
    service: Arc<HttpPlannerService>,
    start: LatLon,
    end: LatLon,
    margin: SearchMargin,
    algorithm: Algorithm,
) -> Result<(), Box<dyn std::error::Error>> {
    let editor = ObstacleEditor::new(session.clone(), service.clone());
    if let Err(e) = editor.refresh().await {
        warn!("could not load obstacles: {e}");
    }

    let controller = MapInteractionController::new(session.clone());
    for point in [start, end] {
        if let ClickOutcome::Rejected(err) = controller.on_map_click(point) {
            return Err(err.into());
        }
    }
    controller.set_margin(margin);
    controller.set_algorithm(algorithm);

    let orchestrator = RouteRequestOrchestrator::new(session.clone(), service);
    match orchestrator.request_route().await? {
        RouteOutcome::Planned { points, length_m } => {
            info!(points, "route received");
            session.read(|s| {
                for p in s.route().points() {
                    println!("{:.6},{:.6}", p.lat, p.lon);
                }
            });
            println!("# {points} points, {:.1} km", length_m / 1000.0);
        }
        RouteOutcome::NoRouteFound => {
            print_alert(&session);
            if margin.get() < SearchMargin::MAX {
                eprintln!("hint: retry with --margin {}", margin.widened().get());
            }
        }
        RouteOutcome::Superseded => {}
    }
    Ok(())
}

async fn search(
    session: SessionHandle,
    geocoder: Arc<NominatimGeocoder>,
    query: String,
) -> Result<(), Box<dyn std::error::Error>> {
    session.update(|s| s.set_search_query(query));
    let search = GeocodeSearch::new(session.clone(), geocoder);
    match search.search().await? {
        SearchOutcome::Found(center) => println!("{:.6},{:.6}", center.lat, center.lon),
        SearchOutcome::NotFound => print_alert(&session),
        SearchOutcome::EmptyQuery => eprintln!("empty query"),
    }
    Ok(())
}

async fn list_obstacles(
    session: &SessionHandle,
    editor: &ObstacleEditor,
) -> Result<(), Box<dyn std::error::Error>> {
    editor.refresh().await?;
    session.read(|s| {
        for o in s.obstacles() {
            match o.id {
                Some(id) => println!("#{id}\t{:.6},{:.6}", o.position.lat, o.position.lon),
                None => println!("-\t{:.6},{:.6}", o.position.lat, o.position.lon),
            }
        }
    });
    Ok(())
}

async fn add_obstacles(
    session: &SessionHandle,
    editor: &ObstacleEditor,
    points: Vec<LatLon>,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = MapInteractionController::new(session.clone());
    controller.set_mode(InteractionMode::ObstacleEditing);
    for point in points {
        if let ClickOutcome::Rejected(err) = controller.on_map_click(point) {
            return Err(err.into());
        }
    }
    let count = editor.save_obstacles().await?;
    println!("saved; {count} obstacles on record");
    Ok(())
}

async fn moderate(
    client: &AdminModerationClient,
    secret: &AdminSecret,
    command: AdminCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    client.load(secret).await?;
    match command {
        AdminCommand::List => {
            let view = client.view();
            for (label, list) in [
                ("confirmed", view.board.confirmed()),
                ("unconfirmed", view.board.unconfirmed()),
            ] {
                println!("{label}:");
                for o in list {
                    println!("  #{}\t{:.6},{:.6}", o.id, o.lat, o.lon);
                }
            }
        }
        AdminCommand::Toggle { ids } => {
            for id in ids {
                let to = client.toggle(ObstacleId(id))?;
                info!(id, ?to, "toggled");
            }
            let total = client.commit(secret).await?;
            println!("updated; {total} obstacles on record");
        }
        AdminCommand::Delete { id, yes } => {
            let mut prompt = |message: &str| yes || ask(message);
            match client.delete(ObstacleId(id), secret, &mut prompt).await? {
                DeleteOutcome::Deleted => println!("deleted #{id}"),
                DeleteOutcome::Cancelled => println!("cancelled"),
            }
        }
    }
    Ok(())
}

fn ask(message: &str) -> bool {
    print!("{message} [y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn print_alert(session: &SessionHandle) {
    if let Some(message) = session.read(|s| s.alert_message()) {
        eprintln!("{message}");
    }
}

fn parse_point(s: &str) -> Result<LatLon, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon, got '{s}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("longitude: {e}"))?;
    Ok(LatLon::new(lat, lon))
}

fn parse_margin(s: &str) -> Result<SearchMargin, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("margin: {e}"))?;
    SearchMargin::new(value).map_err(|e| e.to_string())
}
