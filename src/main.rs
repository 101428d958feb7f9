//! git-bridge - a local REST bridge to a git working tree
//!
//! # Usage
//! ```bash
//! git-bridge /path/to/worktree          # Start server
//! git-bridge /path/to/worktree --open   # Start and open the panel
//! git-bridge status                     # Check if running
//! git-bridge kill                       # Stop running instance
//! ```

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use axum::routing::get;
use clap::{Parser, Subcommand};
use rust_embed::Embed;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_bridge::config::{BridgeConfig, load_config};
use git_bridge::git::GitFacade;
use git_bridge::routes;

/// Embedded status panel static files
#[derive(Embed)]
#[folder = "frontend/dist"]
struct Assets;

/// git-bridge - serve a git working tree over a small REST API
#[derive(Parser)]
#[command(name = "git-bridge")]
#[command(about = "A local REST bridge to a git working tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the working tree to serve
    #[arg(value_name = "REPO_PATH")]
    repo_path: Option<String>,

    /// Optional TOML config file (remote name, git dir, push auth)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Open the panel in the default browser after starting
    #[arg(short, long)]
    open: bool,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,
}

#[derive(Subcommand)]
enum Commands {
    /// Check if git-bridge is currently running
    Status,
    /// Stop the running git-bridge instance
    Kill,
}

/// PID file info stored as JSON
#[derive(serde::Serialize, serde::Deserialize)]
struct PidInfo {
    pid: u32,
    repo_path: String,
    port: u16,
}

fn pid_file_path() -> PathBuf {
    std::env::temp_dir().join("git-bridge.pid")
}

fn read_pid_info() -> Option<PidInfo> {
    let mut file = fs::File::open(pid_file_path()).ok()?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_pid_info(info: &PidInfo) -> anyhow::Result<()> {
    let mut file = fs::File::create(pid_file_path())?;
    file.write_all(serde_json::to_string(info)?.as_bytes())?;
    Ok(())
}

fn remove_pid_file() {
    let _ = fs::remove_file(pid_file_path());
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // Signal 0 only checks for existence
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use std::process::Command;
    Command::new("tasklist")
        .args(&["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()))
        .unwrap_or(false)
}

#[cfg(unix)]
fn kill_process(pid: u32) -> bool {
    unsafe { libc::kill(pid as i32, libc::SIGTERM) == 0 }
}

#[cfg(windows)]
fn kill_process(pid: u32) -> bool {
    use std::process::Command;
    Command::new("taskkill")
        .args(&["/PID", &pid.to_string(), "/F"])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn handle_status() {
    match read_pid_info() {
        Some(info) if is_process_running(info.pid) => {
            println!("git-bridge is running");
            println!("  PID:  {}", info.pid);
            println!("  Tree: {}", info.repo_path);
            println!("  URL:  http://127.0.0.1:{}", info.port);
        }
        Some(_) => {
            println!("git-bridge is not running (stale PID file)");
            remove_pid_file();
        }
        None => println!("git-bridge is not running"),
    }
}

fn handle_kill() {
    match read_pid_info() {
        Some(info) if is_process_running(info.pid) => {
            if kill_process(info.pid) {
                println!("stopped git-bridge (PID {})", info.pid);
                remove_pid_file();
            } else {
                println!("failed to stop git-bridge (PID {})", info.pid);
            }
        }
        Some(_) => {
            println!("git-bridge is not running (stale PID file)");
            remove_pid_file();
        }
        None => println!("git-bridge is not running"),
    }
}

/// Serve embedded static files, SPA-style: unknown non-file paths fall
/// back to index.html.
async fn serve_static(req: Request<Body>) -> Response<Body> {
    let path = req.uri().path().trim_start_matches('/');
    let path = if path.is_empty() || !path.contains('.') {
        "index.html"
    } else {
        path
    };

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(Body::from(content.data.into_owned()))
                .unwrap()
        }
        None => match Assets::get("index.html") {
            Some(content) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html")
                .body(Body::from(content.data.into_owned()))
                .unwrap(),
            None => Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::from("Not Found"))
                .unwrap(),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Status) => {
            handle_status();
            return Ok(());
        }
        Some(Commands::Kill) => {
            handle_kill();
            return Ok(());
        }
        None => {}
    }

    let repo_path = cli.repo_path.unwrap_or_else(|| {
        eprintln!("Usage: git-bridge <REPO_PATH> [--open] [--config <FILE>]");
        eprintln!("       git-bridge status");
        eprintln!("       git-bridge kill");
        std::process::exit(1);
    });

    if let Some(info) = read_pid_info() {
        if is_process_running(info.pid) {
            eprintln!("git-bridge is already running (PID {})", info.pid);
            eprintln!("  Tree: {}", info.repo_path);
            eprintln!("  URL:  http://127.0.0.1:{}", info.port);
            eprintln!("Run 'git-bridge kill' to stop it first.");
            std::process::exit(1);
        }
        remove_pid_file();
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };

    let canonical_path = std::fs::canonicalize(&repo_path)
        .unwrap_or_else(|_| PathBuf::from(&repo_path))
        .to_string_lossy()
        .to_string();

    let facade = Arc::new(GitFacade::new(&canonical_path, config));

    // The service is useful even before a repository exists at the path;
    // every endpoint answers NO_REPOSITORY until one appears.
    if facade.ensure_repo().is_err() {
        eprintln!("warning: no git repository at {canonical_path}");
        eprintln!("         the API will report NO_REPOSITORY until one exists");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(facade))
        .fallback(get(serve_static))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("failed to bind to port {}: {}", cli.port, e);
            eprintln!("try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    write_pid_info(&PidInfo {
        pid: std::process::id(),
        repo_path: canonical_path.clone(),
        port: cli.port,
    })?;

    let url = format!("http://127.0.0.1:{}", cli.port);
    println!("git-bridge");
    println!("  Tree:   {}", canonical_path);
    println!("  Panel:  {}", url);
    println!("  Stop:   git-bridge kill  (or Ctrl+C)");

    if cli.open {
        if let Err(e) = open::that(&url) {
            eprintln!("warning: could not open browser: {}", e);
        }
    }

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for Ctrl+C");
        println!("shutting down");
        remove_pid_file();
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
