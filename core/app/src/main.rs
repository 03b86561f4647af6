//! WebLocker dashboard entrypoint.
//!
//! A single-threaded controller loop multiplexes stdin commands with
//! scheduled events (unlock countdowns, error expiry). Rendering here is
//! plain line output; all behavior lives in the library crates.

use clap::Parser;
use std::env;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use weblock_app::actions::fields;
use weblock_app::{events, ApiClient, App, PendingAction};
use weblock_core::{format_minutes, format_relative, load_config, KvStore, StorageConfig};

#[derive(Parser, Debug)]
#[command(name = "weblock", about = "WebLocker dashboard client")]
struct Args {
    /// API base URL (overrides config.json)
    #[arg(long)]
    api_url: Option<String>,

    /// Storage root directory (defaults to ~/.weblock)
    #[arg(long)]
    storage_root: Option<PathBuf>,
}

fn init_logging() {
    let debug_enabled = env::var("WEBLOCK_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let args = Args::parse();

    let storage = match args.storage_root {
        Some(root) => StorageConfig::with_root(root),
        None => StorageConfig::default(),
    };
    let config = load_config(&storage);
    let api_url = args.api_url.unwrap_or(config.api_base_url);

    let client = match ApiClient::new(&api_url) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "Failed to build API client");
            std::process::exit(1);
        }
    };
    let store = KvStore::open(&storage);
    let (event_tx, mut event_rx) = events::channel();
    let mut app = App::new(client, store, event_tx);

    if app.restore().await {
        if let Some(user) = app.state.current_user.as_deref() {
            println!("Welcome back, {}.", user);
        }
        print_dashboard(&app);
    }
    println!("Type `help` for commands.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(event) => app.handle_event(event).await,
                    None => break,
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !run_command(&mut app, line.trim()).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!(error = %err, "Failed to read input");
                        break;
                    }
                }
            }
        }
    }
}

/// Executes one command line. Returns false when the loop should exit.
async fn run_command(app: &mut App, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };
    let args: Vec<&str> = parts.collect();

    match (command, args.as_slice()) {
        ("help", _) => print_help(),
        ("login", [username, password]) => {
            if app.login(username, password).await {
                println!("Signed in as {}.", username);
                print_dashboard(app);
            } else {
                print_field_error(app, fields::LOGIN);
            }
        }
        ("logout", _) => {
            app.logout();
            println!("Signed out.");
        }
        ("add", [url]) => {
            if app.add_website(url).await {
                print_dashboard(app);
            } else {
                print_field_error(app, fields::ADD_WEBSITE);
            }
        }
        ("lock", [host]) => stage(app, PendingAction::Lock(host.to_string())),
        ("unlock", [host]) => stage(app, PendingAction::Unlock(host.to_string())),
        ("remove", [host]) => stage(app, PendingAction::Remove(host.to_string())),
        ("confirm", [username, password]) => {
            if app.confirm_reauth(username, password).await {
                print_dashboard(app);
            } else {
                print_field_error(app, fields::AUTH);
            }
        }
        ("cancel", _) => {
            app.cancel_reauth();
            println!("Cancelled.");
        }
        ("list", _) => print_dashboard(app),
        ("log", _) => print_activity(app),
        ("clear-log", _) => {
            app.clear_activity();
            println!("Activity log cleared.");
        }
        ("quit" | "exit", _) => return false,
        _ => println!("Unknown command; type `help`."),
    }

    true
}

fn stage(app: &mut App, action: PendingAction) {
    app.request_privileged(action);
    println!("Re-authentication required: `confirm <admin-user> <admin-password>` or `cancel`.");
}

fn print_field_error(app: &App, field: &str) {
    if let Some(message) = app.state.error(field) {
        println!("! {}", message);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  login <username> <password>    sign in");
    println!("  logout                         sign out");
    println!("  add <url>                      protect a website");
    println!("  lock <host>                    lock a website (re-auth gated)");
    println!("  unlock <host>                  unlock for one hour (re-auth gated)");
    println!("  remove <host>                  remove a website (re-auth gated)");
    println!("  confirm <user> <password>      run the staged action");
    println!("  cancel                         discard the staged action");
    println!("  list                           show protected websites");
    println!("  log                            show the activity log");
    println!("  clear-log                      clear the activity log");
    println!("  quit                           exit");
}

fn print_dashboard(app: &App) {
    let stats = app.state.stats();
    println!(
        "{} protected, {} locked, {} unlocked",
        stats.total, stats.locked, stats.unlocked
    );

    let mut hosts: Vec<_> = app.state.websites.iter().collect();
    hosts.sort_by(|a, b| a.0.cmp(b.0));
    for (host, site) in hosts {
        if site.locked {
            println!("  {}  locked", host);
        } else if let Some(remaining) = app.timers.remaining(host) {
            println!("  {}  unlocked ({} left)", host, format_minutes(remaining));
        } else {
            println!("  {}  unlocked (window elapsed)", host);
        }
    }
}

fn print_activity(app: &App) {
    if app.activity.is_empty() {
        println!("No activity recorded yet.");
        return;
    }

    let now = chrono::Utc::now();
    for entry in app.activity.entries() {
        let details = if entry.details.is_empty() {
            String::new()
        } else {
            format!(" - {}", entry.details)
        };
        println!(
            "[{}] {}{} ({})",
            entry.status.as_str(),
            entry.action,
            details,
            format_relative(&entry.timestamp, now)
        );
    }
}
