//! Management CLI for the reverse-proxy configuration tree.
//!
//! Each subcommand maps 1:1 onto one facade operation: one fetch of the
//! relevant subtree, one in-memory mutation, one write back.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caddyctl::manager::{CaddyManager, SetupOptions};
use caddyctl::settings::{self, Settings};
use caddyctl::validate;

#[derive(Parser)]
#[command(name = "caddyctl")]
#[command(about = "Management CLI for the Caddy admin configuration tree", long_about = None)]
struct Cli {
    /// Admin endpoint URL (falls back to CADDY_ADMIN_URL, then localhost)
    #[arg(short, long)]
    url: Option<String>,

    /// HTTP server name inside the configuration tree
    #[arg(short, long, default_value = settings::DEFAULT_SERVER_NAME)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap TLS automation, PKI trust, and the HTTP server
    Setup {
        /// Cloudflare API token for the ACME DNS challenge
        #[arg(long)]
        cf_token: Option<String>,

        /// Use the internal issuer (local development)
        #[arg(long)]
        local: bool,

        /// Install the local CA root into the system trust store
        #[arg(long)]
        install_trust: Option<bool>,
    },
    /// Add a reverse proxy for a hostname
    AddProxy {
        /// Hostname to expose
        #[arg(long)]
        from: String,

        /// Upstream target to dial (host:port)
        #[arg(long)]
        to: String,
    },
    /// Delete a route by identifier
    DelProxy {
        /// Route identifier
        #[arg(long)]
        id: String,
    },
    /// Add a wildcard certificate domain
    AddWildcard {
        /// Domain to enable *.<domain> for
        #[arg(long)]
        domain: String,
    },
    /// Add a sub-domain proxy under a wildcard domain
    AddSubProxy {
        #[arg(long)]
        domain: String,

        #[arg(long)]
        subdomain: String,

        /// Comma-separated upstream ports
        #[arg(long)]
        ports: String,

        /// Upstream host
        #[arg(long, default_value = "localhost")]
        host: String,
    },
    /// Show which configuration subtrees are present
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caddyctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::default();
    if let Some(url) = cli.url {
        settings.admin_url = url;
    }
    settings.server_name = cli.server;
    let manager = CaddyManager::new(settings);

    match cli.command {
        Commands::Setup { cf_token, local, install_trust } => {
            let opts = SetupOptions { cf_token, local, install_trust };
            manager.setup(&opts).await?;
            println!("setup complete");
        }
        Commands::AddProxy { from, to } => {
            manager.add_reverse_proxy(&from, &to).await?;
            println!("added {from} -> {to}");
        }
        Commands::DelProxy { id } => {
            if manager.delete_route(&id).await? {
                println!("deleted {id}");
            } else {
                eprintln!("route '{id}' not found");
                std::process::exit(1);
            }
        }
        Commands::AddWildcard { domain } => {
            manager.add_wildcard_route(&domain).await?;
            println!("added wildcard *.{domain}");
        }
        Commands::AddSubProxy { domain, subdomain, ports, host } => {
            let ports = validate::ports(&ports)
                .map_err(|bad| format!("invalid port number: '{bad}'"))?;
            manager.add_sub_reverse_proxy(&domain, &subdomain, &ports, &host).await?;
            println!("added {subdomain}.{domain} -> {host}:{}", ports.join(","));
        }
        Commands::Status => {
            let status = manager.status().await?;
            println!("configuration status:");
            println!("  {} http servers", mark(status.http_servers));
            println!("  {} tls automation", mark(status.tls_automation));
            println!("  {} pki", mark(status.pki));
        }
    }

    Ok(())
}

fn mark(present: bool) -> &'static str {
    if present {
        "✓"
    } else {
        "✗"
    }
}
