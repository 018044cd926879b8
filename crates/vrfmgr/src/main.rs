//! getvrflist - print VRF name to ID mappings
//!
//! With no subcommand prints one `<name> <id>` line per configured VRF.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sonic_vrfmgr::config::VRFMGR_CONF;
use sonic_vrfmgr::{TableId, VrfId, VrfMgr, VrfMgrConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "getvrflist")]
#[command(about = "Resolve VRF names, IDs and kernel tables", long_about = None)]
struct Args {
    /// Configuration file
    #[arg(long, default_value = VRFMGR_CONF)]
    config: PathBuf,

    /// Route domain mapping file (overrides the configuration file)
    #[arg(long)]
    route_domain_conf: Option<PathBuf>,

    /// Network class directory (overrides the configuration file)
    #[arg(long)]
    net_class_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every VRF name to ID mapping
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the ID of a VRF
    Id { name: String },
    /// Print the name of a VRF
    Name { id: u32 },
    /// Print the kernel table backing a VRF's PBR table
    Table { name: String, pbr_tid: u32 },
    /// Print configured VRFs with their bound devices
    Vrfs {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("getvrflist: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when the requested VRF or table was not found.
fn run(args: Args) -> anyhow::Result<bool> {
    let mut config = VrfMgrConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(path) = args.route_domain_conf {
        config.route_domain_conf = path;
    }
    if let Some(path) = args.net_class_dir {
        config.net_class_dir = path;
    }
    debug!(?config, "Resolved configuration");

    let mgr = VrfMgr::from_config(&config);

    match args.command.unwrap_or(Command::List { json: false }) {
        Command::List { json } => {
            let list = mgr.get_vrf_list();
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for map in &list {
                    println!("{} {}", map.vrf_name, map.vrf_id);
                }
            }
            Ok(true)
        }
        Command::Id { name } => {
            let id = mgr.get_vrf_id(name.as_str());
            if id == VrfId::INVALID {
                return Ok(false);
            }
            println!("{}", id);
            Ok(true)
        }
        Command::Name { id } => match mgr.get_vrf_name(VrfId::new(id)) {
            Some(name) => {
                println!("{}", name);
                Ok(true)
            }
            None => Ok(false),
        },
        Command::Table { name, pbr_tid } => {
            let tid = mgr.get_vrf_kernel_table_id(name.as_str(), TableId::new(pbr_tid));
            if tid.is_unspec() {
                return Ok(false);
            }
            println!("{}", tid);
            Ok(true)
        }
        Command::Vrfs { json } => {
            let vrfs = mgr.get_vrfs().context("reading VRF inventory")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&vrfs)?);
            } else {
                for vrf in &vrfs {
                    let interfaces: Vec<&str> =
                        vrf.interfaces().iter().map(String::as_str).collect();
                    println!("{} {} {}", vrf.name(), vrf.id(), interfaces.join(","));
                }
            }
            Ok(true)
        }
    }
}
