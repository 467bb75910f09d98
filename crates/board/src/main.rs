//! Assignment Board - command-line front end for room assignment.

use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use board_lib::clients::RoomClient;
use board_lib::config::BoardConfig;
use board_lib::{
    project, room_options, AssignmentStore, BoardView, DragController, Filter, Fullness,
    MoveOutcome, RoleFilter, TracingNotifier,
};
use domain::{Container, FillLevel};

#[derive(Parser)]
#[command(name = "board")]
#[command(about = "Room assignment board")]
struct Cli {
    /// Room service base URL
    #[arg(long, env = "BOARD_SERVER_URL", global = true)]
    server: Option<String>,

    /// Force debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the board
    Show {
        /// Case-insensitive search on name or email
        #[arg(long, default_value = "")]
        query: String,
        /// ALL, ADMIN, WORKER or CLIENT
        #[arg(long, default_value = "all")]
        role: RoleFilter,
        /// all, available or full
        #[arg(long, default_value = "all")]
        rooms: Fullness,
    },
    /// Move one occupant to a room id or `unassigned`
    Move { occupant: Uuid, target: Container },
    /// List room choices for one occupant
    Options { occupant: Uuid },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = BoardConfig::from_env();
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    tracing::debug!(?config, "Board configuration");

    let gateway = Arc::new(RoomClient::new(&config)?);
    let store = Arc::new(Mutex::new(AssignmentStore::new()));
    let controller = DragController::new(gateway, Arc::new(TracingNotifier), store);
    controller.load().await?;

    match cli.command {
        Commands::Show { query, role, rooms } => {
            let filter = Filter {
                query,
                role,
                fullness: rooms,
            };
            controller.read(|store| render(&project(store, &filter)));
        }
        Commands::Move { occupant, target } => match controller.drag_end(occupant, target).await {
            MoveOutcome::Confirmed(assigned) => {
                println!(
                    "{} -> {}",
                    assigned.occupant.display_name(),
                    assigned.room_name.as_deref().unwrap_or("unassigned")
                );
            }
            MoveOutcome::RolledBack(err) => return Err(err.into()),
            other => println!("{:?}", other),
        },
        Commands::Options { occupant } => controller.read(|store| {
            for option in room_options(store, occupant) {
                let mut flags = Vec::new();
                if option.is_current {
                    flags.push("ASSIGNED");
                }
                if option.occupancy.is_full() {
                    flags.push("FULL");
                }
                let marker = if option.selectable { " " } else { "x" };
                println!(
                    "[{}] {} {} ({}) {}",
                    marker,
                    option.room.id,
                    option.room.name,
                    option.occupancy,
                    flags.join(" ")
                );
            }
        }),
    }

    Ok(())
}

fn render(view: &BoardView<'_>) {
    for room in &view.rooms {
        let badge = match room.fill_level {
            FillLevel::Open => "",
            FillLevel::NearlyFull => " nearly full",
            FillLevel::Full => " FULL",
        };
        println!("{} ({}){}", room.room.name, room.occupancy, badge);
        for occupant in &room.occupants {
            println!("  - {} <{}> {}", occupant.display_name(), occupant.email, occupant.role);
        }
    }
    if view.no_rooms_match {
        println!("No rooms match the selected filter");
    }
    println!("Unassigned ({})", view.unassigned.len());
    for occupant in &view.unassigned {
        println!("  - {} <{}> {}", occupant.display_name(), occupant.email, occupant.role);
    }
}
