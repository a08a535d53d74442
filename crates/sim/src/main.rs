//! Headless fight simulator.
//!
//! Loads the shipped content, pits two monster teams against each other and
//! prints every fight event on stdout as one JSON object per line. Logs go
//! to stderr and follow `RUST_LOG`.
//!
//! Environment:
//! - `SIM_RED`, `SIM_BLUE`: monster names (default `Gobball`, `Arachnee`)
//! - `SIM_GRADE`: grade of both monsters (default 1)
//! - `SIM_SEED`: random seed (default 42)
//! - `SIM_REALTIME`: keep the display delays of actions when set
//! - `CONTENT_DATA_DIR`: alternate content directory
//!
//! ```bash
//! RUST_LOG=fight=debug cargo run -p fight-sim
//! ```

use anyhow::{Context, Result, anyhow};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use fight_content::ContentFactory;
use fight_core::{Battlefield, CellId, FightEvent, FightType, FighterSpec};
use fight_runtime::{
    ContentOracles, Event, FightService, FightSetup, RuntimeConfig, TeamSetup, Topic,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    setup_logging();

    let seed = env_or("SIM_SEED", 42u64)?;
    let grade = env_or("SIM_GRADE", 1u8)?;
    let red = std::env::var("SIM_RED").unwrap_or_else(|_| "Gobball".into());
    let blue = std::env::var("SIM_BLUE").unwrap_or_else(|_| "Arachnee".into());

    let content = ContentFactory::default_paths()
        .load_all()
        .context("failed to load content")?;
    let mut fight_config = content.config.clone();
    if std::env::var_os("SIM_REALTIME").is_none() {
        fight_config.cast_duration_ms = 0;
        fight_config.move_step_duration_ms = 0;
    }
    let config = RuntimeConfig::from_env(fight_config)?;
    let oracles = ContentOracles::from_content(content, seed);

    let red = monster(&oracles, &red, grade)?;
    let blue = monster(&oracles, &blue, grade)?;
    let service = FightService::new(config, oracles);

    let mut receivers = service.event_bus().subscribe_multiple(&[
        Topic::Lifecycle,
        Topic::Turn,
        Topic::Action,
        Topic::Mutation,
    ]);
    let mut take = |topic: Topic| {
        receivers
            .remove(&topic)
            .ok_or_else(|| anyhow!("missing receiver for {topic:?}"))
    };
    let (mut lifecycle, mut turn, mut action, mut mutation) = (
        take(Topic::Lifecycle)?,
        take(Topic::Turn)?,
        take(Topic::Action)?,
        take(Topic::Mutation)?,
    );

    let handle = service
        .create_fight(FightSetup {
            kind: FightType::PvM,
            grid: Battlefield::open(15, 15),
            teams: vec![
                TeamSetup {
                    places: vec![CellId(16), CellId(18)],
                    fighters: vec![red],
                },
                TeamSetup {
                    places: vec![CellId(208), CellId(206)],
                    fighters: vec![blue],
                },
            ],
        })
        .await?;
    info!(fight = %handle.id(), seed, "simulation started");

    loop {
        let received = tokio::select! {
            event = lifecycle.recv() => event,
            event = turn.recv() => event,
            event = action.recv() => event,
            event = mutation.recv() => event,
        };
        let event = match received {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event stream lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        println!("{}", serde_json::to_string(&event)?);
        if is_final(&event) {
            // Mutations published before the end may still be queued.
            for receiver in [&mut turn, &mut action, &mut mutation] {
                while let Ok(event) = receiver.try_recv() {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            break;
        }
    }

    service.shutdown().await?;
    info!("simulation finished");
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid {key}: {value:?}")),
        Err(_) => Ok(default),
    }
}

fn monster(oracles: &ContentOracles, name: &str, grade: u8) -> Result<FighterSpec> {
    let template = oracles
        .monsters()
        .find_by_name(name)
        .with_context(|| format!("unknown monster {name:?}"))?;
    let level = template
        .grade(grade)
        .with_context(|| format!("{name} has no grade {grade}"))?;
    Ok(FighterSpec::monster(template.id, level))
}

fn is_final(event: &Event) -> bool {
    matches!(
        event.event,
        FightEvent::FightEnded { .. } | FightEvent::FightCancelled
    )
}
