use minesweeper_server::{build, config::Rules};
use tracing::{error, info};

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    info!("🚀 Starting Minesweeper board engine server");

    let rules = Rules::from_env().inspect_err(|e| error!("Invalid board rules: {}", e))?;
    info!(
        "📐 Boards from {} to {} cells per side, densities {}%/{}%/{}%, safe zone {:?}",
        rules.min_size,
        rules.max_size,
        rules.density.low,
        rules.density.middle,
        rules.density.high,
        rules.safe_zone
    );
    info!("📡 Endpoints: POST /games, GET|DELETE /games/<id>, POST /games/<id>/{{configure,sweep,flag,new}}");

    let _rocket = build(rules).launch().await?;
    Ok(())
}
