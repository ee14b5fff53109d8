//! Fetch live conditions ahead of a location.
//!
//! Run with: MOGOLINC_API_KEY=... cargo run --example fetch_conditions --features http

use route_corridor::{ClientConfig, ConditionsClient, GeoPoint, HudConfig, HudSession};
use std::time::Instant;

#[tokio::main]
async fn main() {
    let api_key = std::env::var("MOGOLINC_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        eprintln!("Set MOGOLINC_API_KEY to run this example");
        return;
    }

    let client = match ConditionsClient::new(ClientConfig { api_key, ..Default::default() }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    let config = HudConfig::default();
    let location = GeoPoint::new(45.0700, 7.6800).with_bearing(0.0);

    println!("GET {}", client.request_url(&location, config.lookahead_meters));

    let start = Instant::now();
    let result = client.fetch(&location, config.lookahead_meters).await;
    println!("Completed in {:?}\n", start.elapsed());

    let mut session = HudSession::new(config);
    session.on_location(location);

    match session.complete_fetch(&location, result) {
        route_corridor::SessionAction::Display(notice) => {
            let route_points = session.route().map_or(0, |r| r.path().len());
            println!("Route points: {}", route_points);
            println!("Advisories: {}", session.advisories().len());
            match notice {
                Some(n) => println!("Nearest ahead: {} ({:.0}m)", n.message, n.distance_meters),
                None => println!("Nothing ahead"),
            }
        }
        _ => println!("Fetch failed, see log output"),
    }
}
