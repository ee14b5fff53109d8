//! Drive a HUD session with a canned conditions response.
//!
//! Run with: cargo run --example hud_session --features geojson

use route_corridor::{conditions, GeoPoint, HudSession, SessionAction};

const RESPONSE: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Route",
            "geometry": {
                "type": "LineString",
                "coordinates": [[7.68, 45.070], [7.68, 45.072], [7.68, 45.074], [7.68, 45.076], [7.68, 45.078]]
            }
        },
        {
            "type": "Feature",
            "id": "works-12",
            "geometry": {"type": "Point", "coordinates": [7.68, 45.0735]},
            "properties": {"condition": "construction"}
        },
        {
            "type": "Feature",
            "id": "closure-3",
            "geometry": {"type": "LineString", "coordinates": [[7.68, 45.0765], [7.68, 45.0775]]},
            "properties": {"condition": "closed"}
        }
    ]
}"#;

fn show(action: &SessionAction) {
    match action {
        SessionAction::Display(Some(notice)) => {
            println!("   HUD: {} [{} @ {:.0}m]", notice.message, notice.advisory_id, notice.distance_meters)
        }
        SessionAction::Display(None) => println!("   HUD: (clear)"),
        SessionAction::Fetch(req) => println!(
            "   Fetch conditions at ({:.4}, {:.4}) bearing {:.1}, {}m ahead",
            req.location.latitude, req.location.longitude, req.bearing_deg, req.lookahead_meters
        ),
        SessionAction::Wait => println!("   Waiting for outstanding fetch"),
    }
}

fn main() {
    let mut session = HudSession::default();

    println!("HUD Session\n");

    let first = GeoPoint::new(45.0701, 7.68).with_bearing(0.0);
    println!("Fix ({:.4}, {:.4})", first.latitude, first.longitude);
    let action = session.on_location(first);
    show(&action);

    // Second fix arrives before the fetch completes
    println!("Fix (45.0703, 7.6800)");
    show(&session.on_location(GeoPoint::new(45.0703, 7.68)));

    if let SessionAction::Fetch(req) = action {
        println!("Fetch completed");
        let result = conditions::decode(RESPONSE.as_bytes());
        show(&session.complete_fetch(&req.location, result));
    }

    for lat in [45.0710, 45.0725, 45.0740, 45.0760] {
        println!("Fix ({:.4}, 7.6800)", lat);
        show(&session.on_location(GeoPoint::new(lat, 7.68)));
    }
}
