//! Walk a vehicle along a route and report corridor membership and
//! distances to a fixed point ahead.
//!
//! Run with: cargo run --example corridor_walk

use route_corridor::{geo_utils, route, Corridor, GeoPoint, HudConfig, RouteCorridors, PAST_ROUTE_END};

fn main() {
    let config = HudConfig::default();

    // An L-shaped route: north for ~450m, then east for ~400m (Turin area)
    let path = vec![
        GeoPoint::new(45.0700, 7.6800),
        GeoPoint::new(45.0720, 7.6800),
        GeoPoint::new(45.0740, 7.6800),
        GeoPoint::new(45.0740, 7.6825),
        GeoPoint::new(45.0740, 7.6850),
    ];

    println!("Route Corridor Walk\n");
    println!(
        "Route: {} points, {:.0}m, padding {}m\n",
        path.len(),
        geo_utils::polyline_length(&path),
        config.corridor_padding_meters
    );

    // One corridor per segment
    for (i, pair) in path.windows(2).enumerate() {
        let corridor = Corridor::around_segment(&pair[0], &pair[1], config.corridor_padding_meters);
        println!(
            "Segment {}: bearing {:.1}, {:.0}m",
            i,
            geo_utils::bearing(&pair[0], &pair[1]),
            geo_utils::haversine_distance(&pair[0], &pair[1])
        );
        for v in corridor.vertices() {
            println!("   ({:.6}, {:.6})", v.latitude, v.longitude);
        }
    }

    let corridors = RouteCorridors::build(path.clone(), config.corridor_padding_meters);
    let target = GeoPoint::new(45.0740, 7.6840);

    println!("\nTarget: ({:.4}, {:.4})\n", target.latitude, target.longitude);

    let fixes = [
        GeoPoint::new(45.0705, 7.6800),
        GeoPoint::new(45.0725, 7.6801),
        GeoPoint::new(45.0735, 7.6799),
        GeoPoint::new(45.0741, 7.6815),
        GeoPoint::new(45.0730, 7.6830), // cut the corner
    ];

    for fix in &fixes {
        let on_route = route::is_within_corridor(&path, fix, config.corridor_padding_meters);
        let ahead = corridors.distance_along(fix, &target);
        let from_start = corridors.distance_from_route_start(fix);

        let ahead_text = if ahead == PAST_ROUTE_END {
            "not ahead".to_string()
        } else {
            format!("{:.0}m", ahead)
        };

        println!(
            "Fix ({:.4}, {:.4}): on_route={}, to target={}, from start={:.0}m",
            fix.latitude, fix.longitude, on_route, ahead_text, from_start
        );
    }
}
