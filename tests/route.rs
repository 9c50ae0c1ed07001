//! End-to-end tests for routes read from GPX documents.

use route_stats::geo_utils::distance_3d;
use route_stats::{GpsError, IngestConfig, Position, RawFix, Route, Waypoints};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

const HILL_ROUTE: &str = r#"<?xml version="1.0"?>
<gpx version="1.1" creator="route-stats tests">
  <rte>
    <name>Hill Loop</name>
    <rtept lat="53.3700" lon="-1.8200"><ele>250</ele><name>Car Park</name></rtept>
    <rtept lat="53.3700" lon="-1.8200001"><ele>251</ele><name>Jitter</name></rtept>
    <rtept lat="53.3750" lon="-1.8150"><ele>320</ele><name>Stile</name></rtept>
    <rtept lat="53.3800" lon="-1.8100"><ele>410</ele><name>Trig Point</name></rtept>
    <rtept lat="53.3760" lon="-1.8050"><ele>330</ele></rtept>
    <rtept lat="53.3750" lon="-1.8150"><ele>320</ele><name>Stile</name></rtept>
    <rtept lat="53.37000001" lon="-1.8200"><ele>250</ele><name>Car Park</name></rtept>
  </rte>
</gpx>"#;

fn hill_route() -> Route {
    Route::from_gpx_str(HILL_ROUTE, IngestConfig::new(10.0).unwrap()).unwrap()
}

#[test]
fn test_jitter_merged_into_previous_waypoint() {
    let route = hill_route();
    assert_eq!(route.num_positions(), 6);
    assert_eq!(route.report().discarded(), 1);
    assert_eq!(route.names()[1], "Stile");
    assert!(route.find_position("Jitter").is_err());
}

#[test]
fn test_length_properties() {
    let route = hill_route();
    let total = route.total_length();
    let net = route.net_length().unwrap();
    assert!(total >= net);
    assert!(net >= 0.0);
    // back at the car park
    assert_eq!(net, 0.0);
}

#[test]
fn test_height_properties() {
    let route = hill_route();
    let total = route.total_height_gain().unwrap();
    let net = route.net_height_gain().unwrap();
    assert_eq!(total, 70.0 + 90.0);
    assert_eq!(net, 0.0);
    assert!(total >= net && net >= 0.0);
}

#[test]
fn test_cumulative_length_round_trip() {
    let route = hill_route();
    let recomputed: f64 = route
        .positions()
        .windows(2)
        .map(|w| distance_3d(&w[0], &w[1]))
        .sum();
    assert!(approx_eq(route.total_length(), recomputed, 1e-6));
}

#[test]
fn test_extrema() {
    let route = hill_route();
    assert_eq!(route.min_latitude().unwrap(), 53.3700);
    assert_eq!(route.max_latitude().unwrap(), 53.3800);
    assert_eq!(route.min_longitude().unwrap(), -1.8200);
    assert_eq!(route.max_longitude().unwrap(), -1.8050);
    assert_eq!(route.min_elevation().unwrap(), 250.0);
    assert_eq!(route.max_elevation().unwrap(), 410.0);
}

#[test]
fn test_gradients() {
    let route = hill_route();
    let max = route.max_gradient().unwrap();
    let min = route.min_gradient().unwrap();
    let steepest = route.steepest_gradient().unwrap();
    assert!(max > 0.0);
    assert!(min < 0.0);
    assert_eq!(steepest, max.abs().max(min.abs()));
}

#[test]
fn test_lookups() {
    let route = hill_route();
    let trig = Position::with_elevation(53.38, -1.81, 410.0);
    assert_eq!(route.find_position("Trig Point").unwrap(), trig);
    assert_eq!(route.find_name_of(&Position::new(53.38, -1.81)).unwrap(), "Trig Point");
    assert_eq!(route.times_visited_named("Car Park"), 2);
    assert_eq!(route.times_visited_named("Stile"), 2);
    assert_eq!(route.times_visited_named("Trig Point"), 1);
    assert_eq!(route.times_visited(&Position::new(0.0, 0.0)), 0);
}

#[test]
fn test_nonexistent_name() {
    let route = hill_route();
    assert!(matches!(route.find_position("Nonexistent"), Err(GpsError::NameNotFound(_))));
    assert_eq!(route.times_visited_named("Nonexistent"), 0);
}

#[test]
fn test_three_points_without_elevation() {
    let source = r#"<gpx><rte>
        <rtept lat="10.0" lon="10.0"/>
        <rtept lat="10.1" lon="10.0"/>
        <rtept lat="10.2" lon="10.0"/>
    </rte></gpx>"#;
    let route = Route::from_gpx_str(source, IngestConfig::default()).unwrap();
    assert_eq!(route.num_positions(), 3);
    assert_eq!(route.total_height_gain().unwrap(), 0.0);
    assert_eq!(route.net_height_gain().unwrap(), 0.0);
}

#[test]
fn test_single_position_route() {
    let route = Route::from_fixes(
        Some("Dot".into()),
        vec![RawFix::new(Position::with_elevation(1.0, 2.0, 3.0))],
        IngestConfig::default(),
    )
    .unwrap();
    assert_eq!(route.total_length(), 0.0);
    assert_eq!(route.net_length().unwrap(), 0.0);
    assert_eq!(route.min_gradient().unwrap(), 0.0);
    assert_eq!(route.max_gradient().unwrap(), 0.0);
    assert_eq!(route.steepest_gradient().unwrap(), 0.0);
}

#[test]
fn test_structural_errors_abort() {
    let missing_route = "<gpx><metadata/></gpx>";
    assert!(matches!(
        Route::from_gpx_str(missing_route, IngestConfig::default()),
        Err(GpsError::MissingElement("rte"))
    ));

    let missing_lon = r#"<gpx><rte><rtept lat="1" lon="1"/><rtept lat="2"/></rte></gpx>"#;
    let err = Route::from_gpx_str(missing_lon, IngestConfig::default()).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("route-stats-{}-hill.gpx", std::process::id()));
    std::fs::write(&path, HILL_ROUTE).unwrap();

    let route = Route::from_file(&path, IngestConfig::new(10.0).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(route.name(), "Hill Loop");
    assert!(route.build_report().starts_with("Source file '"));
}

#[test]
fn test_missing_file() {
    let err = Route::from_file("/no/such/route.gpx", IngestConfig::default()).unwrap_err();
    assert!(matches!(err, GpsError::Io { .. }));
}

#[test]
fn test_granularity_fixed_at_construction() {
    let coarse = Route::from_gpx_str(HILL_ROUTE, IngestConfig::new(10.0).unwrap()).unwrap();
    let fine = Route::from_gpx_str(HILL_ROUTE, IngestConfig::new(0.0).unwrap()).unwrap();
    assert_eq!(coarse.granularity(), 10.0);
    assert_eq!(fine.granularity(), 0.0);
    assert_eq!(fine.num_positions(), 7);
}

#[test]
fn test_concurrent_reads() {
    let route = hill_route();
    let expected = route.total_length();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert_eq!(route.total_length(), expected);
                assert_eq!(route.times_visited_named("Car Park"), 2);
            });
        }
    });
}
