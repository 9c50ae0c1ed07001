//! Summarise a GPX track, or a built-in sample when no path is given.
//!
//! Run with: cargo run --example track_summary -- [path/to/track.gpx] [granularity_m]

use route_stats::{IngestConfig, Track, Waypoints};

const SAMPLE: &str = r#"<gpx><trk><name>Sample Hill Walk</name><trkseg>
  <trkpt lat="53.3700" lon="-1.8200"><ele>250</ele><name>Car Park</name><time>0</time></trkpt>
  <trkpt lat="53.37001" lon="-1.8200"><ele>250</ele><time>120</time></trkpt>
  <trkpt lat="53.3750" lon="-1.8150"><ele>320</ele><time>600</time></trkpt>
  <trkpt lat="53.3800" lon="-1.8100"><ele>410</ele><name>Trig Point</name><time>1500</time></trkpt>
  <trkpt lat="53.38001" lon="-1.8100"><ele>410</ele><time>1800</time></trkpt>
  <trkpt lat="53.3700" lon="-1.8200"><ele>250</ele><time>3300</time></trkpt>
</trkseg></trk></gpx>"#;

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next();
    let granularity = args.next().and_then(|g| g.parse().ok()).unwrap_or(5.0);

    let config = match IngestConfig::new(granularity) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let track = match &path {
        Some(path) => Track::from_file(path, config),
        None => Track::from_gpx_str(SAMPLE, config),
    };
    let track = match track {
        Ok(track) => track,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("{}", track.build_report());

    match track.summary() {
        Ok(summary) => {
            println!("Track: {}", summary.route.name);
            println!("  positions:        {}", summary.route.num_positions);
            println!("  total length:     {:.0}m", summary.route.total_length);
            println!("  net length:       {:.0}m", summary.route.net_length);
            println!(
                "  height gain:      {:.0}m (net {:.0}m)",
                summary.route.total_height_gain, summary.route.net_height_gain
            );
            println!("  steepest:         {:.1} degrees", summary.route.steepest_gradient);
            println!(
                "  time:             {}s ({}s resting, {}s travelling)",
                summary.total_time, summary.resting_time, summary.travelling_time
            );
            println!(
                "  average speed:    {:.2}m/s ({:.2}m/s moving)",
                summary.average_speed, summary.average_moving_speed
            );
            match summary.max_speed {
                Some(speed) => println!("  max speed:        {:.2}m/s", speed),
                None => println!("  max speed:        undefined (zero-time segment)"),
            }
        }
        Err(e) => println!("No statistics: {e}"),
    }

    if let Ok(summit) = track.find_position("Trig Point") {
        let visits = track.times_visited(&summit);
        println!("  Trig Point visited {} time(s) at {}", visits, summit);
    }
}
