/// Example: Cross-camera player identity reconciliation
///
/// Consumes two per-camera detection JSON files and two directories of
/// numbered frame images, tracks players in each camera, and writes the
/// per-camera track archives plus the camera-B to camera-A identity
/// mapping.
///
/// Usage:
///   cargo run --release --example map_cameras \
///       <detections_a.json> <frames_a_dir> <detections_b.json> <frames_b_dir> [output_dir]
use player_reid::{load_detections, reconcile, run_tracker, ImageSequence, TrackingConfig};
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 5 {
        eprintln!(
            "Usage: {} <detections_a.json> <frames_a_dir> <detections_b.json> <frames_b_dir> [output_dir]",
            args[0]
        );
        std::process::exit(1);
    }
    let output_dir = PathBuf::from(args.get(5).map(String::as_str).unwrap_or("output"));

    println!(
        "🎥 Cross-Camera Player Re-Identification v{}",
        player_reid::version()
    );
    println!("═══════════════════════════════════════════\n");

    let config = TrackingConfig::default();

    println!("📄 Loading detections...");
    let detections_a = load_detections(&args[1])?;
    let detections_b = load_detections(&args[3])?;
    println!(
        "✓ Camera A: {} frames, camera B: {} frames\n",
        detections_a.len(),
        detections_b.len()
    );

    println!("🛰  Tracking '{}' detections per camera...", config.target_label);
    let track_start = Instant::now();
    let archive_a = run_tracker(&detections_a, &config);
    let archive_b = run_tracker(&detections_b, &config);
    println!(
        "✓ {} camera-A identities, {} camera-B identities ({:.1}ms)\n",
        archive_a.identities().len(),
        archive_b.identities().len(),
        track_start.elapsed().as_secs_f32() * 1000.0
    );

    archive_a.save(output_dir.join("camera_a_tracks.json"))?;
    archive_b.save(output_dir.join("camera_b_tracks.json"))?;

    println!("🎨 Reconciling identities by appearance...");
    let reconcile_start = Instant::now();
    let mut frames_a = ImageSequence::new(&args[2]);
    let mut frames_b = ImageSequence::new(&args[4]);
    let mapping = reconcile(&archive_a, &mut frames_a, &archive_b, &mut frames_b)?;
    println!(
        "✓ Matched {} identity pairs ({:.1}ms)\n",
        mapping.len(),
        reconcile_start.elapsed().as_secs_f32() * 1000.0
    );

    if mapping.is_empty() {
        println!("ℹ️  No identities could be paired");
    } else {
        for (camera_b_id, camera_a_id) in mapping.iter() {
            println!("  camera B track {:>3} -> camera A track {:>3}", camera_b_id, camera_a_id);
        }
    }

    mapping.save(output_dir.join("identity_mapping.json"))?;
    println!("\n💾 Results written to {}", output_dir.display());

    Ok(())
}
