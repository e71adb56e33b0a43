use centroidtrack::{BoundingBox, CentroidTracker};

fn print_tracks(label: &str, tracker: &CentroidTracker) {
    println!("{}: {} live tracks", label, tracker.num_tracks());
    for (track_id, centroid) in tracker.objects() {
        println!("  Track ID {}: {}", track_id, centroid);
    }
}

fn main() {
    println!("Tracking boxes across a short synthetic sequence...");

    let mut tracker = CentroidTracker::new(2);

    // Frame 1: two players enter
    let detections1 = vec![
        BoundingBox::new(10.0, 10.0, 50.0, 50.0),
        BoundingBox::new(100.0, 100.0, 150.0, 150.0),
    ];
    tracker.update(&detections1);
    print_tracks("Frame 1", &tracker);

    // Frame 2: both move slightly, identities follow
    let detections2 = vec![
        BoundingBox::new(103.0, 98.0, 153.0, 148.0),
        BoundingBox::new(12.0, 12.0, 52.0, 52.0),
    ];
    tracker.update(&detections2);
    print_tracks("Frame 2 (both moved)", &tracker);

    // Frame 3: second player occluded, a third one appears
    let detections3 = vec![
        BoundingBox::new(14.0, 14.0, 54.0, 54.0),
        BoundingBox::new(300.0, 300.0, 340.0, 340.0),
    ];
    tracker.update(&detections3);
    print_tracks("Frame 3 (one occluded, one new)", &tracker);

    // Frames 4-6: the occluded player never comes back and gets dropped
    for frame in 4..=6 {
        tracker.update(&[]);
        print_tracks(&format!("Frame {} (no detections)", frame), &tracker);
    }
}
