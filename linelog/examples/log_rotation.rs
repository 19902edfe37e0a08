use std::path::PathBuf;

use linelog::Settings;

fn main() {
    let dir = PathBuf::from("/tmp/linelog_example_rotation");
    let _ = std::fs::remove_dir_all(&dir);

    let settings = Settings {
        path: dir.join("app.log"),
        max_size: 512,
        max_files: 3,
        color: "none".into(),
        ..Default::default()
    };
    let guard = linelog::initialize("rotation-demo", &settings, false).unwrap();

    for i in 0..50 {
        linelog::info!("Log message number {i}");
    }

    drop(guard);

    let mut files: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("app") && name.ends_with(".log"))
        .collect();
    files.sort();

    println!("\n--- Rotation Summary ---");
    println!("Log directory: {}", dir.display());
    println!("Files (live file + max_files=3 backups): {}", files.len());
    for f in &files {
        println!("  {f}");
    }
    assert!(files.len() <= 4, "at most 3 backups besides the live file");
}
