use std::env;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Compile-time inputs that cargo cannot see: askama pages and the
/// migrations embedded by `sqlx::migrate!`.
const WATCHED: &[(&str, &str)] = &[("templates", "html"), ("migrations", "sql")];

fn main() {
    for (dir, extension) in WATCHED {
        // The directory itself catches added or removed files.
        println!("cargo:rerun-if-changed={}", dir);
        watch_files(Path::new(dir), extension);
    }

    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rustc-env=CAMPUSCONNECT_BUILD_ID={}", build_id());
}

/// Reproducible builds pin the id through `SOURCE_DATE_EPOCH`.
fn build_id() -> String {
    if let Ok(epoch) = env::var("SOURCE_DATE_EPOCH") {
        return epoch;
    }
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs().to_string(),
        Err(_) => "dev".to_string(),
    }
}

fn watch_files(dir: &Path, extension: &str) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            watch_files(&path, extension);
        } else if path.extension().is_some_and(|ext| ext == extension) {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
