use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::db;

/// Required directories that will be created if missing
const REQUIRED_DIRS: &[&str] = &[
    "website",
    "website/db",
    "website/static",
    "website/static/css",
    "website/static/js",
    "website/templates",
];

/// Critical template files; the server cannot run without these
const CRITICAL_TEMPLATES: &[&str] = &[
    "website/templates/index.html.tera",
    "website/templates/setup.html.tera",
];

/// Static assets the generator page loads
const CRITICAL_STATIC: &[&str] = &[
    "website/static/css/app.css",
    "website/static/js/app.js",
];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing files, and
/// aborts if critical dependencies are absent.
pub fn run() {
    info!("glowcopy boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Critical templates ──────────────────────────
    for file in CRITICAL_TEMPLATES {
        if !Path::new(file).exists() {
            error!("  MISSING critical template: {}", file);
            errors += 1;
        }
    }

    // ── 3. Static assets ───────────────────────────────
    for file in CRITICAL_STATIC {
        if !Path::new(file).exists() {
            warn!("  Missing static asset: {} (generator page will not work fully)", file);
            warnings += 1;
        }
    }

    // ── 4. Database directory writable ──────────────────
    let db_path = db::db_path();
    let db_dir = Path::new(&db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !db_dir.exists() {
        if let Err(e) = fs::create_dir_all(db_dir) {
            error!("  FAILED to create database directory {}: {}", db_dir.display(), e);
            errors += 1;
        }
    }
    if db_dir.exists() {
        let test_file = db_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 5. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
