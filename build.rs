//! Build script: embeds the crate version (from env or git describe).

use std::process::Command;

fn main() {
    // Prefer PRETTY_LOGGER_VERSION env var if set (e.g., by CI release workflow),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("PRETTY_LOGGER_VERSION") {
        println!("cargo:rustc-env=PRETTY_LOGGER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=PRETTY_LOGGER_VERSION={version}");
    }

    // Re-run if git HEAD or the version variable changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=PRETTY_LOGGER_VERSION");
}
