// Injects BNRA_VERSION from `git describe`, falling back to the package version
// when git or tags are unavailable (e.g. building from a crates.io tarball).

use std::process::Command;

fn main() {
    let version = describe_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=BNRA_VERSION={}", version);
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/tags");
}

/// Release tags look like `v0.3.0`; anything past the tag (commit count,
/// hash, dirty marker) is kept as build metadata.
fn describe_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();

    match described.strip_prefix('v') {
        Some(tagged) => match tagged.split_once('-') {
            Some((release, build)) => Some(format!("{}+{}", release, build)),
            None => Some(tagged.to_string()),
        },
        None => Some(format!("{}+{}", env!("CARGO_PKG_VERSION"), described)),
    }
}
