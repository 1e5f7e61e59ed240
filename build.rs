// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=VISION_CALIB_VERSION");

    // Packaged builds pin the version from outside the git tree
    let version = std::env::var("VISION_CALIB_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version string from the closest `v*` tag.
///
/// `0.1.0` on an exact tag becomes `0.1.0-<hash>`, anything after a tag becomes
/// `0.1.0-dirty-<hash>`, and a checkout without tags falls back to the package version.
fn describe_version() -> String {
    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let Some(described) = git(&["describe", "--tags", "--match", "v*"]) else {
        return format!("{}-{}", env!("CARGO_PKG_VERSION"), hash);
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    match described.split_once('-') {
        Some((base, _)) => format!("{}-dirty-{}", base, hash),
        None => format!("{}-{}", described, hash),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
