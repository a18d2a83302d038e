const VERSION_ENV: &str = "GALLERY_BUILD_VERSION";

fn main() {
    println!("cargo:rerun-if-env-changed={VERSION_ENV}");
    println!("cargo:rerun-if-changed=VERSION");

    let version = from_env()
        .or_else(from_version_file)
        .or_else(from_git)
        .unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());

    println!("cargo:rustc-env={VERSION_ENV}={version}");
}

/// Explicit override, e.g. from a packaging script
fn from_env() -> Option<String> {
    std::env::var(VERSION_ENV).ok().filter(|v| !v.is_empty())
}

/// A `VERSION` file next to Cargo.toml wins over git describe
fn from_version_file() -> Option<String> {
    let content = std::fs::read_to_string("VERSION").ok()?;
    normalize(&content)
}

fn from_git() -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    // Rerun when git state changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
    println!("cargo:rerun-if-changed=.git/packed-refs");

    normalize(&String::from_utf8_lossy(&output.stdout))
}

/// Strip whitespace and a leading 'v' ("v0.3.1" -> "0.3.1")
fn normalize(raw: &str) -> Option<String> {
    let v = raw.trim();
    let v = v.strip_prefix('v').unwrap_or(v);
    (!v.is_empty()).then(|| v.to_string())
}
