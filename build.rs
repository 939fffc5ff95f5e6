use chrono::Utc;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

const FALLBACK_CONFIG_DIR: &str = "Signalrank";

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or_else(|| missing_var("OUT_DIR"))?);
    let manifest_dir =
        PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").ok_or_else(|| missing_var("CARGO_MANIFEST_DIR"))?);

    let manifest = fs::read_to_string(manifest_dir.join("Cargo.toml"))?;
    let contents = format!(
        "pub const CONFIG_DIR_NAME: &str = {:?};\npub const BUILD_TIME: &str = {:?};\npub const GIT_HASH: &str = {:?};\n",
        config_dir_name(&manifest),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        git_hash(&manifest_dir).unwrap_or_else(|| "unknown".to_string()),
    );

    write_if_changed(&out_dir.join("version.rs"), &contents)
}

fn missing_var(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not set by cargo", name))
}

/// `[package.metadata] config_dir_name`, falling back to the product name
fn config_dir_name(manifest: &str) -> String {
    manifest
        .parse::<toml::Table>()
        .ok()
        .and_then(|table| {
            table
                .get("package")?
                .get("metadata")?
                .get("config_dir_name")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_CONFIG_DIR.to_string())
}

fn git_hash(repo_dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string())
}

// Leave the file alone when only the timestamp would differ
fn write_if_changed(path: &Path, contents: &str) -> io::Result<()> {
    if let Ok(existing) = fs::read_to_string(path) {
        let strip = |text: &str| {
            text.lines()
                .filter(|line| !line.contains("BUILD_TIME"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        if strip(&existing) == strip(contents) {
            return Ok(());
        }
    }
    fs::write(path, contents)
}
