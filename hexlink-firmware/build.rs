//! Build script for hexlink-firmware
//!
//! - Sets up linker search paths and arguments for memory.x
//! - Validates node.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use hexlink_core::config::{parse_config, NodeConfig};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate node.toml with the full TOML parser and the firmware's reader
fn validate_config() {
    println!("cargo:rerun-if-changed=node.toml");

    let config_path = Path::new("node.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail(&format!("cannot read node.toml: {}", e)),
    };

    let config: NodeConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail(&format!("invalid node.toml: {}", e)),
    };

    if let Err(e) = config.validate() {
        fail(&format!("node.toml rejected: {:?}", e));
    }

    // The firmware reads the file with a small subset parser at boot;
    // both readers must agree or the board would silently run defaults.
    match parse_config(&content) {
        Ok(runtime) if runtime == config => {}
        Ok(runtime) => fail(&format!(
            "node.toml is read differently at runtime: {:?} vs {:?}",
            runtime, config
        )),
        Err(e) => fail(&format!("node.toml uses unsupported TOML: {:?}", e)),
    }
}

fn fail(message: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: node.toml                                                ║\n\
        ╚══════════════════════════════════════════════════════════════════╝\n\
        {}\n",
        message
    );
}
