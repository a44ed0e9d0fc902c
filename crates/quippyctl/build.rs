// Build script for quippyctl - embeds version at compile time

fn main() {
    let version =
        std::env::var("QUIPPY_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=QUIPPY_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=QUIPPY_VERSION");
}
