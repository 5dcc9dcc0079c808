// Stamps the binary with a release label, e.g.
// VERSION=1.0.0-rc20261018 cargo build --release
// The label is logged at startup next to the crate version.

fn main() {
    let version = std::env::var("VERSION").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rerun-if-changed=src/build.rs");
    println!("cargo:rerun-if-env-changed=VERSION");
    println!("cargo:rustc-env=version={}", version);
}
