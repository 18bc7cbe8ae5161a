use std::env;

fn main() {
    let version = env::var("SCREEN_TRIAGE_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "0.0.0".to_string());
    println!("cargo:rerun-if-env-changed=SCREEN_TRIAGE_VERSION");
    println!("cargo:rustc-env=SCREEN_TRIAGE_VERSION={version}");
}
