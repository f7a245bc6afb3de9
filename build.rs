fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    // Logged by the CLI at startup.
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%MZ");
    println!("cargo:rustc-env=BUILD_DATE={stamp}");
}
