fn main() {
    // Stamped into `paperbox --version`.
    let built = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=PAPERBOX_BUILD_DATE={}", built);
}
