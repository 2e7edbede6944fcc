//! Build script for the MOSFET switch firmware.

fn main() {
    // Required for esp-idf-svc to find the IDF toolchain
    embuild::espidf::sysenv::output();

    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASS");
}
