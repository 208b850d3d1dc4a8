fn main() {
    println!("cargo:rerun-if-env-changed=GEOGUARD_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
