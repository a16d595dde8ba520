use version_check::Channel;

fn main() {
    // Benchmarks in src/message.rs need the unstable `test` crate.
    if Channel::read().as_ref().map(Channel::is_nightly).unwrap_or(false) {
        println!("cargo:rustc-cfg=feature=\"nightly\"");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
