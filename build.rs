use std::process::Command;

fn main() {
    // DOTFILER_VERSION from the environment wins (release builds); local
    // builds fall back to git describe.
    if let Ok(version) = std::env::var("DOTFILER_VERSION") {
        println!("cargo:rustc-env=DOTFILER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=DOTFILER_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DOTFILER_VERSION");
}
