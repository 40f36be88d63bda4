use std::env::consts::{ARCH, OS};
use std::process::Command;

fn main() -> anyhow::Result<()> {
    // Build a version string to use in the user-agent and `--version` flag for the CLI.
    #[cfg(debug_assertions)]
    const BUILD_TYPE: &str = "debug";
    #[cfg(not(debug_assertions))]
    const BUILD_TYPE: &str = "release";

    // Source tarballs have no git metadata.
    let git = match (get_branch_name(), get_commit_hash()) {
        (Some(branch), Some(hash)) => {
            let dirty = if is_working_tree_clean() { "" } else { "+" };
            format!("{branch}:{hash}{dirty}, ")
        }
        _ => String::new(),
    };

    let version_string = format!(
        "{} ({}{}, {}/{})",
        env!("CARGO_PKG_VERSION"),
        git,
        BUILD_TYPE,
        OS,
        ARCH
    );

    println!("cargo:rustc-env=SEDBUILDER_VERSION={}", version_string);
    Ok(())
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let s = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
    (!s.is_empty()).then_some(s)
}

fn get_commit_hash() -> Option<String> {
    git(&["log", "-1", "--pretty=format:%h"])
}

fn get_branch_name() -> Option<String> {
    git(&["rev-parse", "--abbrev-ref", "HEAD"])
}

fn is_working_tree_clean() -> bool {
    Command::new("git")
        .args(["diff", "--quiet", "--exit-code"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .status()
        .is_ok_and(|s| s.success())
}
