mod release;
#[cfg(test)]
mod tidy;

use std::{
    thread,
    time::{Duration, Instant},
};

use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    {
        let _s = section("BUILD");
        cmd!(sh, "cargo test --workspace --no-run").run()?;
    }

    {
        let _s = section("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
    }

    {
        let _s = section("DEMO");
        cmd!(sh, "cargo run --example twolevels -- --debug open -r maintenance front-door").run()?;
    }

    {
        let _s = section("PUBLISH");

        let pkgid = cmd!(sh, "cargo pkgid -p argbind").read()?;
        let version = release::pkgid_version(&pkgid).expect("no version in cargo pkgid output");
        let tag = format!("v{version}");

        let current_branch = cmd!(sh, "git branch --show-current").read()?;
        let tags = cmd!(sh, "git tag --list").read()?;
        if release::should_release(&current_branch, &tags, &tag) {
            cmd!(sh, "git tag {tag}").run()?;
            publish(&sh, "argbind-macros", version)?;
            cmd!(sh, "cargo publish -p argbind").run()?;
            cmd!(sh, "git push --tags").run()?;
        }
    }

    Ok(())
}

/// Publishes `krate` and waits until the registry serves it, so that crates
/// depending on it can be published next.
fn publish(sh: &Shell, krate: &str, version: &str) -> xshell::Result<()> {
    cmd!(sh, "cargo publish -p {krate}").run()?;
    for _ in 0..100 {
        thread::sleep(Duration::from_secs(3));
        let err_msg = cmd!(sh, "cargo install {krate} --version {version} --bin non-existing")
            .ignore_status()
            .read_stderr()?;
        match release::registry_state(&err_msg) {
            Some(release::Registry::Available) => break,
            Some(release::Registry::Pending) => continue,
            None => panic!("unexpected output from cargo install:\n{err_msg}"),
        }
    }
    Ok(())
}

fn section(name: &'static str) -> impl Drop {
    println!("::group::{name}");
    let start = Instant::now();
    defer(move || {
        let elapsed = start.elapsed();
        eprintln!("{name}: {elapsed:.2?}");
        println!("::endgroup::");
    })
}

fn defer<F: FnOnce()>(f: F) -> impl Drop {
    struct D<F: FnOnce()>(Option<F>);
    impl<F: FnOnce()> Drop for D<F> {
        fn drop(&mut self) {
            if let Some(f) = self.0.take() {
                f()
            }
        }
    }
    D(Some(f))
}
