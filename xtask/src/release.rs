//! Decisions of the publish step, kept apart from the commands that act on
//! them.

/// The version out of `cargo pkgid` output, which ends in either
/// `#0.3.0` or `#argbind@0.3.0` depending on the cargo release.
pub(crate) fn pkgid_version(pkgid: &str) -> Option<&str> {
    let (_, version) = pkgid.trim().rsplit_once(['#', '@'])?;
    if version.is_empty() {
        return None;
    }
    Some(version)
}

/// Releases happen from `master` only, once per version.
pub(crate) fn should_release(branch: &str, tags: &str, tag: &str) -> bool {
    branch.trim() == "master" && !tags.split_ascii_whitespace().any(|it| it == tag)
}

/// Where a freshly published crate stands, judged from what
/// `cargo install <crate> --version <v> --bin non-existing` prints.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Registry {
    /// The index has not caught up yet.
    Pending,
    /// Cargo found the version and started installing it.
    Available,
}

pub(crate) fn registry_state(install_stderr: &str) -> Option<Registry> {
    let not_found = install_stderr.contains("could not find ");
    let tried_installing = install_stderr.contains("Installing");
    match (not_found, tried_installing) {
        (true, false) => Some(Registry::Pending),
        (false, true) => Some(Registry::Available),
        _ => None,
    }
}
