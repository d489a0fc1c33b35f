use std::{fs, path::Path};

fn project_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap()
}

fn package_version(manifest: &str) -> &str {
    manifest
        .lines()
        .find_map(|it| it.strip_prefix("version = \""))
        .and_then(|it| it.split('"').next())
        .unwrap()
}

#[test]
fn versions_agree() {
    let root = project_root();
    let main = fs::read_to_string(root.join("Cargo.toml")).unwrap();
    let macros = fs::read_to_string(root.join("argbind-macros/Cargo.toml")).unwrap();

    let version = package_version(&main);
    assert_eq!(version, package_version(&macros), "argbind-macros version");
    let pinned = format!("version = \"={version}\"");
    assert!(
        main.lines().any(|it| it.starts_with("argbind-macros") && it.contains(&pinned)),
        "argbind-macros dependency should be pinned to ={version}"
    );
}

#[test]
fn no_stray_whitespace() {
    let root = project_root();
    let mut stack = vec![root.join("src"), root.join("argbind-macros/src"), root.join("tests")];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if path.extension().map_or(true, |it| it != "rs") {
                continue;
            }
            let text = fs::read_to_string(&path).unwrap();
            for (i, line) in text.lines().enumerate() {
                assert!(
                    !line.ends_with(' ') && !line.contains('\t'),
                    "{}:{}: trailing space or tab",
                    path.display(),
                    i + 1
                );
            }
        }
    }
}
