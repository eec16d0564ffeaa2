//! Theme harvesting against a fake installation and the bundled library crate.

mod common;

use common::{Project, THEMES};
use std::path::Path;
use video_downloader::bundler::{
    DataKind, StaticResolver, ThemeLibrary, harvest_theme_resources,
};

#[test]
fn harvests_each_theme_once_and_nothing_else() {
    let project = Project::new();
    let resolver = StaticResolver::new().with("qt_material", project.library_root());

    let files = harvest_theme_resources(&resolver, &ThemeLibrary::default()).unwrap();
    let mut expected: Vec<String> = THEMES.iter().map(|n| format!("qt_material/{n}")).collect();
    expected.sort();
    let destinations: Vec<&str> = files.iter().map(|f| f.destination.as_str()).collect();
    assert_eq!(destinations, expected);
    assert!(files.iter().all(|f| f.kind == DataKind::Data && f.source.is_absolute()));
}

#[test]
fn harvest_is_deterministic() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("crates/qt_material");
    let resolver = StaticResolver::new().with("qt_material", &root);
    let library = ThemeLibrary::default();

    let first = harvest_theme_resources(&resolver, &library).unwrap();
    let second = harvest_theme_resources(&resolver, &library).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert!(
        first
            .iter()
            .any(|f| f.destination == format!("qt_material/{}", qt_material::DEFAULT_THEME))
    );
}

#[test]
fn custom_suffix_selects_other_files() {
    let project = Project::new();
    let resolver = StaticResolver::new().with("qt_material", project.library_root());
    let library = ThemeLibrary {
        suffix: ".txt".to_string(),
        ..ThemeLibrary::default()
    };

    let files = harvest_theme_resources(&resolver, &library).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].destination, "qt_material/README.txt");
}

#[test]
fn missing_theme_directory_is_a_resolution_error() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = StaticResolver::new().with("qt_material", dir.path());

    let err = harvest_theme_resources(&resolver, &ThemeLibrary::default()).unwrap_err();
    assert!(err.to_string().contains("qt_material"));
}
