//! End-to-end packager runs against a throwaway project with a prebuilt binary.

mod common;

use common::{Project, THEMES};
use video_downloader::bundler::{
    BuildWarning, BundleSettings, Bundler, Error, PackageType, Platform, Settings,
    SettingsBuilder, StaticResolver,
};
use video_downloader::metadata::load_manifest;
use video_downloader::runtime::{ResourceSource, Resources, StartupError, read_payload};

fn settings(
    project: &Project,
    platform: Platform,
    edit: impl FnOnce(&mut BundleSettings, SettingsBuilder) -> SettingsBuilder,
) -> Settings {
    let manifest = load_manifest(&project.manifest()).unwrap();
    let mut bundle = manifest.bundle_settings;
    let builder = SettingsBuilder::new()
        .project_root(&manifest.project_root)
        .package_settings(manifest.package)
        .platform(platform)
        .binary_path(project.binary());
    let builder = edit(&mut bundle, builder);
    builder.bundle_settings(bundle).build().unwrap()
}

fn bundler(project: &Project, settings: Settings) -> Bundler {
    Bundler::with_resolver(
        settings,
        StaticResolver::new().with("qt_material", project.library_root()),
    )
}

#[tokio::test]
async fn missing_entry_point_writes_nothing() {
    let project = Project::new();
    project.remove_entry_point();
    let settings = settings(&project, Platform::Linux, |_, b| b);

    let err = bundler(&project, settings).bundle().await.unwrap_err();
    assert!(matches!(err, Error::BuildFailure(ref msg) if msg.contains("entry point")));
    assert!(!project.dist().exists());
    assert!(!project.work().exists());
}

#[tokio::test]
async fn linux_onefile_round_trips_through_payload() {
    let project = Project::new();
    let settings = settings(&project, Platform::Linux, |_, b| b.onefile(true));

    let report = bundler(&project, settings).bundle().await.unwrap();
    let exe = project.dist().join("VideoDownloader");
    assert_eq!(report.primary_output(), Some(exe.as_path()));
    assert_eq!(report.artifacts[0].package_type, PackageType::Executable);
    assert!(report.warnings.is_empty());
    assert!(
        report
            .artifacts
            .iter()
            .all(|a| a.package_type != PackageType::AppBundle)
    );
    assert!(!project.dist().join("VideoDownloader.app").exists());

    let cache = tempfile::tempdir().unwrap();
    let resources = Resources::locate_from(&exe, Some(cache.path())).unwrap();
    assert_eq!(resources.source, ResourceSource::Payload);
    resources.verify().unwrap();

    let theme_dir = resources.theme_dir().unwrap();
    for name in THEMES {
        assert!(theme_dir.join(name).is_file(), "{name} missing");
    }
    assert!(!theme_dir.join("README.txt").exists());
    assert!(!theme_dir.join("nested").exists());

    let manifest = resources.manifest.unwrap();
    assert_eq!(manifest.files_under("qt_material/").count(), THEMES.len());
}

#[tokio::test]
async fn linux_onefile_uncompressed_round_trips() {
    let project = Project::new();
    let settings = settings(&project, Platform::Linux, |_, b| b.onefile(true).compress(false));

    bundler(&project, settings).bundle().await.unwrap();
    let exe = project.dist().join("VideoDownloader");
    let (trailer, _) = read_payload(&exe).unwrap().unwrap();
    assert!(!trailer.compressed());

    let cache = tempfile::tempdir().unwrap();
    let resources = Resources::locate_from(&exe, Some(cache.path())).unwrap();
    assert_eq!(resources.source, ResourceSource::Payload);
    let theme_dir = resources.theme_dir().unwrap();
    for name in THEMES {
        assert!(theme_dir.join(name).is_file(), "{name} missing");
    }
    resources.verify().unwrap();
}

#[tokio::test]
async fn linux_folder_layout_is_located_next_to_executable() {
    let project = Project::new();
    let settings = settings(&project, Platform::Linux, |_, b| b.onefile(false));

    let report = bundler(&project, settings).bundle().await.unwrap();
    let folder = project.dist().join("VideoDownloader");
    assert_eq!(report.primary_output(), Some(folder.as_path()));
    assert!(folder.join("qt_material/dark_teal.xml").is_file());
    assert!(folder.join("bundle-manifest.json").is_file());

    let resources = Resources::locate_from(&folder.join("VideoDownloader"), None).unwrap();
    assert_eq!(resources.source, ResourceSource::Folder);
}

#[tokio::test]
async fn macos_bundle_carries_identifier_and_versions() {
    let project = Project::new();
    let settings = settings(&project, Platform::MacOs, |_, b| b.onefile(false));

    let report = bundler(&project, settings).bundle().await.unwrap();
    let app = project.dist().join("VideoDownloader.app");
    assert_eq!(report.artifacts[0].package_type, PackageType::AppBundle);
    assert_eq!(report.primary_output(), Some(app.as_path()));
    assert!(
        report
            .warnings
            .iter()
            .any(|w| matches!(w, BuildWarning::MissingIcon { .. }))
    );

    let contents = app.join("Contents");
    assert!(contents.join("MacOS/VideoDownloader").is_file());
    assert!(contents.join("Resources/qt_material/light_blue.xml").is_file());

    let resources = Resources::locate_from(&contents.join("MacOS/VideoDownloader"), None).unwrap();
    assert_eq!(resources.source, ResourceSource::AppBundle);

    let plist = plist::Value::from_file(contents.join("Info.plist")).unwrap();
    let dict = plist.as_dictionary().unwrap();
    let string = |key: &str| dict.get(key).and_then(|v| v.as_string()).map(String::from);
    assert_eq!(
        string("CFBundleIdentifier").as_deref(),
        Some("com.tolstoyj.videodownloader")
    );
    assert_eq!(string("CFBundleShortVersionString").as_deref(), Some("1.0.0"));
    assert_eq!(string("CFBundleVersion").as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn missing_icon_only_warns() {
    let project = Project::new();
    let settings = settings(&project, Platform::Windows, |_, b| b);

    let report = bundler(&project, settings).bundle().await.unwrap();
    assert!(report.icon.is_none());
    assert!(report.warnings.contains(&BuildWarning::MissingIcon {
        path: project.root().join("icon.ico"),
    }));
}

#[tokio::test]
async fn windows_non_pe_binary_is_reported() {
    let project = Project::new();
    std::fs::write(project.root().join("icon.ico"), b"ico").unwrap();
    let settings = settings(&project, Platform::Windows, |_, b| b.onefile(true));

    let report = bundler(&project, settings).bundle().await.unwrap();
    assert!(project.dist().join("VideoDownloader.exe").is_file());
    assert!(!project.dist().join("VideoDownloader.app").exists());
    assert!(
        report
            .warnings
            .iter()
            .any(|w| matches!(w, BuildWarning::NotPortableExecutable { .. }))
    );
    assert!(report.data_files.iter().any(|f| f.destination == "icon.ico"));
}

#[tokio::test]
async fn unknown_hidden_import_fails_at_startup_not_build() {
    let project = Project::new();
    let settings = settings(&project, Platform::Linux, |bundle, b| {
        bundle.hidden_imports.push("gtk.widgets".to_string());
        b.onefile(false)
    });

    bundler(&project, settings).bundle().await.unwrap();
    let exe = project.dist().join("VideoDownloader/VideoDownloader");
    let resources = Resources::locate_from(&exe, None).unwrap();
    let err = resources.verify().unwrap_err();
    assert!(matches!(
        err,
        StartupError::UnresolvedModule { ref module, .. } if module == "gtk.widgets"
    ));
}

#[tokio::test]
async fn duplicate_destination_fails_before_output() {
    let project = Project::new();
    std::fs::create_dir_all(project.root().join("qt_material")).unwrap();
    std::fs::write(project.root().join("qt_material/dark_teal.xml"), "<resources/>").unwrap();
    let settings = settings(&project, Platform::Linux, |bundle, b| {
        bundle.resources = Some(vec!["qt_material/*.xml".to_string()]);
        b
    });

    let err = bundler(&project, settings).bundle().await.unwrap_err();
    assert!(matches!(err, Error::BuildFailure(ref msg) if msg.contains("duplicate")));
    assert!(!project.dist().exists());
}

#[tokio::test]
async fn unresolvable_theme_library_fails() {
    let project = Project::new();
    let settings = settings(&project, Platform::Linux, |_, b| b);

    let err = Bundler::with_resolver(settings, StaticResolver::new())
        .bundle()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ModuleResolution { .. }));
    assert!(!project.dist().exists());
}

#[tokio::test]
async fn release_archive_is_checksummed() {
    let project = Project::new();
    let settings = settings(&project, Platform::Linux, |_, b| b.release_archive(true));

    let report = bundler(&project, settings).bundle().await.unwrap();
    let tarball = report
        .artifacts
        .iter()
        .find(|a| a.package_type == PackageType::TarGz)
        .unwrap();
    assert!(tarball.paths[0].starts_with(project.root().join("release")));
    assert_eq!(tarball.checksum.len(), 64);
    assert!(tarball.size > 0);
}
