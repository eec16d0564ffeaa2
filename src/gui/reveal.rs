//! Opening downloaded files and their folders with the desktop shell.

use crate::bundler::Platform;
use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    OpenFile,
    ShowInFolder,
}

/// Program and arguments that perform `action` on `path`.
///
/// macOS selects the file in Finder; other platforms open the parent folder.
/// Paths are passed as single arguments, never through a command interpreter.
pub fn command_for(platform: Platform, action: Action, path: &Path) -> (String, Vec<PathBuf>) {
    let folder = path.parent().unwrap_or(path).to_path_buf();
    match (platform, action) {
        (Platform::Windows, Action::OpenFile) => ("explorer".into(), vec![path.to_path_buf()]),
        (Platform::Windows, Action::ShowInFolder) => ("explorer".into(), vec![folder]),
        (Platform::MacOs, Action::OpenFile) => ("open".into(), vec![path.to_path_buf()]),
        (Platform::MacOs, Action::ShowInFolder) => {
            ("open".into(), vec!["-R".into(), path.to_path_buf()])
        }
        (Platform::Linux, Action::OpenFile) => ("xdg-open".into(), vec![path.to_path_buf()]),
        (Platform::Linux, Action::ShowInFolder) => ("xdg-open".into(), vec![folder]),
    }
}

pub fn run(action: Action, path: &Path) -> io::Result<()> {
    let (program, args) = command_for(Platform::current(), action, path);
    log::debug!("Running {} {:?}", program, args);
    Command::new(program).args(args).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macos_selects_file_in_finder() {
        let path = Path::new("/Users/me/Downloads/VideoDownloader/clip.mp4");
        let (program, args) = command_for(Platform::MacOs, Action::ShowInFolder, path);
        assert_eq!(program, "open");
        assert_eq!(args, vec![PathBuf::from("-R"), path.to_path_buf()]);
    }

    #[test]
    fn linux_and_windows_open_the_parent_folder() {
        let path = Path::new("/home/me/Downloads/VideoDownloader/clip.mp4");
        let folder = PathBuf::from("/home/me/Downloads/VideoDownloader");

        let (program, args) = command_for(Platform::Linux, Action::ShowInFolder, path);
        assert_eq!((program.as_str(), args), ("xdg-open", vec![folder.clone()]));

        let (program, args) = command_for(Platform::Windows, Action::ShowInFolder, path);
        assert_eq!((program.as_str(), args), ("explorer", vec![folder]));
    }

    #[test]
    fn windows_opens_files_without_a_command_interpreter() {
        let path = Path::new(r"C:\Users\me\Downloads\a&calc.exe&.mp4");
        let (program, args) = command_for(Platform::Windows, Action::OpenFile, path);
        assert_eq!(program, "explorer");
        assert_eq!(args, vec![path.to_path_buf()]);
    }
}
