//! Main window.

use super::{
    reveal::{self, Action},
    state::{AppState, Dialog, WorkerEvent, describe},
    theme,
};
use crate::downloader::{ToolStatus, VideoDownloader, direct};
use egui::{Align, Align2, Color32, Layout, RichText, TextureHandle, TextureOptions, Vec2};
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

const FORMAT_HEADERS: [&str; 4] = ["Quality", "Extension", "Size", "Format Code"];
const THUMBNAIL_SIZE: Vec2 = Vec2::new(640.0, 360.0);

/// Sends worker events and wakes the UI thread.
#[derive(Clone)]
struct Notifier {
    tx: Sender<WorkerEvent>,
    ctx: egui::Context,
}

impl Notifier {
    fn send(&self, event: WorkerEvent) {
        if self.tx.send(event).is_ok() {
            self.ctx.request_repaint();
        }
    }
}

pub struct VideoDownloaderApp {
    state: AppState,
    tools: ToolStatus,
    thumbnail: Option<TextureHandle>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl VideoDownloaderApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        theme: &qt_material::Theme,
        download_dir: PathBuf,
    ) -> Self {
        theme::apply(&cc.egui_ctx, theme);

        if let Err(e) = std::fs::create_dir_all(&download_dir) {
            log::warn!("Could not create {}: {}", download_dir.display(), e);
        }
        let tools = ToolStatus::detect();
        let (tx, rx) = mpsc::channel();

        Self {
            state: AppState::new(download_dir, tools.has_ffmpeg()),
            tools,
            thumbnail: None,
            tx,
            rx,
        }
    }

    fn notifier(&self, ctx: &egui::Context) -> Notifier {
        Notifier {
            tx: self.tx.clone(),
            ctx: ctx.clone(),
        }
    }

    /// Download directory and tools handed to a worker thread.
    fn worker_config(&self) -> (PathBuf, ToolStatus) {
        (self.state.download_dir.clone(), self.tools.clone())
    }

    fn fetch_info(&mut self, ctx: &egui::Context) {
        let Some(url) = self.state.begin_fetch() else {
            return;
        };
        self.thumbnail = None;

        let notifier = self.notifier(ctx);
        let (dir, tools) = self.worker_config();
        thread::spawn(move || {
            let fetched = VideoDownloader::with_tools(dir, tools).and_then(|d| d.fetch_info(&url));
            let event = match fetched {
                Ok(info) => WorkerEvent::Info(info),
                Err(e) => {
                    log::error!("Fetching {} failed: {}", url, e);
                    WorkerEvent::InfoFailed(describe(&e))
                }
            };
            notifier.send(event);
        });
    }

    fn fetch_thumbnail(&self, ctx: &egui::Context, url: String) {
        let notifier = self.notifier(ctx);
        thread::spawn(move || match load_thumbnail(&url) {
            Ok(image) => notifier.send(WorkerEvent::Thumbnail(image)),
            Err(e) => log::warn!("Error loading thumbnail: {e:#}"),
        });
    }

    fn start_download(&mut self, ctx: &egui::Context) {
        let Some((url, choice)) = self.state.begin_download() else {
            return;
        };

        let notifier = self.notifier(ctx);
        let (dir, tools) = self.worker_config();
        thread::spawn(move || {
            let result = VideoDownloader::with_tools(dir, tools).and_then(|d| {
                d.download_format(&url, &choice, |update| {
                    notifier.send(WorkerEvent::Progress(update.clone()))
                })
            });
            let event = match result {
                Ok(path) => WorkerEvent::Finished(path),
                Err(e) => {
                    log::error!("Download of {} failed: {}", url, e);
                    WorkerEvent::Failed(describe(&e))
                }
            };
            notifier.send(event);
        });
    }

    fn poll_workers(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                WorkerEvent::Thumbnail(image) => {
                    self.thumbnail =
                        Some(ctx.load_texture("thumbnail", image, TextureOptions::LINEAR));
                }
                WorkerEvent::Info(info) => {
                    if let Some(url) = info.thumbnail.clone() {
                        self.fetch_thumbnail(ctx, url);
                    }
                    self.state.apply(WorkerEvent::Info(info));
                }
                other => self.state.apply(other),
            }
        }
    }

    fn choose_folder(&mut self) {
        let Some(dir) = rfd::FileDialog::new()
            .set_directory(&self.state.download_dir)
            .pick_folder()
        else {
            return;
        };
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                log::info!("Saving downloads to {}", dir.display());
                self.state.download_dir = dir;
            }
            Err(e) => {
                self.state.dialog = Some(Dialog::Warning(format!(
                    "Could not use {}: {e}",
                    dir.display()
                )));
            }
        }
    }

    fn reveal(&mut self, action: Action, path: &Path) {
        if let Err(e) = reveal::run(action, path) {
            self.state.dialog = Some(Dialog::Warning(format!(
                "Could not open file or folder: {e}"
            )));
        }
    }

    fn left_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("YouTube Video Downloader")
                    .size(theme::TITLE_SIZE)
                    .strong()
                    .color(theme::ACCENT),
            );
        });
        ui.add_space(20.0);

        card(ui, |ui| {
            ui.horizontal(|ui| {
                let input = egui::TextEdit::singleline(&mut self.state.url)
                    .hint_text("Enter video URL...")
                    .desired_width(ui.available_width() - 140.0)
                    .margin(Vec2::new(20.0, 12.0));
                let response = ui.add(input);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let fetch = ui.add_enabled(
                    self.state.can_fetch(),
                    accent_button("Fetch Info", Vec2::new(120.0, 45.0)),
                );
                if fetch.clicked() || (submitted && self.state.can_fetch()) {
                    self.fetch_info(ui.ctx());
                }
            });
        });
        ui.add_space(10.0);

        card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Save to:");
                ui.monospace(self.state.download_dir.display().to_string());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui
                        .add_enabled(!self.state.busy(), egui::Button::new("Change Folder"))
                        .clicked()
                    {
                        self.choose_folder();
                    }
                });
            });
            if self.tools.ytdlp().is_none() {
                ui.colored_label(
                    Color32::LIGHT_RED,
                    "yt-dlp was not found on PATH; fetching and downloading will fail",
                );
            }
            if !self.state.has_ffmpeg {
                ui.weak("ffmpeg was not found; formats without an audio track are unavailable");
            }
        });
        ui.add_space(10.0);

        card(ui, |ui| {
            if self.state.info_text.is_empty() {
                ui.weak("Fetch a video to see its details");
            } else {
                ui.label(RichText::new(self.state.info_text.as_str()).size(14.0));
            }
        });
        ui.add_space(10.0);

        card(ui, |ui| self.format_table(ui));
        ui.add_space(10.0);

        card(ui, |ui| {
            let bar = match self.state.progress {
                Some(fraction) => egui::ProgressBar::new(fraction).show_percentage(),
                None => egui::ProgressBar::new(0.0).animate(self.state.downloading),
            };
            ui.add(bar.fill(theme::ACCENT));
            ui.label(RichText::new(self.state.status.as_str()).size(13.0).weak());
        });
        ui.add_space(10.0);

        let download = ui.add_enabled(
            self.state.can_download(),
            accent_button("Download", Vec2::new(ui.available_width(), 50.0)),
        );
        if download.clicked() {
            self.start_download(ui.ctx());
        }
    }

    fn format_table(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                egui::Grid::new("formats")
                    .num_columns(FORMAT_HEADERS.len())
                    .striped(true)
                    .min_col_width(ui.available_width() / FORMAT_HEADERS.len() as f32 - 8.0)
                    .show(ui, |ui| {
                        for header in FORMAT_HEADERS {
                            ui.strong(header);
                        }
                        ui.end_row();

                        for (i, row) in self.state.formats.iter().enumerate() {
                            let available = row.is_available(self.state.has_ffmpeg);
                            let label = egui::SelectableLabel::new(
                                self.state.selected == Some(i),
                                row.quality.as_str(),
                            );
                            let response = ui
                                .add_enabled(available, label)
                                .on_disabled_hover_text("Needs ffmpeg to add the audio track");
                            if response.clicked() {
                                clicked = Some(i);
                            }
                            ui.label(row.extension.as_str());
                            ui.label(row.size.as_str());
                            ui.label(row.format_id.as_str());
                            ui.end_row();
                        }
                    });
            });
        if clicked.is_some() {
            self.state.selected = clicked;
        }
    }

    fn right_panel(&mut self, ui: &mut egui::Ui) {
        card(ui, |ui| {
            ui.set_min_height(200.0);
            ui.vertical_centered(|ui| match &self.thumbnail {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(texture)
                            .max_size(THUMBNAIL_SIZE)
                            .rounding(5.0),
                    );
                }
                None => {
                    ui.weak("No preview");
                }
            });
        });
        ui.add_space(20.0);

        let mut requested = None;
        card(ui, |ui| {
            ui.label(
                RichText::new("Recent Downloads")
                    .size(theme::HEADER_SIZE)
                    .strong()
                    .color(theme::ACCENT),
            );
            ui.add_space(10.0);

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.state.history.is_empty() {
                        ui.weak("Nothing downloaded yet");
                    }
                    for entry in self.state.history.iter().rev() {
                        ui.horizontal(|ui| {
                            ui.label(entry.file_name()).on_hover_text(format!(
                                "{}\n{}",
                                entry.path.display(),
                                entry.finished_at.format("%Y-%m-%d %H:%M")
                            ));
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.menu_button("⋮", |ui| {
                                    if ui.button("Open File").clicked() {
                                        requested = Some((Action::OpenFile, entry.path.clone()));
                                        ui.close_menu();
                                    }
                                    if ui.button("Show in Folder").clicked() {
                                        requested =
                                            Some((Action::ShowInFolder, entry.path.clone()));
                                        ui.close_menu();
                                    }
                                });
                            });
                        });
                    }
                });
        });

        if let Some((action, path)) = requested {
            self.reveal(action, &path);
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.state.dialog.clone() else {
            return;
        };
        let title = match &dialog {
            Dialog::Warning(_) => "Warning",
            Dialog::Error { .. } => "Error",
            Dialog::Completed(_) => "Success",
        };

        let mut close = false;
        let mut requested = None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| match &dialog {
                Dialog::Warning(message) => {
                    ui.label(message.as_str());
                    close = ui.button("OK").clicked();
                }
                Dialog::Error { headline, details } => {
                    ui.strong(headline.as_str());
                    ui.label(details.as_str());
                    close = ui.button("OK").clicked();
                }
                Dialog::Completed(path) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    ui.strong("Download completed!");
                    ui.label(format!("File saved as: {name}"));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        let size = Vec2::new(100.0, 30.0);
                        if ui.add(accent_button("Open File", size)).clicked() {
                            requested = Some((Action::OpenFile, path.clone()));
                        }
                        if ui.add(accent_button("Show in Folder", size)).clicked() {
                            requested = Some((Action::ShowInFolder, path.clone()));
                        }
                        if ui.button("Close").clicked() {
                            close = true;
                        }
                    });
                }
            });

        if close || requested.is_some() {
            self.state.dialog = None;
        }
        if let Some((action, path)) = requested {
            self.reveal(action, &path);
        }
    }
}

impl eframe::App for VideoDownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workers(ctx);

        let right_width = (ctx.screen_rect().width() * 0.4).max(360.0);
        egui::SidePanel::right("preview_panel")
            .resizable(false)
            .exact_width(right_width)
            .show(ctx, |ui| self.right_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.left_panel(ui));
        });

        self.show_dialog(ctx);
    }
}

fn accent_button(text: &str, min_size: Vec2) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text).strong().color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(theme::ROUNDING_BUTTON)
        .min_size(min_size)
}

fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::none()
        .fill(theme::CARD)
        .rounding(theme::ROUNDING_CARD)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

/// Downloads a thumbnail and scales it to fit the preview.
fn load_thumbnail(url: &str) -> anyhow::Result<egui::ColorImage> {
    let bytes = direct::fetch_bytes(url)?;
    let image = image::load_from_memory(&bytes)?
        .thumbnail(THUMBNAIL_SIZE.x as u32, THUMBNAIL_SIZE.y as u32)
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        image.as_raw(),
    ))
}
