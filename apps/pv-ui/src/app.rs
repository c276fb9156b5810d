use crate::views::{CorrelationView, PlotView, TableWindow};
use egui_file_dialog::FileDialog;
use pv_app::{Coordinator, CoordinatorEvent, EventChannel, RegistryLeaf, SettingsStore};
use pv_core::TableCategory;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

pub struct PetabVisApp {
    coordinator: Coordinator,
    events_rx: Receiver<CoordinatorEvent>,
    settings: Option<SettingsStore>,
    file_dialog: FileDialog,
    file_dialog_action: Option<FileDialogAction>,
    plot_view: PlotView,
    correlation_view: CorrelationView,
    correlation_visible: bool,
    table_windows: Vec<TableWindow>,
    windows_opened: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FileDialogAction {
    OpenManifest,
    OpenSimulation,
}

impl PetabVisApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, events_rx) = mpsc::channel();
        let mut coordinator = Coordinator::new();
        coordinator.add_plot_sink(Box::new(EventChannel::new(tx.clone())));
        coordinator.add_presenter_sink(Box::new(EventChannel::new(tx)));

        Self {
            coordinator,
            events_rx,
            settings: SettingsStore::default_location(),
            file_dialog: FileDialog::new(),
            file_dialog_action: None,
            plot_view: PlotView::default(),
            correlation_view: CorrelationView::default(),
            correlation_visible: false,
            table_windows: Vec::new(),
            windows_opened: 0,
        }
    }

    fn start_dir(&self) -> Option<PathBuf> {
        self.settings.as_ref().and_then(SettingsStore::start_dir)
    }

    fn pick_file(&mut self, action: FileDialogAction) {
        self.file_dialog_action = Some(action);
        self.file_dialog = match self.start_dir() {
            Some(dir) => FileDialog::new().initial_directory(dir),
            None => FileDialog::new(),
        };
        self.file_dialog.select_file();
    }

    fn remember_dir(&self, path: &Path) {
        if let Some(store) = &self.settings
            && let Err(e) = store.remember_dir_of(path)
        {
            tracing::warn!(error = %e, "could not update settings");
        }
    }

    fn open_manifest(&mut self, path: PathBuf) {
        self.remember_dir(&path);
        // Failures land in the coordinator's warning area.
        let _ = self.coordinator.open_manifest(&path);
    }

    fn open_simulation(&mut self, path: PathBuf) {
        self.remember_dir(&path);
        let _ = self.coordinator.attach_simulation(&path);
    }

    fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                CoordinatorEvent::RefreshPlots(selection) => {
                    self.plot_view.refresh(&selection);
                    self.correlation_view.refresh(&selection);
                }
                CoordinatorEvent::ShowTable { key, table } => {
                    self.windows_opened += 1;
                    self.table_windows
                        .push(TableWindow::new(&key, table, self.windows_opened));
                }
                CoordinatorEvent::CorrelationVisible(visible) => {
                    self.correlation_visible = visible;
                }
            }
        }
    }

    fn show_tree(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tables");
        ui.separator();

        let leaves: Vec<RegistryLeaf> = self.coordinator.browse_registry().collect();
        if leaves.is_empty() {
            ui.label("No YAML file loaded");
            return;
        }

        let mut activate = None;
        let mut open_view = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for category in TableCategory::ALL {
                let in_category: Vec<&RegistryLeaf> =
                    leaves.iter().filter(|l| l.key.category == category).collect();
                if in_category.is_empty() {
                    continue;
                }
                egui::CollapsingHeader::new(category.label())
                    .default_open(true)
                    .show(ui, |ui| {
                        for leaf in in_category {
                            let active = self.coordinator.selection().is_active(&leaf.key);
                            let label = if leaf.attached {
                                Path::new(&leaf.key.filename)
                                    .file_name()
                                    .map(|n| format!("{} (attached)", n.to_string_lossy()))
                                    .unwrap_or_else(|| leaf.key.filename.clone())
                            } else {
                                leaf.key.filename.clone()
                            };
                            let hover = match (leaf.attached, leaf.loaded) {
                                (true, _) => leaf.key.filename.as_str(),
                                (false, true) => "loaded",
                                (false, false) => "not loaded yet",
                            };
                            let response = ui.selectable_label(active, label).on_hover_text(hover);
                            if response.double_clicked() {
                                open_view = Some(leaf.key.clone());
                            } else if response.clicked() && category.is_plotting_slot() {
                                activate = Some(leaf.key.clone());
                            }
                        }
                    });
            }
        });

        if let Some(key) = activate {
            let _ = self.coordinator.activate(key.category, &key.filename);
        }
        if let Some(key) = open_view {
            let _ = self.coordinator.open_table_view(key.category, &key.filename);
        }
    }
}

impl eframe::App for PetabVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open YAML file...").clicked() {
                        ui.close_menu();
                        self.pick_file(FileDialogAction::OpenManifest);
                    }
                    if ui.button("Open simulation file...").clicked() {
                        ui.close_menu();
                        self.pick_file(FileDialogAction::OpenSimulation);
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        self.file_dialog.update(ctx);
        if let Some(path) = self.file_dialog.take_selected() {
            match self.file_dialog_action.take() {
                Some(FileDialogAction::OpenManifest) => self.open_manifest(path.to_path_buf()),
                Some(FileDialogAction::OpenSimulation) => self.open_simulation(path.to_path_buf()),
                None => {}
            }
        }

        egui::SidePanel::left("table_tree")
            .default_width(240.0)
            .show(ctx, |ui| self.show_tree(ui));

        // after user actions so this frame already reflects them
        self.poll_events();

        let warnings = self.coordinator.warnings();
        if !warnings.is_empty() {
            egui::TopBottomPanel::bottom("warnings").show(ctx, |ui| {
                for message in warnings.messages() {
                    ui.colored_label(egui::Color32::from_rgb(230, 140, 0), message);
                }
            });
        }

        if self.correlation_visible {
            egui::SidePanel::right("correlation")
                .default_width(360.0)
                .show(ctx, |ui| self.correlation_view.show(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot_view.show(ui);
        });

        for window in &mut self.table_windows {
            window.show(ctx);
        }
        self.table_windows.retain(TableWindow::is_open);
    }
}
