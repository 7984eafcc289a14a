use crate::{EditorApp, ui};
use eframe::egui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ToolTab {
    MaskBrush,
    RestoreBrush,
    Props,
    Match,
    Generate,
}

impl ToolTab {
    pub(crate) fn title(self) -> &'static str {
        match self {
            ToolTab::MaskBrush => "Mask Brush",
            ToolTab::RestoreBrush => "Restore Brush",
            ToolTab::Props => "Props",
            ToolTab::Match => "Match",
            ToolTab::Generate => "Generate",
        }
    }
}

pub(crate) fn default_left_dock() -> DockState<ToolTab> {
    let mut dock = DockState::new(vec![ToolTab::MaskBrush, ToolTab::RestoreBrush]);
    dock.main_surface_mut()
        .split_below(NodeIndex::root(), 0.45, vec![ToolTab::Generate]);
    dock
}

pub(crate) fn default_right_dock() -> DockState<ToolTab> {
    let mut dock = DockState::new(vec![ToolTab::Props]);
    dock.main_surface_mut()
        .split_below(NodeIndex::root(), 0.65, vec![ToolTab::Match]);
    dock
}

struct ToolTabViewer<'a> {
    app: &'a mut EditorApp,
}

impl TabViewer for ToolTabViewer<'_> {
    type Tab = ToolTab;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        tab.title().into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        match tab {
            ToolTab::MaskBrush => ui::brush_settings::mask_brush_panel(ui, self.app),
            ToolTab::RestoreBrush => ui::brush_settings::restore_brush_panel(ui, self.app),
            ToolTab::Props => ui::props_list::props_panel(ui, self.app),
            ToolTab::Match => ui::match_panel::match_panel(ui, self.app),
            ToolTab::Generate => ui::generate_panel::generate_panel(ui, self.app),
        }
    }

    fn closeable(&mut self, _tab: &mut Self::Tab) -> bool {
        false
    }

    fn allowed_in_windows(&self, _tab: &mut Self::Tab) -> bool {
        true
    }
}

pub(crate) fn show_tool_docks(app: &mut EditorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tool_dock_left")
        .resizable(true)
        .default_width(300.0)
        .min_width(240.0)
        .show(ctx, |ui| {
            let mut dock_state = std::mem::replace(&mut app.dock_left, DockState::new(Vec::new()));
            {
                let mut viewer = ToolTabViewer { app };
                DockArea::new(&mut dock_state)
                    .id(egui::Id::new("left_dock_area"))
                    .show_inside(ui, &mut viewer);
            }
            app.dock_left = dock_state;
        });

    egui::SidePanel::right("tool_dock_right")
        .resizable(true)
        .default_width(300.0)
        .min_width(240.0)
        .show(ctx, |ui| {
            let mut dock_state = std::mem::replace(&mut app.dock_right, DockState::new(Vec::new()));
            {
                let mut viewer = ToolTabViewer { app };
                DockArea::new(&mut dock_state)
                    .id(egui::Id::new("right_dock_area"))
                    .show_inside(ui, &mut viewer);
            }
            app.dock_right = dock_state;
        });
}
