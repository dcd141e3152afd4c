use eframe::egui;

use crate::app::routes::{navigation_items, GuardDecision, Route};
use crate::app::state::AppState;
use crate::app::theme;

pub mod auth_view;
pub mod pages_view;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    let frame_style = egui::Frame::default()
        .fill(theme::TOP_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 8));

    egui::TopBottomPanel::top("top_panel")
        .frame(frame_style)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(theme::TEXT_LIGHT, egui::RichText::new("Campus Connect").size(18.0).strong());
                ui.add_space(16.0);

                for (label, route) in [("Home", Route::Home), ("About", Route::About), ("Contact", Route::Contact)] {
                    if ui.link(egui::RichText::new(label).color(theme::TEXT_LIGHT)).clicked() {
                        state.navigate(route);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let session = state.session();
                    match session.identity() {
                        Some(identity) => {
                            if ui.button("Logout").clicked() {
                                state.logout();
                            }
                            ui.colored_label(
                                theme::TEXT_LIGHT,
                                format!("{} ({})", identity.display_name(), identity.role),
                            );
                        }
                        None if session.is_authenticated() => {}
                        None => {
                            if ui.button("Register").clicked() {
                                state.is_register_mode = true;
                                state.navigate(Route::Register);
                            }
                            if ui.button("Login").clicked() {
                                state.is_register_mode = false;
                                state.navigate(Route::Login);
                            }
                        }
                    }
                });
            });
        });
}

/// Role-filtered navigation, only for signed-in users
pub fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    let Some(identity) = state.session().identity().cloned() else {
        return;
    };
    let current = state.current_route();

    egui::SidePanel::left("sidebar")
        .resizable(false)
        .default_width(200.0)
        .frame(egui::Frame::default().fill(theme::SIDEBAR_BG).inner_margin(egui::Margin::same(8)))
        .show(ctx, |ui| {
            for item in navigation_items(identity.role) {
                let fill = if item.route == current { theme::SIDEBAR_ACTIVE } else { egui::Color32::TRANSPARENT };
                let entry = egui::Button::new(item.label).fill(fill);
                if ui.add_sized([ui.available_width(), 28.0], entry).clicked() {
                    state.navigate(item.route);
                }
            }
            ui.separator();
            ui.small(format!("Signed in as @{}", identity.username));
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(error) = state.error.clone() {
            ui.colored_label(theme::ERROR, error);
        }
        if let Some(notice) = state.notice.clone() {
            ui.colored_label(theme::SUCCESS, notice);
        }

        match state.client.resolve_route() {
            GuardDecision::Wait => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            // The navigator already moved; the next frame renders the target
            GuardDecision::Redirect(_) => {}
            GuardDecision::Admit => match state.current_route() {
                Route::Login | Route::Register => auth_view::render(ui, state),
                Route::Home | Route::About | Route::Contact => pages_view::render_public(ui, state),
                Route::Dashboard | Route::Admin(_) => pages_view::render_dashboard(ui, state),
                Route::Profile => pages_view::render_profile(ui, state),
                Route::Events | Route::Exams | Route::Results | Route::Materials => {
                    pages_view::render_list(ui, state)
                }
            },
        }
    });
}
