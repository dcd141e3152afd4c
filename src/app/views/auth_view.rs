use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme;
use crate::shared::Role;

const INPUT_WIDTH: f32 = 280.0;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading(if state.is_register_mode { "Create Account" } else { "Welcome Back" });
        ui.add_space(20.0);

        egui::Grid::new("auth_form").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            field(ui, "Username:", &mut state.auth_form.username, false);

            if state.is_register_mode {
                field(ui, "Email:", &mut state.auth_form.email, false);
                field(ui, "First name:", &mut state.auth_form.first_name, false);
                field(ui, "Last name:", &mut state.auth_form.last_name, false);

                ui.label(egui::RichText::new("Role:").color(theme::TEXT_SECONDARY));
                egui::ComboBox::from_id_salt("role")
                    .selected_text(state.auth_form.role.as_str())
                    .show_ui(ui, |ui| {
                        for role in [Role::Student, Role::Faculty] {
                            ui.selectable_value(&mut state.auth_form.role, role, role.as_str());
                        }
                    });
                ui.end_row();
            }

            field(ui, "Password:", &mut state.auth_form.password, true);

            if state.is_register_mode {
                field(ui, "Confirm:", &mut state.auth_form.confirm_password, true);
            }
        });

        ui.add_space(20.0);

        ui.horizontal(|ui| {
            let submit = egui::Button::new(
                egui::RichText::new(if state.is_register_mode { "Register" } else { "Login" }).color(theme::TEXT_LIGHT),
            )
            .fill(theme::ACCENT);

            if ui.add_enabled(!state.busy, submit).clicked() {
                if state.is_register_mode {
                    state.handle_register();
                } else {
                    state.handle_login();
                }
            }

            let toggle = if state.is_register_mode { "Back to Login" } else { "Create Account" };
            if ui.button(toggle).clicked() {
                state.toggle_auth_mode();
            }
        });

        if state.busy {
            ui.add_space(15.0);
            ui.spinner();
        }
    });
}

fn field(ui: &mut egui::Ui, label: &str, value: &mut String, password: bool) {
    ui.label(egui::RichText::new(label).color(theme::TEXT_SECONDARY));
    ui.add_sized([INPUT_WIDTH, 24.0], egui::TextEdit::singleline(value).password(password));
    ui.end_row();
}
