use eframe::egui;

use crate::app::routes::Route;
use crate::app::state::{AppState, PageData};

pub fn render_public(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        match state.current_route() {
            Route::About => {
                ui.heading("About Campus Connect");
                ui.label("Events, exams, results and study materials for students, faculty and administrators.");
            }
            Route::Contact => {
                ui.heading("Contact");
                ui.label("Questions about your account? Reach the campus office.");
            }
            _ => {
                ui.heading("Campus Connect");
                ui.label("Your campus, in one place.");
                ui.add_space(20.0);
                if !state.session().is_authenticated() && ui.button("Get started").clicked() {
                    state.navigate(Route::Login);
                }
            }
        }
    });
}

pub fn render_dashboard(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Dashboard");
    ui.add_space(12.0);

    let Some(stats) = &state.stats else {
        ui.spinner();
        return;
    };

    egui::Grid::new("dashboard_stats").striped(true).show(ui, |ui| {
        for (label, value) in stats.counters() {
            ui.label(label);
            ui.strong(value.to_string());
            ui.end_row();
        }
    });
}

pub fn render_list(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label("Search:");
        let response = ui.text_edit_singleline(&mut state.search_input);
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            state.refresh();
        }
        if ui.button("Refresh").clicked() {
            state.refresh();
        }
    });
    ui.separator();

    let route = state.current_route();
    let Some(data) = &state.page_data else {
        ui.spinner();
        return;
    };

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("resource_list").striped(true).show(ui, |ui| match (route, data) {
            (Route::Events, PageData::Events(page)) => {
                for event in &page.results {
                    ui.strong(&event.title);
                    ui.label(event.date.format("%Y-%m-%d %H:%M").to_string());
                    ui.label(event.location.as_deref().unwrap_or("-"));
                    ui.end_row();
                }
            }
            (Route::Exams, PageData::Exams(page)) => {
                for exam in &page.results {
                    ui.strong(&exam.title);
                    ui.label(&exam.subject);
                    ui.label(exam.date.format("%Y-%m-%d %H:%M").to_string());
                    ui.end_row();
                }
            }
            (Route::Results, PageData::Results(page)) => {
                for result in &page.results {
                    ui.strong(result.exam_title.as_deref().unwrap_or("Exam"));
                    ui.label(result.student_name.as_deref().unwrap_or("-"));
                    ui.label(format!("{:.1} / {:.1}", result.marks_obtained, result.total_marks));
                    ui.label(result.grade.as_deref().unwrap_or("-"));
                    ui.end_row();
                }
            }
            (Route::Materials, PageData::Materials(page)) => {
                for material in &page.results {
                    ui.strong(&material.title);
                    ui.label(material.material_type.as_str());
                    ui.label(material.subject.as_deref().unwrap_or("-"));
                    ui.end_row();
                }
            }
            _ => {
                ui.spinner();
            }
        });
    });
}

pub fn render_profile(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Profile");
    ui.add_space(12.0);

    let session = state.session();
    let Some(identity) = session.identity() else {
        return;
    };

    ui.label(format!("@{} ({})", identity.username, identity.role));
    if let Some(student_id) = &identity.student_id {
        ui.label(format!("Student ID: {}", student_id));
    }
    if let Some(faculty_id) = &identity.faculty_id {
        ui.label(format!("Faculty ID: {}", faculty_id));
    }
    ui.add_space(12.0);

    egui::Grid::new("profile_form").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
        let form = &mut state.profile_form;
        for (label, value) in [
            ("First name", &mut form.first_name),
            ("Last name", &mut form.last_name),
            ("Email", &mut form.email),
            ("Phone", &mut form.phone),
            ("Address", &mut form.address),
        ] {
            ui.label(label);
            ui.text_edit_singleline(value);
            ui.end_row();
        }
    });

    ui.add_space(12.0);
    if ui.add_enabled(!state.busy, egui::Button::new("Save")).clicked() {
        state.handle_profile_update();
    }
}
