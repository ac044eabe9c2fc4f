use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::PaymentFilter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Date range ----
    ui.strong("Purchase date");
    let mut start = state.filter.start;
    let mut end = state.filter.end;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut start).id_salt("date_start"));
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(DatePickerButton::new(&mut end).id_salt("date_end"));
    });
    if start > end {
        ui.label(RichText::new("Start date is after end date.").color(Color32::YELLOW));
    }
    state.set_date_range(start, end);
    ui.separator();

    // ---- Payment type ----
    ui.strong("Payment method");
    let mut payment = state.filter.payment.clone();
    egui::ComboBox::from_id_salt("payment_type")
        .selected_text(payment.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut payment, PaymentFilter::All, "All");
            for option in &state.payment_options {
                ui.selectable_value(&mut payment, PaymentFilter::Only(option.clone()), option);
            }
        });
    state.set_payment(payment);
    ui.separator();

    if ui.button("Reset filters").clicked() {
        state.reset_filter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.load_configured();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} transactions loaded, {} in selection",
                ds.len(),
                state.view.row_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open transaction data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.config.data_path = path.clone();
        state.load_path(&path);
    }
}
