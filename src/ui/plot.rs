use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::{blue_ramp, ColorMap};
use crate::data::aggregate::{CategoryCount, ClusterCounts};
use crate::data::stats::Summary;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => {
                ui.heading(RichText::new(msg).color(Color32::RED));
            }
            None => {
                ui.heading("Open a transaction file to begin  (File → Open…)");
            }
        });
        return;
    }

    let view = &state.view;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("E-Commerce Transaction Dashboard");
            ui.label(
                "Purchases by city, payment methods and customer transaction frequency \
                 for the selected period.",
            );
            ui.separator();

            if view.is_empty() {
                ui.add_space(12.0);
                ui.label(
                    RichText::new("No transactions match the current filter.")
                        .color(Color32::LIGHT_BLUE)
                        .strong(),
                );
                return;
            }

            ui.heading(format!(
                "Top {} cities by purchase count",
                state.config.top_city_limit
            ));
            city_chart(ui, &view.top_cities);
            ui.add_space(12.0);

            ui.heading("Payment methods");
            match &state.payment_colors {
                Some(colors) if !view.payments.is_empty() => {
                    payment_pie(ui, &view.payments, colors)
                }
                _ => {
                    ui.label("No payment method data in the current selection.");
                }
            }
            ui.add_space(12.0);

            ui.heading("Customers by transaction frequency");
            cluster_chart(ui, &view.clusters);
            ui.add_space(12.0);

            ui.heading("Payment statistics");
            statistics_table(ui, &view.statistics);
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bars with the count printed above each bar and category labels
/// on the x axis.
fn count_bars(ui: &mut Ui, id: &str, x_label: &str, y_label: &str, items: &[(String, usize)]) {
    let colors = blue_ramp(items.len());
    let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();
    let peak = items.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;

    let bars: Vec<Bar> = items
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((label, count), color))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .fill(color)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(280.0)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .include_y(0.0)
        .include_y(peak * 1.1)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            for (i, (_, count)) in items.iter().enumerate() {
                plot_ui.text(Text::new(
                    PlotPoint::new(i as f64, *count as f64 + peak * 0.04),
                    count.to_string(),
                ));
            }
        });
}

fn city_chart(ui: &mut Ui, cities: &[CategoryCount]) {
    let items: Vec<(String, usize)> = cities.iter().map(|c| (c.label.clone(), c.count)).collect();
    count_bars(ui, "city_chart", "City", "Purchases", &items);
}

fn cluster_chart(ui: &mut Ui, clusters: &ClusterCounts) {
    let items: Vec<(String, usize)> = clusters
        .entries()
        .iter()
        .map(|(label, n)| (label.to_string(), *n))
        .collect();
    count_bars(ui, "cluster_chart", "Cluster", "Customers", &items);
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Segments per full circle; each slice gets a proportional share.
const PIE_RESOLUTION: f64 = 180.0;

fn payment_pie(ui: &mut Ui, payments: &[CategoryCount], colors: &ColorMap) {
    let total: usize = payments.iter().map(|p| p.count).sum();
    if total == 0 {
        return;
    }

    Plot::new("payment_pie")
        .height(320.0)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // Start at 12 o'clock and go counter-clockwise.
            let mut angle = FRAC_PI_2;
            for p in payments {
                let share = p.count as f64 / total as f64;
                let sweep = share * TAU;
                let name = format!("{} ({})", p.label, p.count);

                // Polygons are filled as convex shapes, so wide slices are
                // drawn as several wedges sharing one legend name.
                let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
                let piece = sweep / pieces as f64;
                for k in 0..pieces {
                    plot_ui.polygon(
                        Polygon::new(slice_points(angle + piece * k as f64, piece))
                            .name(&name)
                            .fill_color(colors.color_for(&p.label))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let mid = angle + sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                    format!("{:.1}%", share * 100.0),
                ));

                angle += sweep;
            }
        });
}

/// Outline of a unit-circle wedge starting at `start` and spanning `sweep`
/// radians.
fn slice_points(start: f64, sweep: f64) -> PlotPoints<'static> {
    let steps = ((sweep / TAU) * PIE_RESOLUTION).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for s in 0..=steps {
        let a = start + sweep * s as f64 / steps as f64;
        points.push([a.cos(), a.sin()]);
    }
    PlotPoints::new(points)
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

fn statistics_table(ui: &mut Ui, statistics: &[(&'static str, Summary)]) {
    if statistics.is_empty() {
        ui.label("No numeric values in the current selection.");
        return;
    }

    egui::Grid::new("statistics_table")
        .striped(true)
        .num_columns(statistics.len() + 1)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for (name, _) in statistics {
                ui.strong(*name);
            }
            ui.end_row();

            let rows: Vec<_> = statistics.iter().map(|(_, s)| s.rows()).collect();
            for r in 0..8 {
                ui.label(rows[0][r].0);
                for stat_rows in &rows {
                    let value = stat_rows[r].1;
                    if value.is_nan() {
                        ui.label("NaN");
                    } else {
                        ui.monospace(format!("{value:.2}"));
                    }
                }
                ui.end_row();
            }
        });
}
