use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::pipeline::{ChartPoint, MassBySpecies};

// ---------------------------------------------------------------------------
// Scatter plot: bill length vs. bill depth
// ---------------------------------------------------------------------------

/// One point series per species so the legend doubles as a colour key.
pub fn bill_scatter(ui: &mut Ui, points: &[ChartPoint], colors: &ColorMap) {
    ui.heading("Bill Length vs. Bill Depth");

    let mut by_species: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        by_species
            .entry(p.species.as_str())
            .or_default()
            .push([p.bill_length_mm, p.bill_depth_mm]);
    }

    Plot::new("bill_scatter")
        .legend(Legend::default())
        .x_axis_label("bill_length_mm")
        .y_axis_label("bill_depth_mm")
        .height(320.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (species, coords) in by_species {
                let series = Points::new(PlotPoints::from(coords))
                    .name(species)
                    .color(colors.color_for(species))
                    .radius(3.0);
                plot_ui.points(series);
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart: mean body mass by species
// ---------------------------------------------------------------------------

pub fn mass_bar_chart(ui: &mut Ui, means: &MassBySpecies, colors: &ColorMap) {
    ui.heading("Average Body Mass by Species");

    let labels: Vec<String> = means.keys().cloned().collect();
    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(i, (species, &mass))| {
            Bar::new(i as f64, mass)
                .name(species)
                .fill(colors.color_for(species))
        })
        .collect();

    Plot::new("mass_by_species")
        .y_axis_label("body_mass_g")
        .height(320.0)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

/// Axis label for an integer bar position, empty between bars.
fn category_label(labels: &[String], position: f64) -> String {
    let idx = position.round();
    if (position - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
