//! Price history line chart for one SKU.

use cardledger_business::model::PricePoint;
use chrono::{Datelike as _, NaiveDate};
use egui::Ui;
use egui_plot::{GridMark, Line, Plot, PlotPoints};

const CHART_HEIGHT: f32 = 240.0;

fn date_from_day_number(day: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
}

/// Renders the daily market price of a SKU as a line chart.
///
/// X is the calendar day, Y is dollars; hover labels render through the
/// same two-decimal convention as every money cell.
pub fn price_chart(ui: &mut Ui, sku: &str, points: &[PricePoint]) {
    let series: PlotPoints<'_> = points
        .iter()
        .map(|point| {
            [
                f64::from(point.date.num_days_from_ce()),
                point.market_price_cents as f64 / 100.0,
            ]
        })
        .collect();

    Plot::new(("price_chart", sku))
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(|mark: GridMark, _range| {
            date_from_day_number(mark.value)
                .map(|date| date.format("%b %d").to_string())
                .unwrap_or_default()
        })
        .y_axis_formatter(|mark: GridMark, _range| format!("${:.2}", mark.value))
        .label_formatter(|_name, value| {
            let date = date_from_day_number(value.x)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            format!("{date}\n${:.2}", value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("Market price", series));
        });
}

#[cfg(test)]
mod price_chart_tests {
    use egui_kittest::Harness;

    use super::*;

    fn sample_points() -> Vec<PricePoint> {
        vec![
            PricePoint {
                date: "2026-02-01".parse().unwrap(),
                market_price_cents: 6100,
            },
            PricePoint {
                date: "2026-02-02".parse().unwrap(),
                market_price_cents: 6150,
            },
        ]
    }

    #[test]
    fn renders_without_panicking_on_data_and_empty() {
        let mut harness = Harness::new_ui(|ui| {
            price_chart(ui, "MH2-0123-NM", &sample_points());
            price_chart(ui, "NEO-0211-LP", &[]);
        });
        harness.step();
    }

    #[test]
    fn day_number_roundtrip() {
        let date: NaiveDate = "2026-02-01".parse().unwrap();
        let day = f64::from(date.num_days_from_ce());
        assert_eq!(date_from_day_number(day), Some(date));
    }
}
