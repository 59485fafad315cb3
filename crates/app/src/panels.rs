//! The four panels of the control surface plus the telemetry plot
//!
//! Panels only read a [`MotorSnapshot`]; anything the user asks for is pushed
//! as a [`Command`] and applied by the app after the frame is laid out.

use egui::{
    Align2, Button, FontId, Margin, ProgressBar, Rect, Response, RichText, Sense, Stroke, StrokeKind, Ui, Vec2, vec2,
};
use egui_plot::{Legend, Line, Plot};
use simcore::{Direction, MotorSnapshot, StepperConfig};

use crate::color::{blend, lighten};
use crate::rotor::{Pole, RotorLayout, progress_fraction};
use crate::theme::{HOVER_LIGHTEN, color, palette, text_on};
use crate::trace::Trace;

/// Height reserved for the motor drawing
const CANVAS_HEIGHT: f32 = 300.0;

/// A user request raised by the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetSpeed(u32),
    SetDirection(Direction),
    Start,
    Stop,
    Reset,
    Step(i64),
}

/// Manual step buttons: (label, steps, fill)
const STEP_BUTTONS: [(&str, i64, &str); 4] = [
    ("+1 STEP", 1, palette::BG_LIGHT),
    ("-1 STEP", -1, palette::BG_LIGHT),
    ("+10 STEPS", 10, palette::ACCENT_BLUE),
    ("-10 STEPS", -10, palette::ACCENT_BLUE),
];

const SYSTEM_INFO: &str = "\
SYSTEM: STEPPER MOTOR v2.0
MODE: FULL STEP
DRIVER: BIPOLAR
RESOLUTION: 1.8°
MAX SPEED: 500 STEPS/S";

/// Brightness of pulse dot `index` at time `t` (seconds)
pub fn pulse_alpha(t: f64, index: usize) -> f64 {
    0.3 + 0.7 * (t * 2.0 + index as f64).sin().abs()
}

fn panel_frame(ui: &mut Ui, accent: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::new()
        .fill(color(palette::BG_MEDIUM))
        .stroke(Stroke::new(1.0, color(accent)))
        .inner_margin(Margin::same(12))
        .outer_margin(Margin::same(6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

fn title(ui: &mut Ui, text: &str, accent: &str) {
    ui.label(RichText::new(text).size(16.0).strong().color(color(accent)));
}

fn caption(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(11.0).strong().color(color(palette::TEXT_SECONDARY)));
}

fn separator(ui: &mut Ui) {
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), 9.0), Sense::hover());
    ui.painter().hline(rect.x_range(), rect.center().y, Stroke::new(1.0, color(palette::ACCENT_BLUE)));
}

/// Flat button filled with `fill` that brightens while hovered
fn accent_button(ui: &mut Ui, text: &str, fill: &str, enabled: bool) -> Response {
    let hover = color(&lighten(fill, HOVER_LIGHTEN));
    ui.scope(|ui| {
        let widgets = &mut ui.visuals_mut().widgets;
        widgets.inactive.weak_bg_fill = color(fill);
        widgets.inactive.bg_stroke = Stroke::NONE;
        widgets.hovered.weak_bg_fill = hover;
        widgets.active.weak_bg_fill = hover;

        let label = RichText::new(text).strong().color(text_on(fill));
        ui.add_enabled(enabled, Button::new(label).min_size(vec2(0.0, 30.0)))
    })
    .inner
}

pub fn control_panel(ui: &mut Ui, snapshot: &MotorSnapshot, speed_input: &mut u32, config: &StepperConfig, commands: &mut Vec<Command>) {
    panel_frame(ui, palette::ACCENT_BLUE, |ui| {
        title(ui, "CONTROL PANEL", palette::ACCENT_BLUE);
        separator(ui);

        caption(ui, "SPEED");
        let width = ui.available_width();
        ui.spacing_mut().slider_width = width;
        let slider = egui::Slider::new(&mut *speed_input, config.min_speed..=config.max_speed).show_value(false);
        if ui.add(slider).changed() {
            commands.push(Command::SetSpeed(*speed_input));
        }
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!("{} STEPS/S", snapshot.speed))
                    .monospace()
                    .size(14.0)
                    .strong()
                    .color(color(palette::ACCENT_GREEN)),
            );
        });
        ui.add_space(8.0);

        caption(ui, "DIRECTION");
        ui.horizontal(|ui| {
            for (direction, text) in [(Direction::Cw, "CLOCKWISE"), (Direction::Ccw, "COUNTER-CLOCKWISE")] {
                let fill = if snapshot.direction == direction { palette::ACCENT_BLUE } else { palette::BG_LIGHT };
                if accent_button(ui, text, fill, true).clicked() && snapshot.direction != direction {
                    commands.push(Command::SetDirection(direction));
                }
            }
        });
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            if accent_button(ui, "▶ START", palette::ACCENT_GREEN, !snapshot.running).clicked() {
                commands.push(Command::Start);
            }
            if accent_button(ui, "⏹ STOP", palette::ACCENT_RED, snapshot.running).clicked() {
                commands.push(Command::Stop);
            }
            if accent_button(ui, "↻ RESET", palette::ACCENT_BLUE, true).clicked() {
                commands.push(Command::Reset);
            }
        });
    });
}

pub fn stats_panel(ui: &mut Ui, snapshot: &MotorSnapshot, commands: &mut Vec<Command>) {
    panel_frame(ui, palette::ACCENT_GREEN, |ui| {
        ui.vertical_centered(|ui| title(ui, "SYSTEM STATISTICS", palette::ACCENT_GREEN));
        ui.add_space(6.0);

        let metrics = [
            ("POSITION", snapshot.current_step.to_string(), "steps"),
            ("TOTAL STEPS", snapshot.total_steps.to_string(), "steps"),
            ("SPEED", snapshot.speed.to_string(), "steps/s"),
            ("TEMPERATURE", snapshot.metrics.temperature.to_string(), "°C"),
            ("POWER", snapshot.metrics.power.to_string(), "W"),
            ("TORQUE", snapshot.metrics.torque.to_string(), "%"),
        ];

        egui::Grid::new("metrics")
            .num_columns(2)
            .spacing([32.0, 10.0])
            .show(ui, |ui| {
                for (i, (name, value, unit)) in metrics.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(*name).size(10.0).color(color(palette::TEXT_SECONDARY)));
                        ui.label(RichText::new(value).monospace().size(18.0).strong().color(color(palette::ACCENT_BLUE)));
                        ui.label(RichText::new(*unit).size(9.0).color(color(palette::TEXT_SECONDARY)));
                    });
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });

        separator(ui);
        caption(ui, "MANUAL STEPPING");
        ui.horizontal_wrapped(|ui| {
            for (text, steps, fill) in STEP_BUTTONS {
                if accent_button(ui, text, fill, !snapshot.running).clicked() {
                    commands.push(Command::Step(steps));
                }
            }
        });
    });
}

pub fn visualization_panel(ui: &mut Ui, snapshot: &MotorSnapshot, config: &StepperConfig) {
    panel_frame(ui, palette::ACCENT_PURPLE, |ui| {
        title(ui, "MOTOR VISUALIZATION", palette::ACCENT_PURPLE);

        let (response, painter) = ui.allocate_painter(vec2(ui.available_width(), CANVAS_HEIGHT), Sense::hover());
        painter.rect_filled(response.rect, 0.0, color(palette::BG_DARK));

        let layout = RotorLayout::fit(response.rect);
        let center = layout.center;
        let blue = color(palette::ACCENT_BLUE);
        let green = color(palette::ACCENT_GREEN);

        painter.circle_stroke(center, layout.glow_radius(), Stroke::new(2.0, color(palette::ACCENT_PURPLE)));
        painter.circle(center, layout.radius, color(palette::BG_LIGHT), Stroke::new(2.0, blue));
        painter.circle(center, layout.inner_radius(), color(palette::BG_DARK), Stroke::new(1.0, blue));

        let label_font = FontId::proportional((8.0 * layout.radius / 120.0).max(7.0));
        for coil in layout.coils(config.coil_count, snapshot.active_coil) {
            let fill = if coil.energized { green } else { color(palette::BG_LIGHT) };
            painter.circle(coil.center, coil.radius, fill, Stroke::new(2.0, blue));
            painter.text(
                coil.label_pos,
                Align2::CENTER_CENTER,
                format!("COIL {}", coil.index + 1),
                label_font.clone(),
                color(palette::TEXT_SECONDARY),
            );
        }

        painter.circle(center, layout.rotor_radius(), color(palette::ROTOR), Stroke::new(2.0, green));
        for magnet in layout.magnets(config.magnet_count, snapshot.rotor_angle_deg) {
            let fill = match magnet.pole {
                Pole::North => color(palette::ACCENT_RED),
                Pole::South => blue,
            };
            painter.circle(magnet.center, magnet.radius, fill, Stroke::new(1.0, egui::Color32::WHITE));
        }
        painter.circle(center, layout.shaft_radius(), color(palette::TEXT_PRIMARY), Stroke::new(2.0, green));

        let (indicator, radius) = layout.indicator(snapshot.rotor_angle_deg);
        painter.circle_filled(indicator, radius, green);
    });
}

fn status_indicator(ui: &mut Ui, running: bool) {
    let (response, painter) = ui.allocate_painter(vec2(200.0, 40.0), Sense::hover());
    let origin = response.rect.min;
    let accent = if running { palette::ACCENT_GREEN } else { palette::ACCENT_RED };

    let bar = Rect::from_min_max(origin + vec2(10.0, 10.0), origin + vec2(190.0, 30.0));
    painter.rect_filled(bar, 0.0, color(palette::BG_LIGHT));
    painter.rect_stroke(bar, 0.0, Stroke::new(2.0, color(accent)), StrokeKind::Inside);

    if running {
        let t = ui.input(|i| i.time);
        for i in 0..3 {
            let fill = blend(palette::ACCENT_GREEN, palette::TEXT_PRIMARY, pulse_alpha(t, i));
            let center = origin + vec2(35.0 + 50.0 * i as f32, 20.0);
            painter.circle_filled(center, 5.0, color(&fill));
        }
    } else {
        painter.circle_filled(origin + vec2(35.0, 20.0), 5.0, color(accent));
    }
}

fn progress(ui: &mut Ui, label: &str, value: u32, fill: &str) {
    ui.label(RichText::new(label).size(10.0).color(color(palette::TEXT_SECONDARY)));
    ui.add(
        ProgressBar::new(progress_fraction(value))
            .desired_height(13.0)
            .fill(color(fill)),
    );
}

pub fn status_panel(ui: &mut Ui, snapshot: &MotorSnapshot) {
    panel_frame(ui, palette::ACCENT_RED, |ui| {
        ui.vertical_centered(|ui| {
            title(ui, "MOTOR STATUS", palette::ACCENT_RED);
            status_indicator(ui, snapshot.running);
            let (text, accent) = if snapshot.running {
                ("SYSTEM: RUNNING", palette::ACCENT_GREEN)
            } else {
                ("SYSTEM: IDLE", palette::ACCENT_RED)
            };
            ui.label(RichText::new(text).monospace().size(13.0).strong().color(color(accent)));
        });
        ui.add_space(8.0);

        progress(ui, "TEMPERATURE", snapshot.metrics.temperature, palette::ACCENT_RED);
        ui.add_space(6.0);
        progress(ui, "LOAD", snapshot.load, palette::ACCENT_BLUE);
        ui.add_space(8.0);

        ui.label(RichText::new(SYSTEM_INFO).monospace().size(10.0).color(color(palette::TEXT_SECONDARY)));
    });
}

pub fn telemetry_panel(ui: &mut Ui, trace: &Trace) {
    panel_frame(ui, palette::ACCENT_BLUE, |ui| {
        title(ui, "TELEMETRY", palette::ACCENT_BLUE);
        Plot::new("telemetry")
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_drag(false)
            .allow_zoom(false)
            .include_y(0.0)
            .include_y(100.0)
            .x_axis_label("Time (s)")
            .min_size(Vec2::new(0.0, 120.0))
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new("Temperature (°C)", Trace::line(&trace.temperature, &trace.t)));
                plot_ui.line(Line::new("Power (W)", Trace::line(&trace.power, &trace.t)));
                plot_ui.line(Line::new("Torque (%)", Trace::line(&trace.torque, &trace.t)));
            });
    });
}
