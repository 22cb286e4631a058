// src/ui.rs - Drawing helpers: theme, HUD, toast and camera preview with the hand skeleton
use crate::landmarks::{HandLandmarks, HAND_CONNECTIONS};
use crate::status::Telemetry;
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};
use image::DynamicImage;

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color32,
    pub background: Color32,
    pub surface: Color32,
    pub bone: Color32,
    pub joint: Color32,
    pub camera_on: Color32,
    pub camera_off: Color32,
    pub error: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(70, 130, 240),
            background: Color32::from_rgb(20, 20, 25),
            surface: Color32::from_rgb(30, 30, 35),
            bone: Color32::from_rgb(16, 185, 129),
            joint: Color32::from_rgb(34, 211, 238),
            camera_on: Color32::from_rgb(76, 175, 80),
            camera_off: Color32::from_rgb(110, 110, 118),
            error: Color32::from_rgb(244, 67, 54),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(200, 200, 200),
        }
    }
}

impl Theme {
    pub fn visuals(&self) -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.panel_fill = self.background;
        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.inactive.bg_fill = Color32::from_rgb(45, 45, 52);
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(55, 55, 65);
        visuals.widgets.active.bg_fill = self.primary;

        visuals.widgets.noninteractive.rounding = egui::Rounding::same(8.0);
        visuals.widgets.inactive.rounding = egui::Rounding::same(8.0);
        visuals.widgets.hovered.rounding = egui::Rounding::same(8.0);
        visuals.widgets.active.rounding = egui::Rounding::same(8.0);
        visuals.window_rounding = egui::Rounding::same(12.0);

        visuals
    }

    fn overlay_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(Color32::from_rgba_unmultiplied(15, 15, 20, 220))
            .rounding(10.0)
            .inner_margin(egui::Margin::same(10.0))
    }
}

/// Maps a normalized landmark onto `rect`.
fn to_screen(rect: Rect, x: f64, y: f64) -> Pos2 {
    Pos2::new(
        rect.left() + x as f32 * rect.width(),
        rect.top() + y as f32 * rect.height(),
    )
}

pub fn draw_hand_skeleton(painter: &egui::Painter, rect: Rect, hand: &HandLandmarks, theme: &Theme) {
    let points: Vec<Pos2> = hand
        .points()
        .iter()
        .map(|lm| to_screen(rect, lm.x, lm.y))
        .collect();

    for (from, to) in HAND_CONNECTIONS {
        painter.line_segment([points[from], points[to]], Stroke::new(2.0, theme.bone));
    }
    for pos in &points {
        painter.circle_filled(*pos, 2.5, theme.joint);
    }
}

/// Camera preview texture with the skeleton drawn on top.
pub struct VideoWidget {
    texture: Option<egui::TextureHandle>,
    aspect_ratio: f32,
}

impl Default for VideoWidget {
    fn default() -> Self {
        Self {
            texture: None,
            aspect_ratio: 4.0 / 3.0,
        }
    }
}

impl VideoWidget {
    pub fn update_frame(&mut self, ctx: &egui::Context, frame: &DynamicImage) {
        let rgb = frame.to_rgb8();
        let size = [rgb.width() as usize, rgb.height() as usize];
        if size[1] > 0 {
            self.aspect_ratio = size[0] as f32 / size[1] as f32;
        }

        let color_image = egui::ColorImage::from_rgb(size, rgb.as_raw());
        match self.texture.as_mut() {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture(
                    "camera_preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
    }

    pub fn clear(&mut self) {
        self.texture = None;
    }

    pub fn show(&self, ui: &mut egui::Ui, width: f32, hand: Option<&HandLandmarks>, theme: &Theme) {
        let size = Vec2::new(width, width / self.aspect_ratio);
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);

        match &self.texture {
            Some(texture) => {
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(rect, egui::Rounding::same(4.0), theme.surface);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No Video Signal",
                    egui::FontId::proportional(14.0),
                    theme.text_secondary,
                );
            }
        }

        if let Some(hand) = hand {
            draw_hand_skeleton(&painter, rect, hand, theme);
        }
    }
}

/// Camera indicator, last gesture and frame rate, pinned to the top-right corner.
pub fn show_hud(ctx: &egui::Context, telemetry: &Telemetry, theme: &Theme) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::RIGHT_TOP, Vec2::new(-16.0, 56.0))
        .interactable(false)
        .show(ctx, |ui| {
            theme.overlay_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (dot, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
                    let color = if telemetry.camera_on { theme.camera_on } else { theme.camera_off };
                    ui.painter().circle_filled(dot.center(), 5.0, color);
                    ui.label("Camera");
                });
                ui.horizontal(|ui| {
                    ui.label("Gesture:");
                    ui.label(egui::RichText::new(telemetry.gesture_label()).strong());
                });
                if telemetry.camera_on {
                    ui.label(format!("FPS: {:.0}", telemetry.fps));
                }
                ui.label(
                    egui::RichText::new("Point up to scroll up, thumb down to scroll down, fist to stop")
                        .size(11.0)
                        .color(theme.text_secondary),
                );
            });
        });
}

pub fn show_toast(ctx: &egui::Context, message: &str, theme: &Theme) {
    egui::Area::new(egui::Id::new("toast"))
        .anchor(egui::Align2::CENTER_BOTTOM, Vec2::new(0.0, -32.0))
        .interactable(false)
        .show(ctx, |ui| {
            theme.overlay_frame().show(ui, |ui| {
                ui.label(
                    egui::RichText::new(message)
                        .size(18.0)
                        .color(theme.text_primary),
                );
            });
        });
}

pub fn show_preview(
    ctx: &egui::Context,
    video: &VideoWidget,
    hand: Option<&HandLandmarks>,
    theme: &Theme,
) {
    egui::Area::new(egui::Id::new("camera_preview"))
        .anchor(egui::Align2::RIGHT_BOTTOM, Vec2::new(-16.0, -16.0))
        .interactable(false)
        .show(ctx, |ui| {
            theme.overlay_frame().show(ui, |ui| {
                video.show(ui, 240.0, hand, theme);
            });
        });
}
