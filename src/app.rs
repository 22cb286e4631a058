// src/app.rs - Desktop shell: long article scrolled by hand gestures
use crate::actions::{ActionDispatcher, ScrollSurface, MSG_STOPPED};
use crate::config::AppConfig;
use crate::error::Result;
use crate::landmarks::HandLandmarks;
use crate::mediapipe_bridge::MediaPipeBridge;
use crate::simulation::{SimulatedHand, SyntheticFrames};
use crate::status::{Telemetry, Toast};
use crate::tracking::{FrameSource, HandTracker, LandmarkDetector};
use crate::ui::{self, Theme, VideoWidget};
use crate::video::CameraSource;

use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{error, info};

const ARTICLE_TITLE: &str = "Lighthouses: Light, Stone and Weather";

const ARTICLE: &[(&str, &str)] = &[
    ("", "For most of recorded history a coastline at night was a guess. Sailors steered by stars, \
      soundings and memory, and the last mile before harbour was the most dangerous of the voyage. \
      Lighthouses changed that arithmetic. A fixed light on a known headland turned a dark, \
      featureless shore into a chart a navigator could read from miles offshore."),
    ("", "The earliest beacons were open fires kept burning on hilltops and towers. They were bright \
      but unsteady, hungry for fuel and easily mistaken for a farmhouse hearth. Keepers learned to \
      raise the flame higher, shelter it from rain and eventually enclose it in glass, which brought \
      its own problems of soot, heat and cracking panes in a winter gale."),
    ("Building on rock", "Many of the most famous towers stand where no builder would choose to \
      work: on tidal reefs, wave-swept stacks and ledges that are dry for only a few hours a month. \
      Masons cut interlocking granite blocks on the mainland, numbered each one and shipped them out \
      in calm spells. A season's work could be a single course of stone. The result was a tower whose \
      weight and dovetailed joints let it shrug off seas that broke clean over the lantern."),
    ("The lens", "The great leap in range came from optics rather than brighter flames. A lens built \
      from concentric prisms gathers light that would otherwise spill upward or into the ground and \
      bends it into a flat horizontal beam. Rotating the whole assembly on a bath of mercury turned \
      that beam into a sweep, and the timing of the sweep became the light's signature."),
    ("Characteristics", "Every light has a character: a pattern of flashes, occultations and colours \
      printed on the chart beside it. Two flashes every ten seconds, a long white followed by a short \
      red, a steady green over a safe channel. A navigator who counts the pattern knows which \
      headland is which, even when two lights share the same stretch of horizon."),
    ("Keepers", "Until automation, each light needed people. Keepers trimmed wicks, polished brass, \
      wound the clockwork that turned the lens and wrote the weather into the log every few hours. \
      On rock stations they lived in shifts of weeks, with relief boats delayed by storms. The work \
      was repetitive and exacting; a light that went dark for even a night could cost a ship."),
    ("Fog", "Light is useless in thick fog, so many stations also carried sound. Bells, guns, sirens \
      and later the deep two-tone diaphone each had their own code, just as the lights did. Sound \
      behaves strangely over water, fading and returning with the temperature of the air, and \
      mariners learned to treat a fog signal as a warning rather than a precise bearing."),
    ("Automation", "Electric lamps, timers and remote monitoring gradually made resident keepers \
      unnecessary. Today most lights run unattended, powered by mains or solar panels, with a \
      technician visiting a few times a year. Satellite navigation has reduced their role further, \
      yet authorities keep many of them lit because a physical light cannot be jammed or spoofed."),
    ("Preservation", "Decommissioned towers have become museums, holiday lets and bird observatories. \
      Restoring them is slow and expensive: salt works into the mortar, iron lanterns rust from the \
      inside and historic lenses must be cleaned with great care. Volunteers often do much of the \
      work, and their logbooks read a little like the keepers' logs they replaced."),
    ("Reading a chart", "On a modern chart a lighthouse is a small star with a purple flare and a line \
      of abbreviations. Those few characters encode the colour, the rhythm, the height of the light \
      above the sea and its nominal range. Learning to read them is still part of every navigation \
      course, a quiet link between satellite receivers and granite towers."),
];

/// Scroll steps from the repeating task, waiting to be applied on the next repaint.
pub struct PendingScroll {
    delta: Mutex<f32>,
    ctx: egui::Context,
}

impl PendingScroll {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            delta: Mutex::new(0.0),
            ctx,
        }
    }

    pub fn take(&self) -> f32 {
        self.delta
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or(0.0)
    }
}

impl ScrollSurface for PendingScroll {
    fn scroll_by(&self, delta: f32) {
        if let Ok(mut pending) = self.delta.lock() {
            *pending += delta;
        }
        self.ctx.request_repaint();
    }
}

/// Builds the frame source and landmark engine described by `config` and starts tracking.
///
/// A camera failure aborts startup. An engine that fails to start only disables detection.
pub fn build_tracker(config: &AppConfig) -> Result<HandTracker> {
    if config.simulate {
        info!("Simulation mode: synthetic frames and scripted hand");
        let source: Box<dyn FrameSource> =
            Box::new(SyntheticFrames::new(config.camera.width, config.camera.height));
        return HandTracker::start(source, Some(Box::new(SimulatedHand::demo())));
    }

    let source: Box<dyn FrameSource> = Box::new(CameraSource::new(config.camera.clone()));
    let detector: Option<Box<dyn LandmarkDetector>> = match MediaPipeBridge::spawn(&config.engine) {
        Ok(bridge) => Some(Box::new(bridge)),
        Err(e) => {
            error!("Landmark engine unavailable: {}", e);
            None
        }
    };
    HandTracker::start(source, detector)
}

pub struct HandScrollApp {
    config: AppConfig,
    tracker: Option<HandTracker>,
    start_error: Option<String>,
    dispatcher: ActionDispatcher,
    scroll: Arc<PendingScroll>,
    scroll_offset: f32,
    toast: Toast,
    telemetry: Telemetry,
    preview: VideoWidget,
    hand: Option<HandLandmarks>,
    theme: Theme,
}

impl HandScrollApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: tokio::runtime::Handle) -> Self {
        let theme = Theme::default();
        cc.egui_ctx.set_visuals(theme.visuals());

        let scroll = Arc::new(PendingScroll::new(cc.egui_ctx.clone()));
        let dispatcher = ActionDispatcher::new(runtime, scroll.clone());

        let mut app = Self {
            config,
            tracker: None,
            start_error: None,
            dispatcher,
            scroll,
            scroll_offset: 0.0,
            toast: Toast::default(),
            telemetry: Telemetry::default(),
            preview: VideoWidget::default(),
            hand: None,
            theme,
        };
        app.start_tracking();
        app
    }

    fn is_tracking(&self) -> bool {
        self.tracker.as_ref().is_some_and(|t| t.is_running())
    }

    fn start_tracking(&mut self) {
        if self.is_tracking() {
            return;
        }

        match build_tracker(&self.config) {
            Ok(tracker) => {
                self.tracker = Some(tracker);
                self.start_error = None;
                self.telemetry.camera_on = true;
            }
            Err(e) => {
                error!("Tracking could not start: {}", e);
                self.start_error = Some(e.to_string());
                self.telemetry.camera_on = false;
            }
        }
    }

    fn stop_tracking(&mut self, now: Instant) {
        if let Some(mut tracker) = self.tracker.take() {
            tracker.stop();
        }
        if self.dispatcher.stop() {
            self.toast.show(MSG_STOPPED, now);
        }
        self.telemetry.reset();
        self.preview.clear();
        self.hand = None;
    }

    /// One iteration of the frame loop: classify, dispatch, update presentation state.
    fn poll_tracker(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(report) = self.tracker.as_mut().and_then(|t| t.process_frame_at(now)) else {
            return;
        };

        self.telemetry.set_frame(report.fps, report.gesture);
        if let Some(message) = self.dispatcher.handle(report.gesture).message {
            self.toast.show(message, now);
        }
        if self.config.show_preview {
            self.preview.update_frame(ctx, &report.frame);
        }
        self.hand = report.landmarks;
    }

    fn render_header(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading("Hands-Based Page Navigation");
                ui.separator();

                if self.is_tracking() {
                    if ui.button("⏹ Stop camera").clicked() {
                        self.stop_tracking(now);
                    }
                } else if ui.button("▶ Start camera").clicked() {
                    self.start_tracking();
                }

                if let Some(err) = &self.start_error {
                    ui.colored_label(self.theme.error, err);
                } else if self.config.simulate {
                    ui.label(egui::RichText::new("simulation").color(self.theme.text_secondary));
                }
            });
            ui.add_space(8.0);
        });
    }

    fn render_article(&mut self, ctx: &egui::Context) {
        let delta = self.scroll.take();

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut area = egui::ScrollArea::vertical().auto_shrink([false; 2]);
            if delta != 0.0 {
                area = area.vertical_scroll_offset((self.scroll_offset + delta).max(0.0));
            }

            let output = area.show(ui, |ui| {
                ui.set_max_width(720.0);
                ui.add_space(12.0);
                ui.heading(ARTICLE_TITLE);
                for (heading, body) in ARTICLE {
                    ui.add_space(12.0);
                    if !heading.is_empty() {
                        ui.label(egui::RichText::new(*heading).size(18.0).strong());
                        ui.add_space(4.0);
                    }
                    ui.label(egui::RichText::new(*body).size(15.0).color(self.theme.text_secondary));
                }
                ui.add_space(240.0);
            });
            self.scroll_offset = output.state.offset.y;
        });
    }
}

impl eframe::App for HandScrollApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_tracker(ctx, now);

        self.render_header(ctx, now);
        self.render_article(ctx);

        ui::show_hud(ctx, &self.telemetry, &self.theme);
        if self.config.show_preview && self.is_tracking() {
            ui::show_preview(ctx, &self.preview, self.hand.as_ref(), &self.theme);
        }
        if let Some(message) = self.toast.visible(now) {
            ui::show_toast(ctx, message, &self.theme);
        }

        // Reschedule the frame loop only while tracking.
        if self.is_tracking() {
            ctx.request_repaint();
        } else if let Some(remaining) = self.toast.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Gesture;

    #[test]
    fn test_pending_scroll_accumulates_and_drains() {
        let pending = PendingScroll::new(egui::Context::default());
        pending.scroll_by(-25.0);
        pending.scroll_by(-25.0);
        assert_eq!(pending.take(), -50.0);
        assert_eq!(pending.take(), 0.0);
    }

    #[test]
    fn test_build_tracker_in_simulation_mode() {
        let config = AppConfig {
            simulate: true,
            ..AppConfig::default()
        };
        let mut tracker = build_tracker(&config).unwrap();
        assert!(tracker.has_detector());

        let report = tracker.process_frame().unwrap();
        assert_eq!(report.gesture, Gesture::None);
        assert_eq!(report.frame.width(), config.camera.width);
        tracker.stop();
    }
}
