use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use countdown_core::{CountdownTask, RunningTask, ScreenBinding, ScreenState};
use eframe::egui;

const COUNTDOWN_BOUND: u32 = 10;
const NOTICE_DURATION: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(about = "Single-screen countdown demo contrasting owning and weak task bindings")]
struct Args {
    /// How a started countdown reaches back to the screen: `weak`
    /// re-resolves a non-owning reference before each UI update, `owning`
    /// holds the screen alive for the task's whole run.
    #[arg(long, value_enum, default_value_t = BindingChoice::Weak)]
    task_binding: BindingChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BindingChoice {
    Weak,
    Owning,
}

impl BindingChoice {
    fn bind(self, screen: &Arc<ScreenState>) -> ScreenBinding {
        match self {
            BindingChoice::Weak => ScreenBinding::weak(screen),
            BindingChoice::Owning => ScreenBinding::owning(screen),
        }
    }

    fn label(self) -> &'static str {
        match self {
            BindingChoice::Weak => "weak",
            BindingChoice::Owning => "owning",
        }
    }
}

struct CountdownApp {
    screen: Arc<ScreenState>,
    running: Vec<RunningTask>,
    task_binding: BindingChoice,
    status: String,
}

impl CountdownApp {
    fn new(task_binding: BindingChoice) -> Self {
        Self {
            screen: Arc::new(ScreenState::new()),
            running: Vec::new(),
            task_binding,
            status: format!("Ready ({} binding)", task_binding.label()),
        }
    }

    fn start_countdown(&mut self) {
        let binding = self.task_binding.bind(&self.screen);
        self.running
            .push(CountdownTask::new(binding, COUNTDOWN_BOUND).execute());
        self.status = format!("Counting down ({} binding)", self.task_binding.label());
    }

    fn pump_tasks(&mut self) {
        self.running.retain_mut(|task| !task.pump());
        if self.running.is_empty() && self.status.starts_with("Counting") {
            self.status = format!("Ready ({} binding)", self.task_binding.label());
        }
    }

    fn show_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(16.0);
                ui.heading("Countdown");
                ui.add_space(12.0);

                let start = egui::Button::new(egui::RichText::new("Start").strong())
                    .min_size(egui::vec2(120.0, 32.0));
                if ui.add(start).clicked() {
                    self.start_countdown();
                }

                ui.add_space(12.0);

                let snapshot = self.screen.snapshot();
                if snapshot.indicator_visible {
                    ui.add(
                        egui::ProgressBar::new(f32::from(snapshot.progress) / 100.0)
                            .desired_width(220.0)
                            .show_percentage(),
                    );
                }

                if let Some(notice) = snapshot.notice {
                    if notice.shown_at.elapsed() >= NOTICE_DURATION {
                        self.screen.dismiss_notice();
                    } else {
                        ui.add_space(8.0);
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgb(48, 84, 56))
                            .rounding(8.0)
                            .inner_margin(egui::Margin::symmetric(10, 8))
                            .show(ui, |ui| {
                                ui.label(
                                    egui::RichText::new(&notice.text).color(egui::Color32::WHITE),
                                );
                            });
                    }
                }
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.small("Status:");
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
        });
    }
}

impl eframe::App for CountdownApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_tasks();
        self.show_screen(ctx);
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl Drop for CountdownApp {
    fn drop(&mut self) {
        self.screen.begin_teardown();
        // Anything above 1 is a task handle still holding the screen.
        let retained_by_tasks = Arc::strong_count(&self.screen) - 1;
        if retained_by_tasks > 0 {
            tracing::warn!(
                retained_by_tasks,
                "screen state is still owned by running task handles at teardown"
            );
        } else {
            tracing::info!("screen state released at teardown");
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Countdown Demo")
            .with_inner_size([380.0, 260.0])
            .with_min_inner_size([320.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Countdown Demo",
        options,
        Box::new(move |_cc| Ok(Box::new(CountdownApp::new(args.task_binding)))),
    )
}
