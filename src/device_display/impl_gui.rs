use crate::device_display::interface::{DeviceDisplay, DeviceDisplayEvent, SelectOption};
use crate::device_media::interface::MediaStream;
use crate::slot::Slot;
use eframe::egui;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct SlotView {
    options: Vec<SelectOption>,
    selected: Option<String>,
    stream: Option<MediaStream>,
}

#[derive(Default)]
struct GuiState {
    slots: [SlotView; 2],
    message: Option<String>,
    event_sender: Option<Sender<DeviceDisplayEvent>>,
    closed: bool,
}

impl GuiState {
    fn emit(&self, event: DeviceDisplayEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}

pub struct DisplayWindow {
    state: Arc<Mutex<GuiState>>,
    textures: [Option<egui::TextureHandle>; 2],
    shown_frames: [Option<(String, u64)>; 2],
    repaint_interval: Duration,
}

impl DisplayWindow {
    fn show_controls(&mut self, ui: &mut egui::Ui, state: &mut GuiState) {
        ui.horizontal(|ui| {
            for slot in Slot::ALL {
                let view = &mut state.slots[slot.index()];
                let selected_text = view
                    .selected
                    .as_ref()
                    .and_then(|value| view.options.iter().find(|option| &option.value == value))
                    .map(|option| option.text.clone())
                    .unwrap_or_default();

                let mut chosen = None;
                ui.label(format!("Camera {}", slot.index() + 1));
                egui::ComboBox::from_id_source(slot.select_id())
                    .selected_text(selected_text)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for option in &view.options {
                            let is_selected = view.selected.as_deref() == Some(option.value.as_str());
                            if ui.selectable_label(is_selected, &option.text).clicked()
                                && !is_selected
                            {
                                chosen = Some(option.value.clone());
                            }
                        }
                    });

                if let Some(device_id) = chosen {
                    view.selected = Some(device_id.clone());
                    state.emit(DeviceDisplayEvent::SelectionChanged { slot, device_id });
                }
                ui.add_space(16.0);
            }

            if ui.button("Refresh").clicked() {
                state.emit(DeviceDisplayEvent::RefreshRequested);
            }
        });
    }

    fn show_video(&mut self, ui: &mut egui::Ui, slot: Slot, stream: Option<&MediaStream>) {
        let index = slot.index();
        let Some(frame) = stream.and_then(|stream| stream.latest_frame().map(|f| (stream, f)))
        else {
            self.textures[index] = None;
            self.shown_frames[index] = None;
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("No camera").color(egui::Color32::GRAY));
            });
            return;
        };
        let (stream, frame) = frame;

        let key = (stream.id().to_string(), frame.sequence);
        if self.shown_frames[index].as_ref() != Some(&key) {
            let image = egui::ColorImage::from_rgb(
                [frame.width as usize, frame.height as usize],
                &frame.rgb,
            );
            match &mut self.textures[index] {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.textures[index] = Some(ui.ctx().load_texture(
                        slot.video_id(),
                        image,
                        egui::TextureOptions::LINEAR,
                    ))
                }
            }
            self.shown_frames[index] = Some(key);
        }

        if let Some(texture) = &self.textures[index] {
            ui.add(
                egui::Image::new(texture)
                    .max_size(ui.available_size())
                    .maintain_aspect_ratio(true),
            );
        }
    }
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = self.state.clone();
        let Ok(mut state) = state.lock() else {
            return;
        };

        if ctx.input(|i| i.viewport().close_requested()) && !state.closed {
            state.closed = true;
            state.emit(DeviceDisplayEvent::CloseRequested);
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_controls(ui, &mut state);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("messages").show(ctx, |ui| {
            let message = state.message.clone().unwrap_or_default();
            ui.label(egui::RichText::new(message).color(egui::Color32::LIGHT_RED));
        });

        let streams: Vec<Option<MediaStream>> = state
            .slots
            .iter()
            .map(|view| view.stream.clone())
            .collect();
        drop(state);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                for slot in Slot::ALL {
                    let stream = streams[slot.index()].as_ref();
                    self.show_video(&mut columns[slot.index()], slot, stream);
                }
            });
        });

        ctx.request_repaint_after(self.repaint_interval);
    }
}

impl Drop for DisplayWindow {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            if !state.closed {
                state.closed = true;
                state.emit(DeviceDisplayEvent::CloseRequested);
            }
        }
    }
}

/// egui window with two camera selectors side by side above two previews.
///
/// The window has to run on the main thread, so `DeviceDisplayGui` only holds
/// the shared state; [`DeviceDisplayGui::window`] hands out the part that
/// [`run_window`] drives.
pub struct DeviceDisplayGui {
    state: Arc<Mutex<GuiState>>,
    repaint_interval: Duration,
}

impl DeviceDisplayGui {
    pub fn new(repaint_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(GuiState::default())),
            repaint_interval,
        }
    }

    pub fn window(&self) -> DisplayWindow {
        DisplayWindow {
            state: self.state.clone(),
            textures: [None, None],
            shown_frames: [None, None],
            repaint_interval: self.repaint_interval,
        }
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut GuiState) -> T,
    ) -> Result<T, Box<dyn Error + Send + Sync>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| "Display state lock poisoned")?;
        Ok(f(&mut state))
    }
}

/// Blocks until the window is closed.
pub fn run_window(
    window: DisplayWindow,
    title: &str,
    size: [f32; 2],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size(size)
            .with_min_inner_size([480.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(title, options, Box::new(|_cc| Box::new(window)))
        .map_err(|e| e.to_string().into())
}

impl DeviceDisplay for DeviceDisplayGui {
    fn set_options(
        &mut self,
        slot: Slot,
        options: &[SelectOption],
        selected: Option<&str>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| {
            let view = &mut state.slots[slot.index()];
            view.options = options.to_vec();
            view.selected = selected.map(str::to_string);
        })
    }

    fn bind_video(
        &mut self,
        slot: Slot,
        stream: Option<MediaStream>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| state.slots[slot.index()].stream = stream)
    }

    fn show_message(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| state.message = Some(message.to_string()))
    }

    fn events(&self) -> Receiver<DeviceDisplayEvent> {
        let (tx, rx) = channel();
        if let Ok(mut state) = self.state.lock() {
            state.event_sender = Some(tx);
        }
        rx
    }
}
