use std::sync::Arc;

use iced::widget::image::{Handle, Image};
use iced::widget::{Column, button, column, container, pick_list, row, scrollable, slider, text};
use iced::{Element, Font, Length, Task, Theme};
use rfd::AsyncFileDialog;
use tracing::{info, warn};

use super::message::{Message, Upload};
use super::widgets::{layout, notice, report_card};
use crate::config::{API_KEY_ENV, Settings};
use crate::detection::DetectionReport;
use crate::models::{ConfidenceThreshold, Configuration, ModelId};
use crate::pipeline::{Interaction, Pipeline};

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const USAGE: &str = "\
How to use:
  1. Choose the model in the sidebar
  2. Adjust the confidence threshold if needed
  3. Upload an image of an old manuscript
  4. Inspect the detected iron-gall ink regions

About:
Iron-gall ink was in common use from the Middle Ages until the 20th century \
and can degrade paper over time. This tool uses a hosted detection model to \
locate areas written with it.";

pub struct FerroscanApp {
    state: AppState,
}

enum AppState {
    Ready(Box<Workspace>),
    /// Startup failed (e.g. no credential); nothing can be analyzed
    Fatal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Idle,
    Analyzing,
}

struct Workspace {
    pipeline: Arc<Pipeline>,
    models: Vec<ModelId>,
    config: Configuration,
    upload: Option<Upload>,
    original: Option<Handle>,
    interaction: Option<Interaction>,
    annotated: Option<Handle>,
    raw_json: Option<String>,
    status: Status,
    run: u64,
    error: Option<String>,
    show_raw: bool,
    show_help: bool,
}

impl FerroscanApp {
    pub fn new(settings: Settings, pipeline: Result<Arc<Pipeline>, String>) -> Self {
        let state = match (pipeline, settings.default_configuration()) {
            (Ok(pipeline), Ok(config)) => AppState::Ready(Box::new(Workspace {
                pipeline,
                models: settings.models.clone(),
                config,
                upload: None,
                original: None,
                interaction: None,
                annotated: None,
                raw_json: None,
                status: Status::Idle,
                run: 0,
                error: None,
                show_raw: false,
                show_help: true,
            })),
            (Err(e), _) => AppState::Fatal(e),
            (_, Err(e)) => AppState::Fatal(e.to_string()),
        };
        Self { state }
    }

    pub fn title(&self) -> String {
        "Iron-gall ink detection".to_string()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match &mut self.state {
            AppState::Ready(workspace) => workspace.update(message),
            AppState::Fatal(_) => Task::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        match &self.state {
            AppState::Ready(workspace) => layout(workspace.sidebar(), workspace.main()),
            AppState::Fatal(message) => fatal_view(message),
        }
    }
}

impl Workspace {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => Task::perform(
                async {
                    let handle = AsyncFileDialog::new()
                        .set_title("Choose a manuscript image")
                        .add_filter("Images (JPG, JPEG, PNG)", &ACCEPTED_EXTENSIONS)
                        .pick_file()
                        .await?;
                    let bytes = handle.read().await;
                    Some(Upload {
                        name: handle.file_name(),
                        bytes: Arc::new(bytes),
                    })
                },
                Message::ImagePicked,
            ),
            Message::ImagePicked(None) => Task::none(),
            Message::ImagePicked(Some(upload)) => {
                info!(file = %upload.name, bytes = upload.bytes.len(), "image selected");
                self.original = Some(Handle::from_bytes(upload.bytes.as_ref().clone()));
                self.upload = Some(upload);
                self.clear_results();
                self.show_help = false;
                self.start_analysis()
            }
            Message::ModelSelected(model) => {
                if model == self.config.model_id {
                    return Task::none();
                }
                self.config.model_id = model;
                if self.upload.is_some() {
                    self.clear_results();
                    self.start_analysis()
                } else {
                    Task::none()
                }
            }
            Message::ThresholdChanged(value) => {
                // Slider values can carry float noise past two decimals
                let rounded = (value / ConfidenceThreshold::STEP).round() * ConfidenceThreshold::STEP;
                match ConfidenceThreshold::new(rounded.clamp(0.0, 1.0)) {
                    Ok(threshold) => {
                        self.config.confidence_threshold = threshold;
                        if let Some(interaction) = &mut self.interaction {
                            if let Err(e) = self.pipeline.rethreshold(interaction, threshold) {
                                warn!("could not refresh debug output: {e}");
                            }
                            self.annotated = Some(annotated_handle(interaction));
                        }
                    }
                    Err(e) => warn!("ignored threshold change: {e}"),
                }
                Task::none()
            }
            Message::AnalysisFinished(run, _) if run != self.run => Task::none(),
            Message::AnalysisFinished(_, result) => {
                self.status = Status::Idle;
                match result {
                    Ok(interaction) => {
                        let mut interaction = Arc::unwrap_or_clone(interaction);
                        // The slider may have moved while the call was in flight
                        if interaction.analysis.threshold != self.config.confidence_threshold {
                            if let Err(e) = self
                                .pipeline
                                .rethreshold(&mut interaction, self.config.confidence_threshold)
                            {
                                warn!("could not refresh debug output: {e}");
                            }
                        }
                        self.annotated = Some(annotated_handle(&interaction));
                        self.raw_json = Some(
                            serde_json::to_string_pretty(&interaction.response.raw)
                                .unwrap_or_else(|e| format!("<unprintable response: {e}>")),
                        );
                        self.interaction = Some(interaction);
                    }
                    Err(e) => {
                        warn!("analysis failed: {e}");
                        self.error = Some(e);
                    }
                }
                Task::none()
            }
            Message::ToggleRawJson => {
                self.show_raw = !self.show_raw;
                Task::none()
            }
            Message::ToggleHelp => {
                self.show_help = !self.show_help;
                Task::none()
            }
            Message::DismissError => {
                self.error = None;
                Task::none()
            }
        }
    }

    fn clear_results(&mut self) {
        self.interaction = None;
        self.annotated = None;
        self.raw_json = None;
        self.error = None;
        self.show_raw = false;
    }

    fn start_analysis(&mut self) -> Task<Message> {
        let Some(upload) = self.upload.clone() else {
            return Task::none();
        };

        self.run += 1;
        self.status = Status::Analyzing;

        let run = self.run;
        let pipeline = Arc::clone(&self.pipeline);
        let config = self.config.clone();
        Task::perform(
            async move {
                pipeline
                    .run(&upload.bytes, &config)
                    .await
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            },
            move |result| Message::AnalysisFinished(run, result),
        )
    }

    fn sidebar(&self) -> Element<'_, Message> {
        let threshold = self.config.confidence_threshold;

        column![
            text("Connected to Roboflow").size(14),
            text("Configuration").size(22),
            text("Roboflow model"),
            pick_list(
                self.models.as_slice(),
                Some(&self.config.model_id),
                Message::ModelSelected,
            )
            .width(Length::Fill),
            text(format!("Confidence threshold: {threshold}")),
            slider(0.0..=1.0, threshold.value(), Message::ThresholdChanged)
                .step(ConfidenceThreshold::STEP),
            text("Detections below this threshold are hidden").size(12),
            notice(format!(
                "Active model:\n{}\n\nThreshold: {threshold}",
                self.config.model_id
            )),
        ]
        .spacing(12)
        .padding(15)
        .into()
    }

    fn main(&self) -> Element<'_, Message> {
        let upload_button = if self.status == Status::Analyzing {
            button("Choose an image...")
        } else {
            button("Choose an image...").on_press(Message::PickImage)
        };

        let mut content = Column::new()
            .spacing(16)
            .push(text("Iron-gall ink detection").size(32))
            .push(text("Upload an image").size(22))
            .push(
                row![
                    upload_button,
                    text("Accepted formats: JPG, JPEG, PNG").size(12),
                ]
                .spacing(16),
            );

        if let Some(error) = &self.error {
            content = content.push(
                container(
                    column![
                        text(format!("Analysis failed: {error}")),
                        text("Check that the API key and the selected model are correct.").size(12),
                        button("Dismiss").on_press(Message::DismissError),
                    ]
                    .spacing(8),
                )
                .padding(10)
                .width(Length::Fill)
                .style(container::danger),
            );
        }

        match &self.upload {
            None => {
                content = content.push(notice("Upload an image to start the analysis"));
                content = content.push(button("How to use this application").on_press(Message::ToggleHelp));
                if self.show_help {
                    content = content.push(notice(USAGE));
                }
            }
            Some(upload) => {
                content = content.push(self.images(upload));
                content = content.push(self.results());
            }
        }

        scrollable(content).into()
    }

    fn images<'a>(&'a self, upload: &'a Upload) -> Element<'a, Message> {
        let original: Element<'a, Message> = match &self.original {
            Some(handle) => Image::new(handle.clone()).width(Length::Fill).into(),
            None => text("No preview").into(),
        };
        let annotated: Element<'a, Message> = match (&self.annotated, self.status) {
            (_, Status::Analyzing) => text("Analyzing...").into(),
            (Some(handle), Status::Idle) => Image::new(handle.clone()).width(Length::Fill).into(),
            (None, Status::Idle) => text("No detections to show").into(),
        };

        row![
            column![text(format!("Original image ({})", upload.name)).size(18), original]
                .spacing(8)
                .width(Length::FillPortion(1)),
            column![text("Detections").size(18), annotated]
                .spacing(8)
                .width(Length::FillPortion(1)),
        ]
        .spacing(20)
        .into()
    }

    fn results(&self) -> Element<'_, Message> {
        let Some(interaction) = &self.interaction else {
            return Column::new().into();
        };
        let analysis = &interaction.analysis;

        let mut results = Column::new()
            .spacing(10)
            .push(text(analysis.report.headline()).size(22));

        if analysis.report.is_empty() {
            results = results.push(notice(DetectionReport::empty_notice(analysis.threshold)));
        } else {
            let cards = analysis.report.entries.iter().map(|entry| report_card(entry));
            results = results.push(Column::with_children(cards).spacing(8));
        }

        let toggle_label = if self.show_raw { "Hide raw JSON" } else { "Show raw JSON" };
        results = results.push(button(toggle_label).on_press(Message::ToggleRawJson));
        if self.show_raw {
            if let Some(raw) = &self.raw_json {
                results = results.push(
                    container(text(raw.as_str()).font(Font::MONOSPACE).size(12))
                        .padding(10)
                        .width(Length::Fill)
                        .style(container::bordered_box),
                );
            }
        }

        results.into()
    }
}

fn annotated_handle(interaction: &Interaction) -> Handle {
    let annotated = &interaction.analysis.annotated;
    let rgba = image::DynamicImage::ImageRgb8(annotated.clone()).into_rgba8();
    Handle::from_rgba(annotated.width(), annotated.height(), rgba.into_raw())
}

fn fatal_view(message: &str) -> Element<'_, Message> {
    container(
        column![
            text("Iron-gall ink detection").size(32),
            text(message),
            text(format!(
                "Set {API_KEY_ENV} in the environment or `api_key` in {}",
                Settings::settings_path().display()
            ))
            .size(14),
        ]
        .spacing(20)
        .padding(20),
    )
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
