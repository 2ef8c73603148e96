use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::detection::{self, Analysis, OverlayRenderer};
use crate::error::{Error, Result};
use crate::inference::{InferenceClient, InferenceResponse};
use crate::models::{ConfidenceThreshold, Configuration, ModelId};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context shared by every interaction run through a pipeline
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Everything produced by one upload.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub model_id: ModelId,
    /// Image as sent to the detector
    pub original: RgbImage,
    pub response: InferenceResponse,
    pub analysis: Analysis,
}

impl Interaction {
    /// Re-filter, re-render and re-summarize with a new threshold, without another network call.
    pub fn rethreshold(&mut self, renderer: &OverlayRenderer, threshold: ConfidenceThreshold) {
        self.analysis = detection::analyze(
            renderer,
            &self.original,
            &self.response.predictions,
            threshold,
        );
    }
}

/// Upload → inference → filter → render → summarize.
pub struct Pipeline {
    client: Arc<dyn InferenceClient>,
    renderer: OverlayRenderer,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self {
            client,
            renderer: OverlayRenderer::default(),
            context: PipelineContext::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: OverlayRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(Error::Config(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    /// Run one interaction on an uploaded image file's bytes.
    ///
    /// The upload is stored in a temporary file for the duration of the call;
    /// the file is removed on every exit path. A malformed response fails the
    /// whole interaction before anything is drawn. Decoding, encoding and
    /// drawing run on the blocking pool.
    pub async fn run(&self, upload: &[u8], config: &Configuration) -> Result<Interaction> {
        let bytes = upload.to_vec();
        let temp = tokio::task::spawn_blocking(move || stage_upload(&bytes)).await??;

        let raw = self
            .client
            .infer(temp.path(), &config.model_id)
            .await
            .inspect_err(|e| warn!("inference failed: {e}"))?;
        let response = InferenceResponse::from_json(raw)
            .inspect_err(|e| warn!("rejected detector response: {e}"))?;

        let renderer = self.renderer.clone();
        let debug = self.context.debug.clone();
        let threshold = config.confidence_threshold;
        let render = move || -> Result<(RgbImage, Analysis, InferenceResponse)> {
            // Draw on exactly the pixels the detector saw
            let original = image::open(temp.path())?.to_rgb8();
            drop(temp);

            let analysis =
                detection::analyze(&renderer, &original, &response.predictions, threshold);
            save_debug_output(debug.as_ref(), &original, &analysis)?;
            Ok((original, analysis, response))
        };
        let (original, analysis, response) = tokio::task::spawn_blocking(render).await??;

        info!(
            model = %config.model_id,
            received = response.predictions.len(),
            shown = analysis.filtered.len(),
            "interaction complete"
        );

        Ok(Interaction {
            model_id: config.model_id.clone(),
            original,
            response,
            analysis,
        })
    }

    /// Re-threshold an interaction from this pipeline, refreshing debug output if enabled.
    pub fn rethreshold(&self, interaction: &mut Interaction, threshold: ConfidenceThreshold) -> Result<()> {
        interaction.rethreshold(&self.renderer, threshold);
        save_debug_output(
            self.context.debug.as_ref(),
            &interaction.original,
            &interaction.analysis,
        )
    }
}

/// Decode the upload and store it as JPEG in a temporary file that is removed on drop.
fn stage_upload(upload: &[u8]) -> Result<NamedTempFile> {
    let decoded = image::load_from_memory(upload)?;
    debug!(width = decoded.width(), height = decoded.height(), "decoded upload");

    let temp = tempfile::Builder::new()
        .prefix("ferroscan-")
        .suffix(".jpg")
        .tempfile()?;
    DynamicImage::ImageRgb8(decoded.to_rgb8()).save_with_format(temp.path(), ImageFormat::Jpeg)?;
    debug!(path = ?temp.path(), "stored upload in temporary file");
    Ok(temp)
}

/// Save debug output if debug mode is enabled
fn save_debug_output(debug: Option<&DebugConfig>, original: &RgbImage, analysis: &Analysis) -> Result<()> {
    let Some(debug_config) = debug else {
        return Ok(());
    };

    let input_path = debug_config.output_dir.join("00_input.png");
    let annotated_path = debug_config.output_dir.join("01_annotated.png");
    original.save(&input_path)?;
    analysis.annotated.save(&annotated_path)?;
    debug!("saved debug images to {:?}", debug_config.output_dir);
    Ok(())
}
