use std::sync::Arc;

use crate::models::ModelId;
use crate::pipeline::Interaction;

/// Image file chosen by the user.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Arc<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub enum Message {
    PickImage,
    ImagePicked(Option<Upload>),
    ModelSelected(ModelId),
    ThresholdChanged(f64),
    /// Tagged with the run number so late results from a superseded run are dropped
    AnalysisFinished(u64, Result<Arc<Interaction>, String>),
    ToggleRawJson,
    ToggleHelp,
    DismissError,
}
