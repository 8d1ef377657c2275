use crate::error::{Error, Result};
use crate::ir::SequenceModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Json5,
}

pub fn parse_model(input: &str) -> Result<SequenceModel> {
    parse_model_with_format(input).map(|(model, _)| model)
}

/// Strict JSON is tried first; JSON5 covers hand-written models with comments and trailing
/// commas.
pub fn parse_model_with_format(input: &str) -> Result<(SequenceModel, ModelFormat)> {
    if let Ok(model) = serde_json::from_str::<SequenceModel>(input) {
        return Ok((model, ModelFormat::Json));
    }
    json5::from_str::<SequenceModel>(input)
        .map(|model| (model, ModelFormat::Json5))
        .map_err(|err| Error::ModelParse {
            format: "json5",
            message: err.to_string(),
        })
}
