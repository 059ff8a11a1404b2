use std::sync::Arc;

use crate::domain::model::ModelRef;
use crate::domain::ports::Predictor;

/// Shared state available to the relay handlers via `State<AppState>`.
///
/// Cheaply cloneable; the predictor is constructed once at startup and
/// injected here.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    /// Model every job is submitted to.
    pub model: Arc<ModelRef>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, model: ModelRef) -> Self {
        Self {
            predictor,
            model: Arc::new(model),
        }
    }
}
