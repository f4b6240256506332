//! Slideshow Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SessionManagerPort;
use crate::application::queries::slideshow_queries::GetCurrentSlide;
use crate::domain::slideshow::SlideView;

/// GetCurrentSlide Handler
pub struct GetCurrentSlideHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl GetCurrentSlideHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub fn handle(&self, query: GetCurrentSlide) -> Result<SlideView, ApplicationError> {
        Ok(self.session_manager.render(&query.session_id)?)
    }
}
