//! Library Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{LibraryStory, StoryLibraryPort};
use crate::application::queries::library_queries::*;
use crate::domain::partition;
use crate::domain::story::{ImageRef, Slide};

/// 把故事库中的故事转换为固定数量的幻灯片
///
/// 第 i 段文本对应第 i 张插图；插图不足时使用占位图
pub fn library_slides(story: &LibraryStory, slide_count: usize, asset_prefix: &str) -> Vec<Slide> {
    let prefix = asset_prefix.trim_end_matches('/');
    partition(&story.text, slide_count)
        .into_iter()
        .enumerate()
        .map(|(i, paragraph)| {
            let image = story
                .image_paths
                .get(i)
                .map(|path| ImageRef::url(format!("{}/{}", prefix, path)))
                .unwrap_or_else(ImageRef::placeholder);
            Slide::new(paragraph, image, None)
        })
        .collect()
}

/// ListStories Handler
pub struct ListStoriesHandler {
    library: Arc<dyn StoryLibraryPort>,
}

impl ListStoriesHandler {
    pub fn new(library: Arc<dyn StoryLibraryPort>) -> Self {
        Self { library }
    }

    pub async fn handle(&self, _query: ListStories) -> Result<Vec<String>, ApplicationError> {
        Ok(self.library.list().await?)
    }
}

/// GetLibraryStory Handler
pub struct GetLibraryStoryHandler {
    library: Arc<dyn StoryLibraryPort>,
    slide_count: usize,
    asset_prefix: String,
}

impl GetLibraryStoryHandler {
    pub fn new(
        library: Arc<dyn StoryLibraryPort>,
        slide_count: usize,
        asset_prefix: impl Into<String>,
    ) -> Self {
        Self {
            library,
            slide_count,
            asset_prefix: asset_prefix.into(),
        }
    }

    pub async fn handle(&self, query: GetLibraryStory) -> Result<LibraryStoryView, ApplicationError> {
        let story = self.library.read(&query.name).await?;
        let slides = library_slides(&story, self.slide_count, &self.asset_prefix);

        Ok(LibraryStoryView {
            name: story.name,
            slides,
        })
    }
}
