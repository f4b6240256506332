//! File Story Library - 文件系统故事库
//!
//! 目录结构:
//! {base_dir}/{story_name}/story.txt
//! {base_dir}/{story_name}/image_1.png .. image_N.png

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{LibraryError, LibraryStory, StoryLibraryPort};

const STORY_FILE: &str = "story.txt";

/// 文件系统故事库
pub struct FileStoryLibrary {
    /// 故事库根目录
    base_dir: PathBuf,
    /// 每个故事要求的插图数量
    slide_count: usize,
}

impl FileStoryLibrary {
    pub fn new(base_dir: impl AsRef<Path>, slide_count: usize) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            slide_count,
        }
    }

    fn image_name(index: usize) -> String {
        format!("image_{}.png", index)
    }

    /// 有效故事：目录中包含 story.txt 以及全部 image_i.png
    async fn is_valid_story(&self, dir: &Path) -> bool {
        if !is_file(&dir.join(STORY_FILE)).await {
            return false;
        }
        for i in 1..=self.slide_count {
            if !is_file(&dir.join(Self::image_name(i))).await {
                return false;
            }
        }
        true
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(&['/', '\\'][..])
}

#[async_trait]
impl StoryLibraryPort for FileStoryLibrary {
    async fn list(&self) -> Result<Vec<String>, LibraryError> {
        if !fs::try_exists(&self.base_dir).await.unwrap_or(false) {
            tracing::warn!(dir = %self.base_dir.display(), "Story library directory does not exist");
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| LibraryError::IoError(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LibraryError::IoError(e.to_string()))?
        {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            let path = entry.path();
            if !is_dir || !self.is_valid_story(&path).await {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<LibraryStory, LibraryError> {
        let dir = self.base_dir.join(name);
        if !is_plain_name(name) || !self.is_valid_story(&dir).await {
            return Err(LibraryError::NotFound(name.to_string()));
        }

        let story_path = dir.join(STORY_FILE);
        let text = fs::read_to_string(&story_path).await.map_err(|e| {
            tracing::error!(path = %story_path.display(), error = %e, "Could not read story file");
            LibraryError::ReadError(e.to_string())
        })?;

        let image_paths = (1..=self.slide_count)
            .map(|i| format!("{}/{}", name, Self::image_name(i)))
            .collect();

        Ok(LibraryStory {
            name: name.to_string(),
            text,
            image_paths,
        })
    }

    async fn save(&self, folder: &str, text: &str) -> Result<PathBuf, LibraryError> {
        if !is_plain_name(folder) {
            return Err(LibraryError::IoError(format!("Invalid story folder: {}", folder)));
        }

        let dir = self.base_dir.join(folder);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| LibraryError::IoError(e.to_string()))?;

        let story_path = dir.join(STORY_FILE);
        fs::write(&story_path, text)
            .await
            .map_err(|e| LibraryError::IoError(e.to_string()))?;

        tracing::info!(path = %story_path.display(), size = text.len(), "Story saved");

        Ok(story_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_story(root: &Path, name: &str, images: usize) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(STORY_FILE), "Title: Test\nOnce upon a time.").unwrap();
        for i in 1..=images {
            std::fs::write(dir.join(format!("image_{}.png", i)), b"png").unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_only_complete_stories_sorted() {
        let dir = TempDir::new().unwrap();
        write_story(dir.path(), "zebra_dreams", 5);
        write_story(dir.path(), "apple_moon", 5);
        write_story(dir.path(), "missing_image", 4);
        std::fs::write(dir.path().join("notes.txt"), "not a story").unwrap();

        let library = FileStoryLibrary::new(dir.path(), 5);
        let names = library.list().await.unwrap();
        assert_eq!(names, vec!["apple_moon", "zebra_dreams"]);
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let library = FileStoryLibrary::new(dir.path().join("nope"), 5);
        assert!(library.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_story() {
        let dir = TempDir::new().unwrap();
        write_story(dir.path(), "apple_moon", 2);

        let library = FileStoryLibrary::new(dir.path(), 2);
        let story = library.read("apple_moon").await.unwrap();
        assert_eq!(story.name, "apple_moon");
        assert!(story.text.contains("Once upon a time."));
        assert_eq!(
            story.image_paths,
            vec!["apple_moon/image_1.png", "apple_moon/image_2.png"]
        );
    }

    #[tokio::test]
    async fn test_read_invalid_story_is_not_found() {
        let dir = TempDir::new().unwrap();
        write_story(dir.path(), "half_done", 1);

        let library = FileStoryLibrary::new(dir.path(), 5);
        assert!(matches!(
            library.read("half_done").await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.read("../etc").await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.read("never_written").await,
            Err(LibraryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_story_file_must_be_a_file() {
        let dir = TempDir::new().unwrap();
        write_story(dir.path(), "odd_story", 2);
        let story = dir.path().join("odd_story").join(STORY_FILE);
        std::fs::remove_file(&story).unwrap();
        std::fs::create_dir(&story).unwrap();

        let library = FileStoryLibrary::new(dir.path(), 2);
        assert!(library.list().await.unwrap().is_empty());
        assert!(matches!(
            library.read("odd_story").await,
            Err(LibraryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_creates_folder() {
        let dir = TempDir::new().unwrap();
        let library = FileStoryLibrary::new(dir.path(), 5);

        let path = library.save("the_sleepy_fox", "Title: The Sleepy Fox").await.unwrap();
        assert_eq!(path, dir.path().join("the_sleepy_fox").join("story.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Title: The Sleepy Fox");

        assert!(library.save("../escape", "x").await.is_err());
    }
}
