//! Story Library Adapter - 文件系统故事库

mod file_story_library;

pub use file_story_library::FileStoryLibrary;
