//! generate-story - 离线生成一篇睡前故事并写入故事库
//!
//! 读取与服务相同的配置；故事写入 {library.assets_dir}/{folder}/story.txt，
//! 插图需另行放入同一目录（image_1.png .. image_N.png）后故事才会出现在列表中

use storytime::application::ports::{ChatRequest, GenerationApiPort, StoryLibraryPort};
use storytime::config::load_config;
use storytime::domain::story::{extract_title, folder_name_for};
use storytime::infrastructure::adapters::{FileStoryLibrary, OpenAiClient, OpenAiClientConfig};

const SYSTEM_PROMPT: &str =
    "You are a creative storyteller specializing in children's bedtime stories.";

const STORY_PROMPT: &str = "Write a short, happy, and imaginative bedtime story suitable for a young child (around 3-6 years old). \
     The story should be about 5-7 paragraphs long. \
     Start the story with a clear title line like 'Title: The Magical Starfish'. \
     The story should have a gentle and calming tone, ending on a positive note encouraging sleep.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if !config.openai.has_api_key() {
        anyhow::bail!(
            "OPENAI_API_KEY is not set; export it (or set openai.api_key) before running"
        );
    }

    let client = OpenAiClient::new(OpenAiClientConfig {
        base_url: config.openai.base_url.clone(),
        api_key: config.openai.api_key.clone(),
        chat_model: config.openai.chat_model.clone(),
        image_model: config.openai.image_model.clone(),
        image_size: config.openai.image_size.clone(),
        timeout_secs: config.openai.timeout_secs,
    })?;

    tracing::info!(model = %config.openai.chat_model, "Generating story");

    let story_text = client
        .complete_chat(ChatRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: STORY_PROMPT.to_string(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        })
        .await?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!("No story content received from OpenAI"))?;

    let title = extract_title(&story_text);
    let folder = folder_name_for(&title);
    tracing::info!(title = %title, folder = %folder, "Story generated");

    let library = FileStoryLibrary::new(&config.library.assets_dir, config.story.slide_count);
    let path = library.save(&folder, &story_text).await?;

    tracing::info!(path = %path.display(), "Story saved");

    Ok(())
}
