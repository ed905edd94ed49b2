//! Grounded chat over a district's stored knowledge.

use crate::cli::ChatArgs;
use crate::error::Result;
use crate::output::Formatter;
use pragati_extractor::ChatService;
use pragati_llm::CompletionsClient;
use pragati_store::SqliteStore;

/// Execute the chat command.
pub async fn execute_chat(
    args: ChatArgs,
    chat: &ChatService<CompletionsClient, SqliteStore>,
    _formatter: &Formatter,
) -> Result<()> {
    let answer = chat
        .ask(
            &args.district,
            &args.question,
            args.sector.as_deref(),
            args.sub_category.as_deref(),
        )
        .await?;
    println!("{}", answer);
    Ok(())
}
