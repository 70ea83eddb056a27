use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "AI travel-planning assistant", long_about = None)]
pub struct Args {
    /// Natural language travel command
    pub command: Option<String>,

    /// Start an interactive planning session
    #[arg(short, long)]
    pub chat: bool,

    /// AI provider to use (mock, openai, gemini, doubao, qwen-max, qwen3, ernie, spark)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Planning scenario (itinerary, hotel, log)
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// Apply plan updates without confirmation
    #[arg(short, long)]
    pub yes: bool,
}
