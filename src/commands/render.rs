//! Plain-text views of store and API data.

use chatgrid::metrics::TurnComparison;
use chatgrid::models::{Conversation, Message, ModelStat};
use chatgrid::registry;
use chatgrid::service::{DispatchReport, ModelOutcome};

pub fn message(msg: &Message) {
    let who = match msg.author.model_id() {
        Some(id) => registry::display_name(id).to_string(),
        None => "You".to_string(),
    };
    println!("── {who} · {}", msg.timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!("{}", msg.content);
    if let Some(m) = msg.metrics {
        println!(
            "   {:.2}s · {} words · {:.1} tok/s",
            m.response_secs(),
            m.word_count,
            m.tokens_per_second
        );
    }
    println!();
}

pub fn conversation(conv: &Conversation) {
    println!(
        "Conversation {} ({}), {} messages",
        conv.id,
        registry::display_name(&conv.ai_model),
        conv.messages.len()
    );
    println!();
    for msg in &conv.messages {
        message(msg);
    }
    comparison(&conv.messages);
}

pub fn conversation_line(conv: &Conversation, active: bool) {
    let marker = if active { "*" } else { " " };
    let title = conv.title().unwrap_or("New Session");
    let title: String = if title.chars().count() > 50 {
        format!("{}…", title.chars().take(50).collect::<String>())
    } else {
        title.to_string()
    };
    println!(
        "{marker} {}  {}  {:>3} msgs  {title}",
        conv.id,
        conv.updated_at.format("%Y-%m-%d %H:%M"),
        conv.messages.len()
    );
}

pub fn report(report: &DispatchReport) {
    for result in &report.results {
        match &result.outcome {
            ModelOutcome::Responded(msg) => message(msg),
            ModelOutcome::Failed { error, .. } => {
                println!("── {} failed: {error}", registry::display_name(&result.model_id));
                println!();
            }
            ModelOutcome::Discarded => {}
        }
    }
}

/// Side-by-side metrics for the latest turn, when two or more models answered.
pub fn comparison(messages: &[Message]) {
    let Some(cmp) = TurnComparison::latest(messages) else {
        return;
    };
    println!("{:<18} {:>10} {:>8} {:>10}", "Model", "Time (s)", "Words", "Tok/s");
    for entry in &cmp.entries {
        println!(
            "{:<18} {:>10.2} {:>8} {:>10.1}",
            entry.display_name, entry.response_secs, entry.word_count, entry.tokens_per_second
        );
    }
    if let (Some(fastest), Some(detailed)) = (cmp.fastest(), cmp.most_detailed()) {
        println!("Fastest: {} · Most detailed: {}", fastest.display_name, detailed.display_name);
    }
}

pub fn model_stats(title: &str, stats: &[ModelStat]) {
    println!("{title}");
    if stats.is_empty() {
        println!("  (no data yet)");
        return;
    }
    println!(
        "  {:<18} {:>8} {:>12} {:>10} {:>10}",
        "Model", "Msgs", "Avg ms", "Avg words", "Tok/s"
    );
    for s in stats {
        let name = if s.display_name.is_empty() {
            registry::display_name(&s.model_id)
        } else {
            s.display_name.as_str()
        };
        println!(
            "  {:<18} {:>8} {:>12.0} {:>10.1} {:>10.1}",
            name, s.message_count, s.avg_response_time, s.avg_word_count, s.avg_tokens_per_second
        );
    }
}
