use chatgrid::errors::AppError;
use chatgrid::models::FeedbackKind;
use chatgrid::prompt::{self, Strength};
use chatgrid::registry;

use super::{render, App};

pub async fn remote_list(app: &App) -> Result<(), AppError> {
    app.require_login()?;
    let conversations = app.account.guard(app.api.list_conversations().await)?;
    if conversations.is_empty() {
        println!("No conversations on the server.");
    }
    for conv in &conversations {
        render::conversation_line(conv, false);
    }
    Ok(())
}

pub async fn remote_show(app: &App, id: &str) -> Result<(), AppError> {
    app.require_login()?;
    let conv = app.account.guard(app.api.get_conversation(id).await)?;
    render::conversation(&conv);
    Ok(())
}

pub async fn remote_create(app: &App, model: &str) -> Result<(), AppError> {
    app.require_login()?;
    registry::find(model).ok_or_else(|| AppError::UnknownModel { model_id: model.to_string() })?;
    match app.account.guard(app.api.create_conversation(model).await)? {
        Some(conv) => println!("Created conversation {}", conv.id),
        None => println!("Conversation created (server returned no body)."),
    }
    Ok(())
}

pub async fn remote_delete(app: &App, id: &str) -> Result<(), AppError> {
    app.require_login()?;
    app.account.guard(app.api.delete_conversation(id).await)?;
    println!("Deleted conversation {id} on the server.");
    Ok(())
}

pub async fn analytics(app: &App) -> Result<(), AppError> {
    app.require_login()?;
    let stats = app.account.guard(app.api.personal_analytics().await)?;
    render::model_stats("Your models", &stats.model_stats);
    if !stats.activity_trend.is_empty() {
        println!();
        println!("Activity");
        for day in &stats.activity_trend {
            println!(
                "  {:<12} {:>6} msgs {:>10.0} ms avg",
                day.date, day.message_count, day.avg_response_time
            );
        }
    }
    Ok(())
}

pub async fn leaderboard(app: &App) -> Result<(), AppError> {
    app.require_login()?;
    let board = app.account.guard(app.api.leaderboard().await)?;
    render::model_stats("Fastest", &board.top_by_speed);
    println!();
    render::model_stats("Most used", &board.top_by_volume);
    println!();
    render::model_stats("Most efficient", &board.top_by_efficiency);
    if !board.usage_trends.is_empty() {
        println!();
        println!("Usage");
        for trend in &board.usage_trends {
            let split: Vec<String> = trend
                .model_counts
                .iter()
                .map(|(id, n)| format!("{}={n}", registry::display_name(id)))
                .collect();
            println!("  {:<12} {:>6}  {}", trend.date, trend.total_count, split.join(" "));
        }
    }
    Ok(())
}

pub async fn optimize(app: &App, text: &str) -> Result<(), AppError> {
    app.require_login()?;
    let analysis = app.account.guard(app.support.optimize_prompt(text).await)?;
    println!("Score: {}/10", analysis.score);
    if !analysis.critique.is_empty() {
        println!("{}", analysis.critique);
    }
    if analysis.can_improve {
        println!();
        println!("Suggested prompt:");
        println!("{}", analysis.optimized_prompt);
    } else {
        println!("Already a strong prompt.");
    }
    Ok(())
}

pub fn score(text: &str) -> Result<(), AppError> {
    let score = prompt::score(text);
    println!("{score}/10 ({})", Strength::from_score(score).label());
    Ok(())
}

pub async fn feedback(
    app: &App,
    content: &str,
    kind: &str,
    contact: Option<&str>,
) -> Result<(), AppError> {
    let kind: FeedbackKind = kind.parse().map_err(|_| AppError::InvalidValue {
        field_name: "type".to_string(),
        value: kind.to_string(),
    })?;
    app.account.guard(app.support.submit_feedback(content, kind, contact).await)?;
    println!("Thanks, your feedback was sent.");
    Ok(())
}
